//! Remote post classifier for scrollsafe.
//!
//! # Architecture
//!
//! - [`Judge`] trait: "should this post be suppressed?" as an async call
//! - [`InferenceJudge`] implements it against a text-generation endpoint
//!   (one `POST`, bearer auth, rubric prompt, no retry)
//! - [`prompt`] holds the rubric and the marker parser
//! - [`JudgeError`] covers every way a call can fail; the filtering pipeline
//!   treats all of them as "allow"

pub mod error;
pub mod inference;
pub mod judge;
pub mod prompt;
pub mod types;

pub use error::{JudgeError, Result};
pub use inference::InferenceJudge;
pub use judge::Judge;
pub use prompt::{RUBRIC, verdict_from_output};
pub use types::{GenerateRequest, GenerateResponse, Prediction};
