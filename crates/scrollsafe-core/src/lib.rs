//! # scrollsafe-core
//!
//! Feed filtering engine for scrollsafe.
//!
//! Discovers posts in a [`HostDocument`](scrollsafe_platform::HostDocument),
//! decides per post whether to suppress it (promoted marker, mute words,
//! show words, then a remote [`Judge`](scrollsafe_llm::Judge)), and blurs or
//! removes suppressed posts in place. Every failure path leaves the post
//! visible.

pub mod config;
pub mod extractor;
pub mod layout;
pub mod logging;
pub mod matcher;
pub mod observer;
pub mod pipeline;
pub mod policy;
pub mod processed;
pub mod session;
pub mod settings;
pub mod suppress;

pub use extractor::{ExtractedPost, PostExtractor};
pub use layout::CompiledLayout;
pub use observer::{FeedObserver, ObserverState};
pub use pipeline::PostPipeline;
pub use policy::DecisionPolicy;
pub use processed::ProcessedSet;
pub use session::ScrollSession;
pub use settings::SettingsStore;
pub use suppress::{SuppressionOutcome, Suppressor};
