//! Classifier error types for scrollsafe-llm.
//!
//! All judge operations return [`Result<T>`] which uses [`JudgeError`] as
//! the error type. Callers in the filtering pipeline turn every variant
//! into an "allow" verdict.

use thiserror::Error;

/// Errors that can occur when asking the remote classifier about a post.
#[derive(Error, Debug)]
pub enum JudgeError {
    /// The judge cannot make a request at all (e.g. no endpoint).
    #[error("judge not configured: {0}")]
    NotConfigured(String),

    /// The endpoint rejected the credential (HTTP 401/403).
    #[error("authentication failed: {0}")]
    AuthFailed(String),

    /// The endpoint returned a rate-limit response (HTTP 429).
    #[error("rate limited: {0}")]
    RateLimited(String),

    /// Any other non-success HTTP status.
    #[error("request failed: {0}")]
    RequestFailed(String),

    /// The endpoint answered 2xx but the body carries an `error` field.
    #[error("api error: {0}")]
    Api(String),

    /// The body is JSON but has no `predictions[0].output`.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// Transport-level failure from reqwest.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The body is not valid JSON.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A convenience type alias for judge operations.
pub type Result<T> = std::result::Result<T, JudgeError>;
