//! The [`Judge`] trait: a remote yes/no classifier for posts.

use async_trait::async_trait;

use scrollsafe_types::{ApiCredential, PostFields};

use crate::error::Result;

/// Something that can decide whether a post should be suppressed.
///
/// `Ok(true)` means suppress. The main implementation is
/// [`InferenceJudge`](crate::inference::InferenceJudge); tests use scripted
/// fakes.
///
/// # Example
///
/// ```rust,ignore
/// use scrollsafe_llm::Judge;
/// use scrollsafe_types::{ApiCredential, PostFields};
///
/// async fn is_cringe(judge: &dyn Judge, key: &ApiCredential) -> bool {
///     let post = PostFields::with_body("Agree? Comment YES below!");
///     judge.judge(&post, key).await.unwrap_or(false)
/// }
/// ```
#[async_trait]
pub trait Judge: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &str;

    /// Classify one post.
    ///
    /// # Errors
    ///
    /// Returns [`JudgeError`](crate::error::JudgeError) on transport,
    /// authentication, rate-limit or response-shape failures.
    async fn judge(&self, post: &PostFields, credential: &ApiCredential) -> Result<bool>;
}
