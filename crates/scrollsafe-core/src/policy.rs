//! The per-post suppress/allow decision.
//!
//! Checks run in a fixed order and stop at the first that applies:
//!
//! 1. promoted marker in the actor description lines: suppress
//! 2. a mute word in any field: suppress
//! 3. a show word in the body: allow
//! 4. disabled or no credential: allow
//! 5. the remote [`Judge`], where any error means allow
//!
//! A show word therefore overrides only the remote call; it cannot rescue a
//! promoted or muted post.

use std::sync::Arc;

use tracing::{debug, warn};

use scrollsafe_llm::Judge;
use scrollsafe_types::{Decision, DecisionReason, PostFields};

use crate::matcher::{contains_any, first_match};
use crate::settings::SettingsStore;

const PROMOTED: &[&str] = &["promoted"];

/// Decides whether a post is suppressed.
pub struct DecisionPolicy {
    settings: Arc<SettingsStore>,
    judge: Arc<dyn Judge>,
}

impl DecisionPolicy {
    pub fn new(settings: Arc<SettingsStore>, judge: Arc<dyn Judge>) -> Self {
        Self { settings, judge }
    }

    /// The verdict and why.
    pub async fn decide(&self, post: &PostFields) -> Decision {
        if contains_any(&post.actor_description, PROMOTED)
            || contains_any(&post.actor_sub_description, PROMOTED)
        {
            debug!(actor = %post.actor_name, "promoted post");
            return Decision::suppress(DecisionReason::Promoted);
        }

        let settings = self.settings.load().await;

        let muted = settings.muted_words.as_slice();
        if let Some(word) = post.all_text().iter().find_map(|field| first_match(field, muted)) {
            debug!(actor = %post.actor_name, word, "muted word matched");
            return Decision::suppress(DecisionReason::MutedWord(word.to_string()));
        }

        if let Some(word) = first_match(&post.body_text, settings.show_words.as_slice()) {
            debug!(actor = %post.actor_name, word, "show word matched");
            return Decision::allow(DecisionReason::ShowWord(word.to_string()));
        }

        let Some(credential) = settings.credential_if_enabled() else {
            if !settings.enabled {
                warn!("filtering is disabled, post shown");
                return Decision::allow(DecisionReason::Disabled);
            }
            warn!("no API credential configured, post shown");
            return Decision::allow(DecisionReason::MissingCredential);
        };

        match self.judge.judge(post, credential).await {
            Ok(true) => Decision::suppress(DecisionReason::Remote),
            Ok(false) => Decision::allow(DecisionReason::Remote),
            Err(e) => {
                warn!(judge = %self.judge.name(), error = %e, "classification failed, post shown");
                Decision::allow(DecisionReason::RemoteFailed(e.to_string()))
            }
        }
    }

    /// Whether the post is suppressed.
    pub async fn classify(&self, post: &PostFields) -> bool {
        self.decide(post).await.verdict.is_suppress()
    }

    /// The settings this policy reads.
    pub fn settings(&self) -> &Arc<SettingsStore> {
        &self.settings
    }
}
