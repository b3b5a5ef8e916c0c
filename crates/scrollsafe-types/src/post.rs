//! Extracted post fields and classification results.

use serde::{Deserialize, Serialize};

/// Default for [`PostFields::actor_name`] when the element is missing.
pub const DEFAULT_ACTOR_NAME: &str = "Unknown";
/// Default for [`PostFields::actor_description`].
pub const DEFAULT_ACTOR_DESCRIPTION: &str = "No description";
/// Default for [`PostFields::actor_sub_description`].
pub const DEFAULT_ACTOR_SUB_DESCRIPTION: &str = "No sub-description";

/// Structured text pulled out of one feed post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostFields {
    /// Display name of the author.
    pub actor_name: String,

    /// Headline under the author's name. Sponsored posts carry "Promoted" here.
    pub actor_description: String,

    /// Secondary line (timestamp, visibility, or "Promoted").
    pub actor_sub_description: String,

    /// The post body, trimmed.
    pub body_text: String,
}

impl PostFields {
    /// Fields for a post with the given body and default actor metadata.
    pub fn with_body(body_text: impl Into<String>) -> Self {
        Self {
            body_text: body_text.into(),
            ..Self::default()
        }
    }

    /// The four fields in the order the mute check scans them.
    pub fn all_text(&self) -> [&str; 4] {
        [
            &self.actor_name,
            &self.actor_description,
            &self.actor_sub_description,
            &self.body_text,
        ]
    }
}

impl Default for PostFields {
    fn default() -> Self {
        Self {
            actor_name: DEFAULT_ACTOR_NAME.into(),
            actor_description: DEFAULT_ACTOR_DESCRIPTION.into(),
            actor_sub_description: DEFAULT_ACTOR_SUB_DESCRIPTION.into(),
            body_text: String::new(),
        }
    }
}

/// Whether a post is shown or filtered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    /// Show the post normally.
    Allow,
    /// Apply the configured filter.
    Suppress,
}

impl Verdict {
    /// `true` for [`Verdict::Suppress`].
    pub fn is_suppress(self) -> bool {
        matches!(self, Self::Suppress)
    }
}

/// Which rule produced a [`Decision`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecisionReason {
    /// Author metadata marks the post as sponsored.
    Promoted,
    /// A field contained this muted word.
    MutedWord(String),
    /// The body contained this show word.
    ShowWord(String),
    /// Remote classification is switched off.
    Disabled,
    /// Switched on, but no credential is configured.
    MissingCredential,
    /// The remote classifier returned a verdict.
    Remote,
    /// The remote classifier failed; the post is shown.
    RemoteFailed(String),
}

/// A verdict together with the rule that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decision {
    /// The verdict.
    pub verdict: Verdict,
    /// Why.
    pub reason: DecisionReason,
}

impl Decision {
    /// A suppress decision.
    pub fn suppress(reason: DecisionReason) -> Self {
        Self {
            verdict: Verdict::Suppress,
            reason,
        }
    }

    /// An allow decision.
    pub fn allow(reason: DecisionReason) -> Self {
        Self {
            verdict: Verdict::Allow,
            reason,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_missing_elements() {
        let fields = PostFields::with_body("hello");
        assert_eq!(fields.actor_name, "Unknown");
        assert_eq!(fields.actor_description, "No description");
        assert_eq!(fields.actor_sub_description, "No sub-description");
        assert_eq!(fields.body_text, "hello");
    }

    #[test]
    fn all_text_order() {
        let fields = PostFields {
            actor_name: "a".into(),
            actor_description: "b".into(),
            actor_sub_description: "c".into(),
            body_text: "d".into(),
        };
        assert_eq!(fields.all_text(), ["a", "b", "c", "d"]);
    }

    #[test]
    fn serializes_camel_case() {
        let json = serde_json::to_value(PostFields::with_body("x")).unwrap();
        assert_eq!(json["actorSubDescription"], "No sub-description");
        assert_eq!(json["bodyText"], "x");
    }

    #[test]
    fn decision_constructors() {
        let d = Decision::suppress(DecisionReason::Promoted);
        assert!(d.verdict.is_suppress());
        let d = Decision::allow(DecisionReason::Disabled);
        assert!(!d.verdict.is_suppress());
    }
}
