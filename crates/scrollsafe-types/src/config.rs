//! Static runtime configuration.
//!
//! Unlike [`Settings`](crate::settings::Settings), which the user edits at
//! any time through the configuration store, this is fixed for the life of a
//! session: where the inference endpoint lives and which selectors describe
//! the feed markup. All structs accept both `snake_case` and `camelCase`
//! field names via `#[serde(alias)]`; unknown fields are ignored.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{Result, ScrollSafeError};

/// Root runtime configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RuntimeConfig {
    /// Remote classifier endpoint settings.
    #[serde(default)]
    pub judge: JudgeConfig,

    /// Selectors describing the feed markup.
    #[serde(default)]
    pub layout: FeedLayout,

    /// `tracing` filter directive used when `RUST_LOG` is unset.
    #[serde(default = "default_log_filter", alias = "logFilter")]
    pub log_filter: String,
}

impl RuntimeConfig {
    /// Parse and validate a JSON document.
    pub fn from_json(raw: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations that cannot work at all.
    pub fn validate(&self) -> Result<()> {
        if self.judge.endpoint.trim().is_empty() {
            return Err(ScrollSafeError::ConfigInvalid {
                reason: "judge.endpoint is empty".into(),
            });
        }
        if !(0.0..=2.0).contains(&self.judge.temperature) {
            return Err(ScrollSafeError::ConfigInvalid {
                reason: format!(
                    "judge.temperature {} is outside 0.0..=2.0",
                    self.judge.temperature
                ),
            });
        }
        for (name, selector) in self.layout.entries() {
            if selector.trim().is_empty() {
                return Err(ScrollSafeError::ConfigInvalid {
                    reason: format!("layout.{name} is empty"),
                });
            }
        }
        Ok(())
    }
}

fn default_log_filter() -> String {
    "info".into()
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            judge: JudgeConfig::default(),
            layout: FeedLayout::default(),
            log_filter: default_log_filter(),
        }
    }
}

// ── Judge ────────────────────────────────────────────────────────────────

/// Where and how to call the remote classifier.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JudgeConfig {
    /// Full URL of the text-generation endpoint.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Sampling temperature sent with every request.
    #[serde(default = "default_temperature")]
    pub temperature: f64,

    /// Request timeout. `None` keeps the transport default.
    #[serde(default, alias = "timeoutSecs")]
    pub timeout_secs: Option<u64>,

    /// Extra HTTP headers sent with every request.
    #[serde(default)]
    pub headers: HashMap<String, String>,
}

fn default_endpoint() -> String {
    "https://genai.googleapis.com/v1beta2/models/gemini-2.5-flash:generateText".into()
}
fn default_temperature() -> f64 {
    0.1
}

impl Default for JudgeConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            temperature: default_temperature(),
            timeout_secs: None,
            headers: HashMap::new(),
        }
    }
}

// ── Feed layout ──────────────────────────────────────────────────────────

/// CSS-style selectors for the one feed layout scrollsafe understands.
///
/// The defaults track the current markup of the professional-network feed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FeedLayout {
    /// Per-post element that candidates are discovered by. Blur mode wraps
    /// this element's children.
    #[serde(default = "default_candidate")]
    pub candidate: String,

    /// Outer post element collapsed in remove mode.
    #[serde(default = "default_post_container", alias = "postContainer")]
    pub post_container: String,

    /// Post body element. Its absence means "not a content post".
    #[serde(default = "default_body")]
    pub body: String,

    /// Author metadata block.
    #[serde(default = "default_actor_container", alias = "actorContainer")]
    pub actor_container: String,

    /// Author name, relative to the actor block.
    #[serde(default = "default_actor_name", alias = "actorName")]
    pub actor_name: String,

    /// Author headline, relative to the actor block.
    #[serde(default = "default_actor_description", alias = "actorDescription")]
    pub actor_description: String,

    /// Secondary author line, relative to the actor block.
    #[serde(
        default = "default_actor_sub_description",
        alias = "actorSubDescription"
    )]
    pub actor_sub_description: String,
}

fn default_candidate() -> String {
    ".feed-shared-update-v2__control-menu-container".into()
}
fn default_post_container() -> String {
    ".feed-shared-update-v2".into()
}
fn default_body() -> String {
    ".update-components-update-v2__commentary".into()
}
fn default_actor_container() -> String {
    ".update-components-actor__container".into()
}
fn default_actor_name() -> String {
    ".update-components-actor__title span[aria-hidden=\"true\"]".into()
}
fn default_actor_description() -> String {
    ".update-components-actor__description span[aria-hidden=\"true\"]".into()
}
fn default_actor_sub_description() -> String {
    ".update-components-actor__sub-description span[aria-hidden=\"true\"]".into()
}

impl Default for FeedLayout {
    fn default() -> Self {
        Self {
            candidate: default_candidate(),
            post_container: default_post_container(),
            body: default_body(),
            actor_container: default_actor_container(),
            actor_name: default_actor_name(),
            actor_description: default_actor_description(),
            actor_sub_description: default_actor_sub_description(),
        }
    }
}

impl FeedLayout {
    /// `(field name, selector)` pairs, for validation and error messages.
    pub fn entries(&self) -> [(&'static str, &str); 7] {
        [
            ("candidate", self.candidate.as_str()),
            ("post_container", self.post_container.as_str()),
            ("body", self.body.as_str()),
            ("actor_container", self.actor_container.as_str()),
            ("actor_name", self.actor_name.as_str()),
            ("actor_description", self.actor_description.as_str()),
            ("actor_sub_description", self.actor_sub_description.as_str()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_gives_defaults() {
        let config = RuntimeConfig::from_json("{}").unwrap();
        assert_eq!(config.judge, JudgeConfig::default());
        assert_eq!(config.layout, FeedLayout::default());
        assert_eq!(config.log_filter, "info");
    }

    #[test]
    fn camel_case_aliases() {
        let config = RuntimeConfig::from_json(
            r#"{
                "logFilter": "scrollsafe=debug",
                "judge": { "timeoutSecs": 5, "temperature": 0.0 },
                "layout": { "postContainer": ".post" }
            }"#,
        )
        .unwrap();
        assert_eq!(config.log_filter, "scrollsafe=debug");
        assert_eq!(config.judge.timeout_secs, Some(5));
        assert_eq!(config.layout.post_container, ".post");
        assert_eq!(config.layout.body, default_body());
    }

    #[test]
    fn rejects_empty_endpoint() {
        let err = RuntimeConfig::from_json(r#"{"judge": {"endpoint": " "}}"#).unwrap_err();
        assert!(err.to_string().contains("judge.endpoint"));
    }

    #[test]
    fn rejects_out_of_range_temperature() {
        let err = RuntimeConfig::from_json(r#"{"judge": {"temperature": 3.5}}"#).unwrap_err();
        assert!(err.to_string().contains("temperature"));
    }

    #[test]
    fn rejects_empty_selector() {
        let err = RuntimeConfig::from_json(r#"{"layout": {"body": ""}}"#).unwrap_err();
        assert_eq!(err.to_string(), "invalid config: layout.body is empty");
    }

    #[test]
    fn rejects_malformed_json() {
        let err = RuntimeConfig::from_json("{").unwrap_err();
        assert!(matches!(err, ScrollSafeError::Json(_)));
    }
}
