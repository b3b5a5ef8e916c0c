//! Error types for scrollsafe.
//!
//! [`ScrollSafeError`] is the top-level error type. Nearly every failure in
//! the filtering pipeline is absorbed as a fail-open verdict, so these
//! variants mostly surface at the edges: config loading and settings edits.

use thiserror::Error;

/// Top-level error type for scrollsafe.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ScrollSafeError {
    /// Runtime configuration is malformed or semantically invalid.
    #[error("invalid config: {reason}")]
    ConfigInvalid {
        /// What is wrong with the configuration.
        reason: String,
    },

    /// The configuration store could not be read or written.
    #[error("settings store error: {0}")]
    Store(String),

    /// A word-list edit was rejected.
    #[error(transparent)]
    WordList(#[from] WordListError),

    /// Underlying I/O error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization / deserialization error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Reasons a word cannot be added to a mute or show list.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WordListError {
    /// The word is empty after trimming.
    #[error("word is empty")]
    Empty,

    /// The (case-folded) word is already in the list.
    #[error("'{0}' is already in the list")]
    Duplicate(String),

    /// The list already holds the maximum number of words.
    #[error("list is full ({max} words)")]
    Full {
        /// The list capacity.
        max: usize,
    },
}

/// A convenience type alias.
pub type Result<T> = std::result::Result<T, ScrollSafeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_config_invalid() {
        let err = ScrollSafeError::ConfigInvalid {
            reason: "endpoint is empty".into(),
        };
        assert_eq!(err.to_string(), "invalid config: endpoint is empty");
    }

    #[test]
    fn word_list_error_is_transparent() {
        let err: ScrollSafeError = WordListError::Duplicate("crypto".into()).into();
        assert_eq!(err.to_string(), "'crypto' is already in the list");

        let err: ScrollSafeError = WordListError::Full { max: 20 }.into();
        assert_eq!(err.to_string(), "list is full (20 words)");
    }

    #[test]
    fn json_error_from_conversion() {
        let serde_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: ScrollSafeError = serde_err.into();
        assert!(err.to_string().starts_with("json error:"));
    }
}
