//! Inference API credential.
//!
//! [`ApiCredential`] holds the bearer token sent to the inference endpoint.
//! It never prints its value: `Debug` and `Display` show `[REDACTED]`.
//! Blank values are not credentials at all, so construction from store
//! data goes through [`ApiCredential::parse`], which rejects them.

use std::fmt;

/// A non-empty API key for the remote classifier.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiCredential(String);

impl ApiCredential {
    /// Build a credential from a raw store value.
    ///
    /// Surrounding whitespace is stripped; `None` is returned for an
    /// empty result.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    /// The raw key. Only call this where the key is actually sent.
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Value for an `Authorization` header.
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.0)
    }
}

impl fmt::Debug for ApiCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiCredential([REDACTED])")
    }
}

impl fmt::Display for ApiCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_trims() {
        let cred = ApiCredential::parse("  sk-abc  ").unwrap();
        assert_eq!(cred.expose(), "sk-abc");
    }

    #[test]
    fn parse_rejects_blank() {
        assert!(ApiCredential::parse("").is_none());
        assert!(ApiCredential::parse("   ").is_none());
    }

    #[test]
    fn bearer_header_value() {
        let cred = ApiCredential::parse("sk-abc").unwrap();
        assert_eq!(cred.bearer(), "Bearer sk-abc");
    }

    #[test]
    fn debug_and_display_never_leak() {
        let cred = ApiCredential::parse("sk-very-secret").unwrap();
        assert!(!format!("{cred:?}").contains("sk-very-secret"));
        assert!(!format!("{cred}").contains("sk-very-secret"));
        assert_eq!(format!("{cred}"), "[REDACTED]");
    }
}
