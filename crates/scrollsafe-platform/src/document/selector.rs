//! CSS selectors.
//!
//! Parsing and matching are done by `scraper`, so anything it accepts is a
//! valid layout selector: combinators, attribute operators, `:not()`,
//! structural pseudo-classes and selector lists. [`Selector`] keeps the
//! source text next to the compiled form for logging and error messages.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Selector parse failure.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid selector {selector:?}: {reason}")]
pub struct SelectorError {
    /// The rejected source text.
    pub selector: String,
    /// Parser diagnostic.
    pub reason: String,
}

/// A parsed CSS selector list.
#[derive(Clone)]
pub struct Selector {
    source: String,
    compiled: scraper::Selector,
}

impl Selector {
    /// Parse `source`.
    ///
    /// # Errors
    ///
    /// [`SelectorError`] when `source` is empty or not valid CSS.
    pub fn parse(source: &str) -> Result<Self, SelectorError> {
        let compiled = scraper::Selector::parse(source).map_err(|e| SelectorError {
            selector: source.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self {
            source: source.to_string(),
            compiled,
        })
    }

    /// The text this selector was parsed from.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub(crate) fn compiled(&self) -> &scraper::Selector {
        &self.compiled
    }
}

impl fmt::Debug for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Selector").field(&self.source).finish()
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

impl FromStr for Selector {
    type Err = SelectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
