//! # scrollsafe-types
//!
//! Core type definitions for the scrollsafe feed filter.
//!
//! This crate is the foundation of the dependency graph -- all other
//! scrollsafe crates depend on it. It contains:
//!
//! - **[`error`]** -- [`ScrollSafeError`] and [`WordListError`]
//! - **[`settings`]** -- User settings and usage counters as held by the
//!   configuration store, plus the storage key names
//! - **[`post`]** -- Extracted post fields and classification results
//! - **[`config`]** -- Static runtime configuration (endpoint, feed layout)
//! - **[`credential`]** -- Redacting wrapper for the inference API key

pub mod config;
pub mod credential;
pub mod error;
pub mod post;
pub mod settings;

pub use config::{FeedLayout, JudgeConfig, RuntimeConfig};
pub use credential::ApiCredential;
pub use error::{Result, ScrollSafeError, WordListError};
pub use post::{Decision, DecisionReason, PostFields, Verdict};
pub use settings::{FilterMode, Settings, UsageStats, WordList};
