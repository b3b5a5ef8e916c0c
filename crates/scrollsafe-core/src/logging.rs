//! Tracing subscriber setup.

use tracing_subscriber::EnvFilter;

/// Install a global fmt subscriber.
///
/// `RUST_LOG` wins when set; otherwise `default_filter` (typically
/// [`RuntimeConfig::log_filter`](scrollsafe_types::RuntimeConfig::log_filter))
/// is used. Returns `false` if a global subscriber was already installed.
pub fn init(default_filter: &str) -> bool {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()),
        )
        .try_init()
        .is_ok()
}
