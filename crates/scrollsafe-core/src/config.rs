//! Runtime configuration loading.
//!
//! The discovery order is:
//! 1. An explicit path from the caller.
//! 2. The `SCROLLSAFE_CONFIG` environment variable.
//! 3. Built-in defaults.
//!
//! A path that does not exist also yields the defaults, so a fresh install
//! works without any file on disk.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use scrollsafe_types::{Result, RuntimeConfig};

/// Environment variable naming the runtime config file.
pub const CONFIG_ENV: &str = "SCROLLSAFE_CONFIG";

/// Resolve the config path: explicit path > `SCROLLSAFE_CONFIG`.
pub fn discover_config_path(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }
    std::env::var_os(CONFIG_ENV)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}

/// Load and validate the runtime configuration.
///
/// # Errors
///
/// Fails if the file exists but cannot be read, is not valid JSON, or does
/// not pass [`RuntimeConfig::validate`].
pub async fn load_runtime_config(explicit: Option<&Path>) -> Result<RuntimeConfig> {
    let Some(path) = discover_config_path(explicit) else {
        debug!("no runtime config path, using defaults");
        return Ok(RuntimeConfig::default());
    };

    let raw = match tokio::fs::read_to_string(&path).await {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "runtime config not found, using defaults");
            return Ok(RuntimeConfig::default());
        }
        Err(e) => return Err(e.into()),
    };

    let config = RuntimeConfig::from_json(&raw)?;
    info!(path = %path.display(), "runtime config loaded");
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use scrollsafe_types::ScrollSafeError;

    #[test]
    fn explicit_path_wins() {
        let path = Path::new("/tmp/explicit.json");
        assert_eq!(discover_config_path(Some(path)), Some(path.to_path_buf()));
    }

    #[tokio::test]
    async fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_runtime_config(Some(&dir.path().join("absent.json")))
            .await
            .unwrap();
        assert_eq!(config, RuntimeConfig::default());
    }

    #[tokio::test]
    async fn file_values_are_applied() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scrollsafe.json");
        std::fs::write(
            &path,
            r#"{"judge": {"endpoint": "http://localhost:9/gen", "timeoutSecs": 3}, "logFilter": "debug"}"#,
        )
        .unwrap();

        let config = load_runtime_config(Some(&path)).await.unwrap();
        assert_eq!(config.judge.endpoint, "http://localhost:9/gen");
        assert_eq!(config.judge.timeout_secs, Some(3));
        assert_eq!(config.log_filter, "debug");
    }

    #[tokio::test]
    async fn invalid_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, r#"{"judge": {"endpoint": ""}}"#).unwrap();

        let err = load_runtime_config(Some(&path)).await.unwrap_err();
        assert!(matches!(err, ScrollSafeError::ConfigInvalid { .. }));
    }
}
