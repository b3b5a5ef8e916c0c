//! JSON-file-backed configuration store.
//!
//! The whole store is one JSON object on disk. Writes are read-modify-write
//! under an async mutex and land via a temp file plus rename, so a crash
//! mid-write leaves the previous contents intact.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde_json::{Map, Value};
use tokio::sync::Mutex;
use tracing::debug;

use crate::store::{KeyValueStore, StoreError, select};

/// A [`KeyValueStore`] persisted as a single JSON object file.
pub struct JsonFileStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFileStore {
    /// Use the file at `path`. It is created on first write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// The backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_all(&self) -> Result<Map<String, Value>, StoreError> {
        let contents = match tokio::fs::read_to_string(&self.path).await {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Map::new()),
            Err(e) => return Err(e.into()),
        };
        if contents.trim().is_empty() {
            return Ok(Map::new());
        }
        match serde_json::from_str::<Value>(&contents)? {
            Value::Object(map) => Ok(map),
            _ => Err(StoreError::Unavailable(format!(
                "{} does not hold a JSON object",
                self.path.display()
            ))),
        }
    }

    async fn write_all(&self, map: &Map<String, Value>) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent).await?;
        }
        let tmp = self.path.with_extension("json.tmp");
        let body = serde_json::to_string_pretty(map)?;
        tokio::fs::write(&tmp, body).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        debug!(path = %self.path.display(), keys = map.len(), "settings file written");
        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for JsonFileStore {
    async fn get(&self, keys: &[&str]) -> Result<Map<String, Value>, StoreError> {
        let all = self.read_all().await?;
        Ok(select(&all, keys))
    }

    async fn set(&self, items: Map<String, Value>) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;
        let mut all = self.read_all().await?;
        all.extend(items);
        self.write_all(&all).await
    }

    async fn remove(&self, keys: &[&str]) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;
        let mut all = self.read_all().await?;
        for key in keys {
            all.remove(*key);
        }
        self.write_all(&all).await
    }
}
