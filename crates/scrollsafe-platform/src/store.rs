//! Configuration store abstraction and in-memory implementation.
//!
//! The store has the shape of an extension's synced storage area: reads take
//! a list of key names and return an object holding only the keys that are
//! present; writes merge the given keys into the store.

use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{Map, Value};
use thiserror::Error;

use scrollsafe_types::ScrollSafeError;

/// Errors raised by a [`KeyValueStore`].
#[derive(Error, Debug)]
pub enum StoreError {
    /// The backing service could not be reached.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// The backing file could not be read or written.
    #[error("store io error: {0}")]
    Io(#[from] std::io::Error),

    /// The backing document is not a JSON object.
    #[error("store json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<StoreError> for ScrollSafeError {
    fn from(err: StoreError) -> Self {
        ScrollSafeError::Store(err.to_string())
    }
}

/// Async key-value configuration store.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read the given keys. Missing keys are absent from the result.
    async fn get(&self, keys: &[&str]) -> Result<Map<String, Value>, StoreError>;

    /// Merge the given entries into the store.
    async fn set(&self, items: Map<String, Value>) -> Result<(), StoreError>;

    /// Delete the given keys. Missing keys are ignored.
    async fn remove(&self, keys: &[&str]) -> Result<(), StoreError>;
}

/// Pick `keys` out of `all`, cloning the values that exist.
pub(crate) fn select(all: &Map<String, Value>, keys: &[&str]) -> Map<String, Value> {
    keys.iter()
        .filter_map(|k| all.get(*k).map(|v| ((*k).to_string(), v.clone())))
        .collect()
}

/// In-memory store. Contents live as long as the struct.
#[derive(Default)]
pub struct MemoryStore {
    values: Mutex<Map<String, Value>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with the given entries.
    pub fn with_values(values: Map<String, Value>) -> Self {
        Self {
            values: Mutex::new(values),
        }
    }

    /// A copy of everything in the store.
    pub fn snapshot(&self) -> Map<String, Value> {
        self.values
            .lock()
            .expect("MemoryStore mutex poisoned")
            .clone()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, keys: &[&str]) -> Result<Map<String, Value>, StoreError> {
        let values = self.values.lock().expect("MemoryStore mutex poisoned");
        Ok(select(&values, keys))
    }

    async fn set(&self, items: Map<String, Value>) -> Result<(), StoreError> {
        let mut values = self.values.lock().expect("MemoryStore mutex poisoned");
        values.extend(items);
        Ok(())
    }

    async fn remove(&self, keys: &[&str]) -> Result<(), StoreError> {
        let mut values = self.values.lock().expect("MemoryStore mutex poisoned");
        for key in keys {
            values.remove(*key);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn obj(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[tokio::test]
    async fn get_returns_only_present_keys() {
        let store = MemoryStore::with_values(obj(json!({"a": 1, "b": true})));
        let got = store.get(&["a", "missing"]).await.unwrap();
        assert_eq!(got.len(), 1);
        assert_eq!(got["a"], json!(1));
    }

    #[tokio::test]
    async fn set_merges() {
        let store = MemoryStore::with_values(obj(json!({"a": 1, "b": 2})));
        store.set(obj(json!({"b": 3, "c": 4}))).await.unwrap();
        assert_eq!(Value::Object(store.snapshot()), json!({"a": 1, "b": 3, "c": 4}));
    }

    #[tokio::test]
    async fn remove_ignores_missing() {
        let store = MemoryStore::with_values(obj(json!({"a": 1})));
        store.remove(&["a", "zzz"]).await.unwrap();
        assert!(store.snapshot().is_empty());
    }

    #[test]
    fn store_error_converts_to_top_level() {
        let err: ScrollSafeError = StoreError::Unavailable("sync quota".into()).into();
        assert_eq!(
            err.to_string(),
            "settings store error: store unavailable: sync quota"
        );
    }

    #[test]
    fn memory_store_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<MemoryStore>();
    }
}
