//! Typed access to the user's settings in a [`KeyValueStore`].
//!
//! [`SettingsStore`] is the only place that knows key names. Reads decode a
//! full [`Settings`] snapshot; writes are read-modify-write under a single
//! async mutex so concurrent edits from one session never lose updates.

use std::sync::Arc;

use serde_json::{Map, Value};
use tokio::sync::Mutex;
use tracing::{debug, warn};

use scrollsafe_platform::KeyValueStore;
use scrollsafe_types::settings::keys;
use scrollsafe_types::{ApiCredential, FilterMode, Result, Settings, UsageStats, WordList};

/// Which of the two word lists an edit targets.
#[derive(Debug, Clone, Copy)]
enum List {
    Muted,
    Show,
}

impl List {
    fn key(self) -> &'static str {
        match self {
            List::Muted => keys::MUTED_WORDS,
            List::Show => keys::SHOW_WORDS,
        }
    }

    fn select(self, settings: &mut Settings) -> &mut WordList {
        match self {
            List::Muted => &mut settings.muted_words,
            List::Show => &mut settings.show_words,
        }
    }
}

/// Settings and usage counters backed by a [`KeyValueStore`].
pub struct SettingsStore {
    store: Arc<dyn KeyValueStore>,
    write_lock: Mutex<()>,
}

impl SettingsStore {
    /// Wrap a store.
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            write_lock: Mutex::new(()),
        }
    }

    /// The underlying store.
    pub fn backend(&self) -> &Arc<dyn KeyValueStore> {
        &self.store
    }

    /// Read a settings snapshot, propagating store failures.
    pub async fn try_load(&self) -> Result<Settings> {
        let raw = self.store.get(keys::SETTINGS).await?;
        Ok(Settings::from_map(&raw))
    }

    /// Read a settings snapshot. A store failure yields the defaults
    /// (disabled, empty lists), which never suppress anything remotely.
    pub async fn load(&self) -> Settings {
        match self.try_load().await {
            Ok(settings) => settings,
            Err(e) => {
                warn!(error = %e, "settings unavailable, using defaults");
                Settings::default()
            }
        }
    }

    /// Current usage counters.
    pub async fn usage_stats(&self) -> Result<UsageStats> {
        let raw = self.store.get(keys::STATS).await?;
        Ok(UsageStats::from_map(&raw))
    }

    /// Count one suppressed post and the reading time it would have cost.
    ///
    /// Returns the updated counters.
    pub async fn record_suppression(&self, post_text: &str) -> Result<UsageStats> {
        let _guard = self.write_lock.lock().await;
        let updated = self.usage_stats().await?.with_suppression(post_text);
        self.store.set(updated.to_map()).await?;
        debug!(
            cringe_count = updated.cringe_count,
            time_saved_minutes = updated.time_saved_minutes,
            "usage stats updated"
        );
        Ok(updated)
    }

    // ── Popup edits ──────────────────────────────────────────────────────

    /// Switch remote classification on or off.
    pub async fn set_enabled(&self, enabled: bool) -> Result<()> {
        self.put(keys::ENABLED, Value::Bool(enabled)).await
    }

    /// Store the inference credential. A blank value removes it.
    ///
    /// Returns whether a credential is now configured.
    pub async fn set_api_key(&self, raw: &str) -> Result<bool> {
        let _guard = self.write_lock.lock().await;
        match ApiCredential::parse(raw) {
            Some(credential) => {
                let mut items = Map::new();
                items.insert(
                    keys::API_CREDENTIAL.into(),
                    Value::String(credential.expose().to_string()),
                );
                self.store.set(items).await?;
                Ok(true)
            }
            None => {
                self.store
                    .remove(&[keys::API_CREDENTIAL, keys::LEGACY_API_CREDENTIAL])
                    .await?;
                Ok(false)
            }
        }
    }

    /// Whether a credential is configured, regardless of the on/off switch.
    pub async fn has_api_key(&self) -> Result<bool> {
        Ok(self.try_load().await?.api_key.is_some())
    }

    /// Set the visual treatment for suppressed posts.
    pub async fn set_filter_mode(&self, mode: FilterMode) -> Result<()> {
        self.put(keys::FILTER_MODE, Value::from(mode.as_str())).await
    }

    /// Flip between blur and remove. Returns the new mode.
    pub async fn toggle_filter_mode(&self) -> Result<FilterMode> {
        let _guard = self.write_lock.lock().await;
        let mode = self.try_load().await?.filter_mode.toggled();
        let mut items = Map::new();
        items.insert(keys::FILTER_MODE.into(), Value::from(mode.as_str()));
        self.store.set(items).await?;
        Ok(mode)
    }

    /// Add a mute word. Returns the normalized word that was stored.
    pub async fn add_muted_word(&self, word: &str) -> Result<String> {
        self.edit_words(List::Muted, |list| Ok(list.add(word)?)).await
    }

    /// Remove a mute word. Returns whether it was present.
    pub async fn remove_muted_word(&self, word: &str) -> Result<bool> {
        self.edit_words(List::Muted, |list| Ok(list.remove(word))).await
    }

    /// Empty the mute list.
    pub async fn clear_muted_words(&self) -> Result<()> {
        self.edit_words(List::Muted, |list| {
            list.clear();
            Ok(())
        })
        .await
    }

    /// Add a show word. Returns the normalized word that was stored.
    pub async fn add_show_word(&self, word: &str) -> Result<String> {
        self.edit_words(List::Show, |list| Ok(list.add(word)?)).await
    }

    /// Remove a show word. Returns whether it was present.
    pub async fn remove_show_word(&self, word: &str) -> Result<bool> {
        self.edit_words(List::Show, |list| Ok(list.remove(word))).await
    }

    /// Empty the show list.
    pub async fn clear_show_words(&self) -> Result<()> {
        self.edit_words(List::Show, |list| {
            list.clear();
            Ok(())
        })
        .await
    }

    async fn put(&self, key: &str, value: Value) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let mut items = Map::new();
        items.insert(key.to_string(), value);
        self.store.set(items).await?;
        Ok(())
    }

    async fn edit_words<R>(
        &self,
        list: List,
        edit: impl FnOnce(&mut WordList) -> Result<R>,
    ) -> Result<R> {
        let _guard = self.write_lock.lock().await;
        let mut settings = self.try_load().await?;
        let words = list.select(&mut settings);
        let out = edit(&mut *words)?;
        let mut items = Map::new();
        items.insert(list.key().into(), words.to_value());
        self.store.set(items).await?;
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use scrollsafe_platform::{MemoryStore, StoreError};
    use scrollsafe_types::{ScrollSafeError, WordListError};
    use serde_json::json;

    fn store_with(value: Value) -> (Arc<MemoryStore>, SettingsStore) {
        let backend = Arc::new(MemoryStore::with_values(value.as_object().cloned().unwrap()));
        (backend.clone(), SettingsStore::new(backend))
    }

    struct BrokenStore;

    #[async_trait]
    impl KeyValueStore for BrokenStore {
        async fn get(&self, _: &[&str]) -> std::result::Result<Map<String, Value>, StoreError> {
            Err(StoreError::Unavailable("offline".into()))
        }
        async fn set(&self, _: Map<String, Value>) -> std::result::Result<(), StoreError> {
            Err(StoreError::Unavailable("offline".into()))
        }
        async fn remove(&self, _: &[&str]) -> std::result::Result<(), StoreError> {
            Err(StoreError::Unavailable("offline".into()))
        }
    }

    #[tokio::test]
    async fn load_decodes_and_prefers_canonical_keys() {
        let (_, settings) = store_with(json!({
            "isEnabled": false,
            "enabled": true,
            "geminiApiKey": "legacy",
            "filterMode": "remove",
            "mutedWords": ["Crypto", "crypto", " NFT "],
        }));
        let s = settings.load().await;
        assert!(s.enabled);
        assert_eq!(s.api_key.as_ref().map(ApiCredential::expose), Some("legacy"));
        assert_eq!(s.filter_mode, FilterMode::Remove);
        assert_eq!(s.muted_words.as_slice(), ["crypto", "nft"]);
    }

    #[tokio::test]
    async fn broken_store_loads_defaults() {
        let settings = SettingsStore::new(Arc::new(BrokenStore));
        assert_eq!(settings.load().await, Settings::default());
        assert!(matches!(settings.try_load().await, Err(ScrollSafeError::Store(_))));
        assert!(settings.record_suppression("x").await.is_err());
    }

    #[tokio::test]
    async fn record_suppression_accumulates() {
        let (backend, settings) = store_with(json!({"cringeCount": 2, "timeSavedInMinutes": "1.5"}));
        let long_post = "word ".repeat(60);

        let stats = settings.record_suppression(&long_post).await.unwrap();
        assert_eq!(stats.cringe_count, 3);
        assert!((stats.time_saved_minutes - (1.5 + 20.0 / 60.0)).abs() < 1e-9);

        let snapshot = backend.snapshot();
        assert_eq!(snapshot["cringeCount"], json!(3));
        assert_eq!(settings.usage_stats().await.unwrap(), stats);
    }

    #[tokio::test]
    async fn concurrent_suppressions_do_not_lose_counts() {
        let (_, settings) = store_with(json!({}));
        let settings = Arc::new(settings);
        let mut handles = Vec::new();
        for _ in 0..25 {
            let s = settings.clone();
            handles.push(tokio::spawn(async move {
                s.record_suppression("short post").await.unwrap();
            }));
        }
        for h in handles {
            h.await.unwrap();
        }
        assert_eq!(settings.usage_stats().await.unwrap().cringe_count, 25);
    }

    #[tokio::test]
    async fn word_list_edits_follow_popup_rules() {
        let (backend, settings) = store_with(json!({}));

        assert_eq!(settings.add_muted_word("  Crypto ").await.unwrap(), "crypto");
        let dup = settings.add_muted_word("CRYPTO").await.unwrap_err();
        assert!(matches!(
            dup,
            ScrollSafeError::WordList(WordListError::Duplicate(_))
        ));
        assert!(matches!(
            settings.add_muted_word("   ").await,
            Err(ScrollSafeError::WordList(WordListError::Empty))
        ));

        settings.add_show_word("rust").await.unwrap();
        assert_eq!(backend.snapshot()["mutedWords"], json!(["crypto"]));
        assert_eq!(backend.snapshot()["showWords"], json!(["rust"]));

        assert!(settings.remove_muted_word("crypto").await.unwrap());
        assert!(!settings.remove_muted_word("crypto").await.unwrap());
        settings.clear_show_words().await.unwrap();
        assert_eq!(backend.snapshot()["showWords"], json!([]));
    }

    #[tokio::test]
    async fn list_is_capped() {
        let (_, settings) = store_with(json!({}));
        for i in 0..20 {
            settings.add_show_word(&format!("w{i}")).await.unwrap();
        }
        assert!(matches!(
            settings.add_show_word("one-more").await,
            Err(ScrollSafeError::WordList(WordListError::Full { .. }))
        ));
        settings.clear_muted_words().await.unwrap();
        assert_eq!(settings.load().await.show_words.len(), 20);
    }

    #[tokio::test]
    async fn api_key_and_toggles() {
        let (backend, settings) = store_with(json!({"geminiApiKey": "old"}));

        assert!(settings.set_api_key(" new-key ").await.unwrap());
        assert_eq!(backend.snapshot()["apiCredential"], json!("new-key"));
        assert!(settings.has_api_key().await.unwrap());

        assert!(!settings.set_api_key("").await.unwrap());
        assert!(!settings.has_api_key().await.unwrap());

        settings.set_enabled(true).await.unwrap();
        assert!(settings.load().await.enabled);

        assert_eq!(settings.toggle_filter_mode().await.unwrap(), FilterMode::Remove);
        assert_eq!(settings.toggle_filter_mode().await.unwrap(), FilterMode::Blur);
        settings.set_filter_mode(FilterMode::Remove).await.unwrap();
        assert_eq!(backend.snapshot()["filterMode"], json!("remove"));
    }
}
