//! User settings and usage counters.
//!
//! These are owned by the external key-value configuration store. The store
//! is loosely typed (any key may be missing or hold the wrong kind of
//! value), so decoding is field-by-field and lenient: anything that does not
//! parse falls back to the documented default rather than failing the whole
//! snapshot.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::credential::ApiCredential;
use crate::error::WordListError;

/// Storage key names used in the configuration store.
pub mod keys {
    /// Master on/off switch (`bool`).
    pub const ENABLED: &str = "enabled";
    /// Bearer credential for the inference endpoint (`string`).
    pub const API_CREDENTIAL: &str = "apiCredential";
    /// `"blur"` or `"remove"`.
    pub const FILTER_MODE: &str = "filterMode";
    /// Words that force suppression (`string[]`).
    pub const MUTED_WORDS: &str = "mutedWords";
    /// Words that force a post to be shown (`string[]`).
    pub const SHOW_WORDS: &str = "showWords";
    /// Number of suppressed posts (`integer`).
    pub const CRINGE_COUNT: &str = "cringeCount";
    /// Estimated reading time saved (`float`, minutes).
    pub const TIME_SAVED_MINUTES: &str = "timeSavedMinutes";

    /// Pre-rename key for [`ENABLED`].
    pub const LEGACY_ENABLED: &str = "isEnabled";
    /// Pre-rename key for [`API_CREDENTIAL`].
    pub const LEGACY_API_CREDENTIAL: &str = "geminiApiKey";
    /// Pre-rename key for [`TIME_SAVED_MINUTES`].
    pub const LEGACY_TIME_SAVED_MINUTES: &str = "timeSavedInMinutes";

    /// Every key read when taking a [`Settings`](super::Settings) snapshot.
    pub const SETTINGS: &[&str] = &[
        ENABLED,
        LEGACY_ENABLED,
        API_CREDENTIAL,
        LEGACY_API_CREDENTIAL,
        FILTER_MODE,
        MUTED_WORDS,
        SHOW_WORDS,
    ];

    /// Every key read when loading [`UsageStats`](super::UsageStats).
    pub const STATS: &[&str] = &[CRINGE_COUNT, TIME_SAVED_MINUTES, LEGACY_TIME_SAVED_MINUTES];
}

/// Maximum number of entries in a mute or show list.
pub const MAX_WORDS: usize = 20;

// ── Filter mode ──────────────────────────────────────────────────────────

/// How a suppressed post is treated visually.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterMode {
    /// Blur the post behind a "Click to View" overlay.
    #[default]
    Blur,
    /// Collapse the post out of the layout entirely.
    Remove,
}

impl FilterMode {
    /// Parse the store representation. Unknown values yield `None`.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "blur" => Some(Self::Blur),
            "remove" => Some(Self::Remove),
            _ => None,
        }
    }

    /// The store representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Blur => "blur",
            Self::Remove => "remove",
        }
    }

    /// The other mode.
    pub fn toggled(self) -> Self {
        match self {
            Self::Blur => Self::Remove,
            Self::Remove => Self::Blur,
        }
    }
}

impl std::fmt::Display for FilterMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Word lists ───────────────────────────────────────────────────────────

/// An ordered, case-folded, duplicate-free list of at most [`MAX_WORDS`]
/// words.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct WordList(Vec<String>);

impl WordList {
    /// Create an empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a list from untrusted input.
    ///
    /// Entries are trimmed and lowercased; blanks and duplicates are dropped
    /// and anything past [`MAX_WORDS`] is discarded.
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut list = Self::new();
        for word in words {
            // Rejections are exactly the entries we want to drop.
            let _ = list.add(word.as_ref());
        }
        list
    }

    /// Add a word, applying the same normalization as [`from_words`](Self::from_words).
    ///
    /// Returns the stored (normalized) form.
    pub fn add(&mut self, word: &str) -> Result<String, WordListError> {
        let word = word.trim().to_lowercase();
        if word.is_empty() {
            return Err(WordListError::Empty);
        }
        if self.0.contains(&word) {
            return Err(WordListError::Duplicate(word));
        }
        if self.0.len() >= MAX_WORDS {
            return Err(WordListError::Full { max: MAX_WORDS });
        }
        self.0.push(word.clone());
        Ok(word)
    }

    /// Remove a word (case-insensitive). Returns whether it was present.
    pub fn remove(&mut self, word: &str) -> bool {
        let word = word.trim().to_lowercase();
        let before = self.0.len();
        self.0.retain(|w| *w != word);
        self.0.len() != before
    }

    /// Remove every word.
    pub fn clear(&mut self) {
        self.0.clear();
    }

    /// Whether the (case-folded) word is in the list.
    pub fn contains(&self, word: &str) -> bool {
        let word = word.trim().to_lowercase();
        self.0.contains(&word)
    }

    /// The words, in insertion order.
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    /// Number of words.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the list is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Store representation (a JSON array of strings).
    pub fn to_value(&self) -> Value {
        Value::Array(self.0.iter().cloned().map(Value::String).collect())
    }

    fn from_value(value: Option<&Value>) -> Self {
        match value.and_then(Value::as_array) {
            Some(items) => Self::from_words(items.iter().filter_map(Value::as_str)),
            None => Self::new(),
        }
    }
}

impl<'de> Deserialize<'de> for WordList {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let words = Vec::<String>::deserialize(deserializer)?;
        Ok(Self::from_words(words))
    }
}

// ── Settings snapshot ────────────────────────────────────────────────────

/// A validated snapshot of the user's settings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Settings {
    /// Whether remote classification is switched on.
    pub enabled: bool,

    /// Credential for the inference endpoint, if one is configured.
    pub api_key: Option<ApiCredential>,

    /// Visual treatment for suppressed posts.
    pub filter_mode: FilterMode,

    /// Words that force suppression.
    pub muted_words: WordList,

    /// Words that force a post to be shown (unless promoted or muted).
    pub show_words: WordList,
}

impl Settings {
    /// Decode a snapshot from the raw key/value object returned by the store.
    ///
    /// Canonical keys win over their legacy aliases.
    pub fn from_map(map: &Map<String, Value>) -> Self {
        let enabled = map
            .get(keys::ENABLED)
            .or_else(|| map.get(keys::LEGACY_ENABLED))
            .and_then(Value::as_bool)
            .unwrap_or(false);

        let api_key = map
            .get(keys::API_CREDENTIAL)
            .or_else(|| map.get(keys::LEGACY_API_CREDENTIAL))
            .and_then(Value::as_str)
            .and_then(ApiCredential::parse);

        let filter_mode = map
            .get(keys::FILTER_MODE)
            .and_then(Value::as_str)
            .and_then(FilterMode::parse)
            .unwrap_or_default();

        Self {
            enabled,
            api_key,
            filter_mode,
            muted_words: WordList::from_value(map.get(keys::MUTED_WORDS)),
            show_words: WordList::from_value(map.get(keys::SHOW_WORDS)),
        }
    }

    /// The credential, but only when the extension is switched on.
    pub fn credential_if_enabled(&self) -> Option<&ApiCredential> {
        if self.enabled { self.api_key.as_ref() } else { None }
    }
}

// ── Usage statistics ─────────────────────────────────────────────────────

/// Counters shown to the user: posts suppressed and reading time saved.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageStats {
    /// Number of posts suppressed.
    pub cringe_count: u64,

    /// Estimated minutes of reading avoided.
    pub time_saved_minutes: f64,
}

impl UsageStats {
    /// Decode counters from the raw store object.
    ///
    /// Older stores kept the minutes as a string, so numeric strings are
    /// accepted too. Negative or non-finite values are clamped to zero.
    pub fn from_map(map: &Map<String, Value>) -> Self {
        let cringe_count = map
            .get(keys::CRINGE_COUNT)
            .and_then(|v| v.as_u64().or_else(|| v.as_f64().map(|f| f.max(0.0) as u64)))
            .unwrap_or(0);

        let time_saved_minutes = map
            .get(keys::TIME_SAVED_MINUTES)
            .or_else(|| map.get(keys::LEGACY_TIME_SAVED_MINUTES))
            .and_then(lenient_f64)
            .filter(|m| m.is_finite() && *m > 0.0)
            .unwrap_or(0.0);

        Self {
            cringe_count,
            time_saved_minutes,
        }
    }

    /// Counters after one more suppressed post with the given text.
    pub fn with_suppression(self, post_text: &str) -> Self {
        Self {
            cringe_count: self.cringe_count.saturating_add(1),
            time_saved_minutes: self.time_saved_minutes
                + f64::from(estimate_seconds_saved(post_text)) / 60.0,
        }
    }

    /// Whole minutes for display, rounded up.
    pub fn display_minutes(&self) -> u64 {
        self.time_saved_minutes.ceil() as u64
    }

    /// Store representation, using the canonical keys.
    pub fn to_map(&self) -> Map<String, Value> {
        let mut map = Map::new();
        map.insert(keys::CRINGE_COUNT.into(), Value::from(self.cringe_count));
        map.insert(
            keys::TIME_SAVED_MINUTES.into(),
            Value::from(self.time_saved_minutes),
        );
        map
    }
}

/// Reading time a suppressed post would have cost, by word count.
pub fn estimate_seconds_saved(post_text: &str) -> u32 {
    match post_text.split_whitespace().count() {
        0..=20 => 5,
        21..=50 => 10,
        _ => 20,
    }
}

fn lenient_f64(value: &Value) -> Option<f64> {
    value
        .as_f64()
        .or_else(|| value.as_str().and_then(|s| s.trim().parse::<f64>().ok()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn map(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(m) => m,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn empty_store_yields_defaults() {
        let settings = Settings::from_map(&Map::new());
        assert_eq!(settings, Settings::default());
        assert!(!settings.enabled);
        assert!(settings.api_key.is_none());
        assert_eq!(settings.filter_mode, FilterMode::Blur);
    }

    #[test]
    fn decodes_canonical_keys() {
        let settings = Settings::from_map(&map(json!({
            "enabled": true,
            "apiCredential": "sk-1",
            "filterMode": "remove",
            "mutedWords": ["Crypto", "hiring"],
            "showWords": ["rust"]
        })));
        assert!(settings.enabled);
        assert_eq!(settings.api_key.as_ref().unwrap().expose(), "sk-1");
        assert_eq!(settings.filter_mode, FilterMode::Remove);
        assert_eq!(settings.muted_words.as_slice(), ["crypto", "hiring"]);
        assert_eq!(settings.show_words.as_slice(), ["rust"]);
    }

    #[test]
    fn legacy_keys_are_aliases() {
        let settings = Settings::from_map(&map(json!({
            "isEnabled": true,
            "geminiApiKey": "legacy-key"
        })));
        assert!(settings.enabled);
        assert_eq!(settings.api_key.unwrap().expose(), "legacy-key");
    }

    #[test]
    fn canonical_key_wins_over_legacy() {
        let settings = Settings::from_map(&map(json!({
            "enabled": false,
            "isEnabled": true
        })));
        assert!(!settings.enabled);
    }

    #[test]
    fn wrong_types_fall_back_to_defaults() {
        let settings = Settings::from_map(&map(json!({
            "enabled": "yes",
            "apiCredential": 42,
            "filterMode": "explode",
            "mutedWords": "crypto"
        })));
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn blank_credential_is_no_credential() {
        let settings = Settings::from_map(&map(json!({
            "enabled": true,
            "apiCredential": "   "
        })));
        assert!(settings.api_key.is_none());
        assert!(settings.credential_if_enabled().is_none());
    }

    #[test]
    fn credential_hidden_when_disabled() {
        let settings = Settings::from_map(&map(json!({
            "enabled": false,
            "apiCredential": "sk-1"
        })));
        assert!(settings.api_key.is_some());
        assert!(settings.credential_if_enabled().is_none());
    }

    #[test]
    fn word_list_normalizes_and_caps() {
        let raw: Vec<String> = (0..30).map(|i| format!(" Word{i} ")).collect();
        let list = WordList::from_words(raw.iter().chain(["word0".to_string(), String::new()].iter()));
        assert_eq!(list.len(), MAX_WORDS);
        assert_eq!(list.as_slice()[0], "word0");
        assert!(list.contains("WORD19"));
        assert!(!list.contains("word20"));
    }

    #[test]
    fn word_list_add_rules() {
        let mut list = WordList::new();
        assert_eq!(list.add("  Crypto "), Ok("crypto".into()));
        assert_eq!(list.add("CRYPTO"), Err(WordListError::Duplicate("crypto".into())));
        assert_eq!(list.add("   "), Err(WordListError::Empty));
        for i in 1..MAX_WORDS {
            list.add(&format!("w{i}")).unwrap();
        }
        assert_eq!(list.add("one-more"), Err(WordListError::Full { max: MAX_WORDS }));
    }

    #[test]
    fn word_list_remove_and_clear() {
        let mut list = WordList::from_words(["a", "b", "c"]);
        assert!(list.remove("B"));
        assert!(!list.remove("b"));
        assert_eq!(list.as_slice(), ["a", "c"]);
        list.clear();
        assert!(list.is_empty());
    }

    #[test]
    fn word_list_deserialize_normalizes() {
        let list: WordList = serde_json::from_value(json!(["A", "a", " b "])).unwrap();
        assert_eq!(list.as_slice(), ["a", "b"]);
        assert_eq!(serde_json::to_value(&list).unwrap(), json!(["a", "b"]));
    }

    #[test]
    fn filter_mode_round_trip_and_toggle() {
        assert_eq!(FilterMode::parse("remove"), Some(FilterMode::Remove));
        assert_eq!(FilterMode::parse("Remove"), None);
        assert_eq!(FilterMode::Blur.toggled(), FilterMode::Remove);
        assert_eq!(FilterMode::Remove.to_string(), "remove");
        assert_eq!(serde_json::to_value(FilterMode::Blur).unwrap(), json!("blur"));
    }

    #[test]
    fn seconds_saved_by_length() {
        assert_eq!(estimate_seconds_saved(""), 5);
        assert_eq!(estimate_seconds_saved(&"w ".repeat(20)), 5);
        assert_eq!(estimate_seconds_saved(&"w ".repeat(21)), 10);
        assert_eq!(estimate_seconds_saved(&"w ".repeat(50)), 10);
        assert_eq!(estimate_seconds_saved(&"w ".repeat(51)), 20);
    }

    #[test]
    fn stats_accumulate() {
        let stats = UsageStats::default()
            .with_suppression("short post")
            .with_suppression(&"word ".repeat(60));
        assert_eq!(stats.cringe_count, 2);
        assert!((stats.time_saved_minutes - 25.0 / 60.0).abs() < 1e-9);
        assert_eq!(stats.display_minutes(), 1);
    }

    #[test]
    fn stats_decode_lenient() {
        let stats = UsageStats::from_map(&map(json!({
            "cringeCount": 3,
            "timeSavedInMinutes": "1.5"
        })));
        assert_eq!(stats.cringe_count, 3);
        assert!((stats.time_saved_minutes - 1.5).abs() < 1e-9);

        let stats = UsageStats::from_map(&map(json!({
            "cringeCount": -4,
            "timeSavedMinutes": -2.0
        })));
        assert_eq!(stats, UsageStats::default());
    }

    #[test]
    fn stats_to_map_uses_canonical_keys() {
        let stats = UsageStats {
            cringe_count: 7,
            time_saved_minutes: 0.5,
        };
        let m = stats.to_map();
        assert_eq!(m.get("cringeCount"), Some(&json!(7)));
        assert_eq!(m.get("timeSavedMinutes"), Some(&json!(0.5)));
        assert_eq!(UsageStats::from_map(&m), stats);
    }
}
