//! Domain entities shared by the store, the translator and the web layer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

/// Empty or whitespace only; such words, names and ids are never stored
pub fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Opaque part-of-speech tag as returned by the translation service
/// ("noun", "verb", ...). Values are never enumerated here.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PartOfSpeech(pub String);

impl PartOfSpeech {
    pub fn new(tag: impl Into<String>) -> Self {
        PartOfSpeech(tag.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PartOfSpeech {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PartOfSpeech {
    fn from(tag: &str) -> Self {
        PartOfSpeech(tag.to_string())
    }
}

/// A single dictionary definition with an optional usage example
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Definition {
    pub definition: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example: Option<String>,
}

/// Translation of one word for the deployment-wide language pair.
///
/// One entry exists per distinct word. An entry whose `translations` map is
/// empty means the service does not know the word; such an entry is never
/// cached.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WordTranslation {
    pub word: String,
    #[serde(rename = "source_language")]
    pub source_lang: String,
    #[serde(rename = "target_language")]
    pub target_lang: String,
    pub main_translation: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub examples: Vec<String>,
    #[serde(
        rename = "definitions_with_examples",
        default,
        skip_serializing_if = "BTreeMap::is_empty"
    )]
    pub definitions: BTreeMap<PartOfSpeech, Vec<Definition>>,
    #[serde(default)]
    pub translations: BTreeMap<PartOfSpeech, Vec<String>>,
}

impl WordTranslation {
    /// Whether this translation may be stored in the translation cache
    pub fn is_cacheable(&self) -> bool {
        !is_blank(&self.word) && !self.translations.is_empty()
    }
}

/// Membership of one word in one of a user's named collections, together
/// with its spaced-repetition state.
///
/// `time_diff` is carried as-is. The rule that owns it (each successful
/// repeat sets it to `2 * time_diff + 1`) lives with the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collection {
    pub user_id: String,
    pub word: String,
    #[serde(rename = "collection_name")]
    pub name: String,
    pub last_repeat: DateTime<Utc>,
    #[serde(with = "duration_nanos")]
    pub time_diff: Duration,
}

impl Collection {
    pub fn new(
        user_id: impl Into<String>,
        name: impl Into<String>,
        word: impl Into<String>,
        last_repeat: DateTime<Utc>,
        time_diff: Duration,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            word: word.into(),
            name: name.into(),
            last_repeat,
            time_diff,
        }
    }
}

/// Collection name used as the grouping key of [`UserWords`]
pub type CollectionName = String;

/// One word of a user's collection as shown when listing words
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordEntry {
    #[serde(flatten)]
    pub translation: WordTranslation,
    pub last_repeat: DateTime<Utc>,
    #[serde(with = "duration_nanos")]
    pub time_diff: Duration,
}

/// All words of a user grouped by collection name.
///
/// A user without any word has an empty `words` map, never an absent one.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UserWords {
    pub words: BTreeMap<CollectionName, Vec<WordEntry>>,
}

impl UserWords {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Total number of entries across all collections
    pub fn len(&self) -> usize {
        self.words.values().map(Vec::len).sum()
    }

    pub fn collection(&self, name: &str) -> Option<&[WordEntry]> {
        self.words.get(name).map(Vec::as_slice)
    }
}

/// Serializes a `Duration` as integer nanoseconds, the unit clients use
/// for learn intervals.
pub mod duration_nanos {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        let nanos = u64::try_from(value.as_nanos()).map_err(serde::ser::Error::custom)?;
        serializer.serialize_u64(nanos)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let nanos = u64::deserialize(deserializer)?;
        Ok(Duration::from_nanos(nanos))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_translation() -> WordTranslation {
        let mut translations = BTreeMap::new();
        translations.insert(PartOfSpeech::from("noun"), vec!["свинец".to_string()]);
        WordTranslation {
            word: "lead".to_string(),
            source_lang: "en".to_string(),
            target_lang: "ru".to_string(),
            main_translation: "вести".to_string(),
            translations,
            ..Default::default()
        }
    }

    #[test]
    fn test_cacheable_requires_translations() {
        let mut translation = sample_translation();
        assert!(translation.is_cacheable());

        translation.translations.clear();
        assert!(!translation.is_cacheable());
    }

    #[test]
    fn test_cacheable_requires_word() {
        let mut translation = sample_translation();
        translation.word.clear();
        assert!(!translation.is_cacheable());

        translation.word = "  ".to_string();
        assert!(!translation.is_cacheable());
    }

    #[test]
    fn test_translation_json_field_names() {
        let json = serde_json::to_value(sample_translation()).unwrap();
        assert_eq!(json["source_language"], "en");
        assert_eq!(json["target_language"], "ru");
        assert_eq!(json["translations"]["noun"][0], "свинец");
        // Empty optional groups are omitted
        assert!(json.get("examples").is_none());
        assert!(json.get("definitions_with_examples").is_none());
    }

    #[test]
    fn test_definition_example_omitted_when_absent() {
        let definition = Definition {
            definition: "a metal".to_string(),
            example: None,
        };
        let json = serde_json::to_value(&definition).unwrap();
        assert!(json.get("example").is_none());
    }

    #[test]
    fn test_empty_user_words_serializes_map() {
        let json = serde_json::to_string(&UserWords::new()).unwrap();
        assert_eq!(json, r#"{"words":{}}"#);
    }

    #[test]
    fn test_word_entry_flattens_translation() {
        let entry = WordEntry {
            translation: sample_translation(),
            last_repeat: Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap(),
            time_diff: Duration::from_secs(1),
        };
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["word"], "lead");
        assert_eq!(json["time_diff"], 1_000_000_000u64);
        assert_eq!(json["last_repeat"], "2024-01-02T03:04:05Z");
    }

    #[test]
    fn test_collection_reads_client_json() {
        let collection: Collection = serde_json::from_str(
            r#"{
                "user_id": "42",
                "word": "lead",
                "collection_name": "metals",
                "last_repeat": "2024-01-02T03:04:05Z",
                "time_diff": 3000000000
            }"#,
        )
        .unwrap();
        assert_eq!(collection.name, "metals");
        assert_eq!(collection.time_diff, Duration::from_secs(3));
    }

    #[test]
    fn test_user_words_len_counts_all_collections() {
        let entry = WordEntry {
            translation: sample_translation(),
            last_repeat: Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap(),
            time_diff: Duration::ZERO,
        };
        let mut words = UserWords::new();
        words.words.insert("a".to_string(), vec![entry.clone(), entry.clone()]);
        words.words.insert("b".to_string(), vec![entry]);
        assert_eq!(words.len(), 3);
        assert_eq!(words.collection("a").map(|c| c.len()), Some(2));
        assert!(words.collection("missing").is_none());
    }
}
