//! In-memory [`WordStore`]
//!
//! Mirrors the constraints of the relational schema the service was built
//! against: a unique translation per word, a unique membership per
//! (user, collection, word), and memberships referencing a cached
//! translation.

use crate::entity::{Collection, UserWords, WordEntry, WordTranslation, is_blank};
use crate::error::{StoreError, StoreResult};
use crate::store::WordStore;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::debug;

/// (user id, collection name, word)
type MembershipKey = (String, String, String);

#[derive(Debug, Clone)]
struct Schedule {
    last_repeat: DateTime<Utc>,
    time_diff: Duration,
}

#[derive(Debug, Default)]
struct Tables {
    translations: HashMap<String, WordTranslation>,
    memberships: BTreeMap<MembershipKey, Schedule>,
}

/// Store keeping every table in process memory
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
    translation_writes: AtomicUsize,
    membership_writes: AtomicUsize,
}

fn membership_key(user_id: &str, collection_name: &str, word: &str) -> MembershipKey {
    (
        user_id.to_string(),
        collection_name.to_string(),
        word.to_string(),
    )
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of cached translations
    pub async fn translation_count(&self) -> usize {
        self.tables.read().await.translations.len()
    }

    /// Number of membership rows across all users
    pub async fn membership_count(&self) -> usize {
        self.tables.read().await.memberships.len()
    }

    /// Cached translation for `word`
    pub async fn cached_translation(&self, word: &str) -> Option<WordTranslation> {
        self.tables.read().await.translations.get(word).cloned()
    }

    /// Successful `cache_translation` calls
    pub fn translation_writes(&self) -> usize {
        self.translation_writes.load(Ordering::SeqCst)
    }

    /// Successful `link_word_to_collection` calls
    pub fn membership_writes(&self) -> usize {
        self.membership_writes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl WordStore for MemoryStore {
    async fn is_word_in_collection(
        &self,
        user_id: &str,
        collection_name: &str,
        word: &str,
    ) -> StoreResult<bool> {
        let tables = self.tables.read().await;
        Ok(tables
            .memberships
            .contains_key(&membership_key(user_id, collection_name, word)))
    }

    async fn is_translation_cached(&self, word: &str) -> StoreResult<bool> {
        Ok(self.tables.read().await.translations.contains_key(word))
    }

    async fn cache_translation(&self, translation: &WordTranslation) -> StoreResult<()> {
        if !translation.is_cacheable() {
            return Err(StoreError::InvalidRecord(format!(
                "translation for '{}' has no word or no translations",
                translation.word
            )));
        }

        let mut tables = self.tables.write().await;
        if tables.translations.contains_key(&translation.word) {
            return Err(StoreError::DuplicateTranslation(translation.word.clone()));
        }
        tables
            .translations
            .insert(translation.word.clone(), translation.clone());
        self.translation_writes.fetch_add(1, Ordering::SeqCst);
        debug!(word = %translation.word, "cached translation");
        Ok(())
    }

    async fn link_word_to_collection(&self, collection: &Collection) -> StoreResult<()> {
        if is_blank(&collection.word) || is_blank(&collection.name) {
            return Err(StoreError::InvalidRecord(
                "membership needs a word and a collection name".to_string(),
            ));
        }

        let mut tables = self.tables.write().await;
        if !tables.translations.contains_key(&collection.word) {
            return Err(StoreError::InvalidRecord(format!(
                "no cached translation for '{}'",
                collection.word
            )));
        }

        let key = membership_key(&collection.user_id, &collection.name, &collection.word);
        if tables.memberships.contains_key(&key) {
            return Err(StoreError::DuplicateMembership {
                word: collection.word.clone(),
                collection: collection.name.clone(),
            });
        }
        tables.memberships.insert(
            key,
            Schedule {
                last_repeat: collection.last_repeat,
                time_diff: collection.time_diff,
            },
        );
        self.membership_writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn update_learn_interval(&self, collection: &Collection) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        let key = membership_key(&collection.user_id, &collection.name, &collection.word);
        // Updating a missing row touches nothing, like an UPDATE matching zero rows
        if let Some(schedule) = tables.memberships.get_mut(&key) {
            schedule.last_repeat = collection.last_repeat;
            schedule.time_diff = collection.time_diff;
        }
        Ok(())
    }

    async fn remove_word_from_collection(
        &self,
        user_id: &str,
        collection_name: &str,
        word: &str,
    ) -> StoreResult<()> {
        self.tables
            .write()
            .await
            .memberships
            .remove(&membership_key(user_id, collection_name, word));
        Ok(())
    }

    async fn list_user_words(&self, user_id: &str) -> StoreResult<UserWords> {
        let tables = self.tables.read().await;
        let mut user_words = UserWords::new();

        for ((owner, collection_name, word), schedule) in &tables.memberships {
            if owner != user_id {
                continue;
            }
            let translation = tables.translations.get(word).cloned().ok_or_else(|| {
                StoreError::Backend(format!("membership references uncached word '{}'", word))
            })?;
            user_words
                .words
                .entry(collection_name.clone())
                .or_default()
                .push(WordEntry {
                    translation,
                    last_repeat: schedule.last_repeat,
                    time_diff: schedule.time_diff,
                });
        }

        Ok(user_words)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::PartOfSpeech;
    use chrono::TimeZone;

    fn translation(word: &str) -> WordTranslation {
        let mut translations = BTreeMap::new();
        translations.insert(PartOfSpeech::from("noun"), vec![format!("{}_ru", word)]);
        WordTranslation {
            word: word.to_string(),
            source_lang: "en".to_string(),
            target_lang: "ru".to_string(),
            main_translation: format!("{}_ru", word),
            translations,
            ..Default::default()
        }
    }

    fn collection(user: &str, name: &str, word: &str) -> Collection {
        Collection::new(
            user,
            name,
            word,
            Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
            Duration::from_secs(60),
        )
    }

    // ========== Translation Cache Tests ==========

    #[tokio::test]
    async fn test_cache_translation() {
        let store = MemoryStore::new();
        assert!(!store.is_translation_cached("lead").await.unwrap());

        store.cache_translation(&translation("lead")).await.unwrap();

        assert!(store.is_translation_cached("lead").await.unwrap());
        assert_eq!(store.translation_count().await, 1);
        assert_eq!(store.translation_writes(), 1);
    }

    #[tokio::test]
    async fn test_cache_translation_duplicate_key() {
        let store = MemoryStore::new();
        store.cache_translation(&translation("lead")).await.unwrap();

        let result = store.cache_translation(&translation("lead")).await;
        assert_eq!(
            result,
            Err(StoreError::DuplicateTranslation("lead".to_string()))
        );
        assert_eq!(store.translation_count().await, 1);
    }

    #[tokio::test]
    async fn test_cache_translation_rejects_empty_translations() {
        let store = MemoryStore::new();
        let mut empty = translation("lead");
        empty.translations.clear();

        let result = store.cache_translation(&empty).await;
        assert!(matches!(result, Err(StoreError::InvalidRecord(_))));
        assert_eq!(store.translation_count().await, 0);
    }

    #[tokio::test]
    async fn test_cache_translation_rejects_empty_word() {
        let store = MemoryStore::new();
        let result = store.cache_translation(&translation("")).await;
        assert!(matches!(result, Err(StoreError::InvalidRecord(_))));
    }

    // ========== Membership Tests ==========

    #[tokio::test]
    async fn test_link_and_check_membership() {
        let store = MemoryStore::new();
        store.cache_translation(&translation("lead")).await.unwrap();
        store
            .link_word_to_collection(&collection("u1", "metals", "lead"))
            .await
            .unwrap();

        assert!(store.is_word_in_collection("u1", "metals", "lead").await.unwrap());
        assert!(!store.is_word_in_collection("u1", "verbs", "lead").await.unwrap());
        assert!(!store.is_word_in_collection("u2", "metals", "lead").await.unwrap());
    }

    #[tokio::test]
    async fn test_link_requires_cached_translation() {
        let store = MemoryStore::new();
        let result = store
            .link_word_to_collection(&collection("u1", "metals", "lead"))
            .await;
        assert!(matches!(result, Err(StoreError::InvalidRecord(_))));
        assert_eq!(store.membership_count().await, 0);
    }

    #[tokio::test]
    async fn test_link_duplicate_membership() {
        let store = MemoryStore::new();
        store.cache_translation(&translation("lead")).await.unwrap();
        let row = collection("u1", "metals", "lead");
        store.link_word_to_collection(&row).await.unwrap();

        let result = store.link_word_to_collection(&row).await;
        assert!(matches!(
            result,
            Err(StoreError::DuplicateMembership { .. })
        ));
        assert_eq!(store.membership_count().await, 1);
    }

    #[tokio::test]
    async fn test_link_rejects_empty_collection_name() {
        let store = MemoryStore::new();
        store.cache_translation(&translation("lead")).await.unwrap();
        let result = store
            .link_word_to_collection(&collection("u1", "", "lead"))
            .await;
        assert!(matches!(result, Err(StoreError::InvalidRecord(_))));
    }

    #[tokio::test]
    async fn test_link_rejects_blank_word() {
        let store = MemoryStore::new();
        let result = store
            .link_word_to_collection(&collection("u1", "metals", "   "))
            .await;
        assert!(matches!(result, Err(StoreError::InvalidRecord(_))));
        assert_eq!(store.membership_count().await, 0);
    }

    #[tokio::test]
    async fn test_remove_missing_membership_is_ok() {
        let store = MemoryStore::new();
        assert!(store
            .remove_word_from_collection("u1", "metals", "lead")
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn test_remove_membership_keeps_translation() {
        let store = MemoryStore::new();
        store.cache_translation(&translation("lead")).await.unwrap();
        store
            .link_word_to_collection(&collection("u1", "metals", "lead"))
            .await
            .unwrap();

        store
            .remove_word_from_collection("u1", "metals", "lead")
            .await
            .unwrap();

        assert_eq!(store.membership_count().await, 0);
        assert!(store.is_translation_cached("lead").await.unwrap());
    }

    // ========== Learn Interval Tests ==========

    #[tokio::test]
    async fn test_update_learn_interval() {
        let store = MemoryStore::new();
        store.cache_translation(&translation("lead")).await.unwrap();
        store
            .link_word_to_collection(&collection("u1", "metals", "lead"))
            .await
            .unwrap();

        let mut updated = collection("u1", "metals", "lead");
        updated.last_repeat = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        updated.time_diff = Duration::from_secs(121);
        store.update_learn_interval(&updated).await.unwrap();

        let words = store.list_user_words("u1").await.unwrap();
        let entry = &words.collection("metals").unwrap()[0];
        assert_eq!(entry.last_repeat, updated.last_repeat);
        assert_eq!(entry.time_diff, Duration::from_secs(121));
    }

    #[tokio::test]
    async fn test_update_missing_row_is_noop() {
        let store = MemoryStore::new();
        assert!(store
            .update_learn_interval(&collection("u1", "metals", "lead"))
            .await
            .is_ok());
        assert_eq!(store.membership_count().await, 0);
    }

    // ========== Listing Tests ==========

    #[tokio::test]
    async fn test_list_user_words_groups_by_collection() {
        let store = MemoryStore::new();
        for word in ["lead", "iron", "run"] {
            store.cache_translation(&translation(word)).await.unwrap();
        }
        for (name, word) in [("metals", "lead"), ("metals", "iron"), ("verbs", "run")] {
            store
                .link_word_to_collection(&collection("u1", name, word))
                .await
                .unwrap();
        }
        store
            .link_word_to_collection(&collection("u2", "metals", "lead"))
            .await
            .unwrap();

        let words = store.list_user_words("u1").await.unwrap();
        assert_eq!(words.words.len(), 2);
        assert_eq!(words.len(), 3);

        let metals: Vec<&str> = words
            .collection("metals")
            .unwrap()
            .iter()
            .map(|e| e.translation.word.as_str())
            .collect();
        assert_eq!(metals, vec!["iron", "lead"]);
    }

    #[tokio::test]
    async fn test_list_user_words_empty() {
        let store = MemoryStore::new();
        let words = store.list_user_words("nobody").await.unwrap();
        assert!(words.is_empty());
        assert_eq!(words, UserWords::new());
    }
}
