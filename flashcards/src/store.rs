//! Persistence port consumed by [`WordService`](crate::service::WordService)

use crate::entity::{Collection, UserWords, WordTranslation};
use crate::error::StoreResult;
use async_trait::async_trait;

/// Store for collection memberships and the shared translation cache.
///
/// Implementations hold their own connection handle; the trait exposes only
/// the operations word acquisition needs.
#[async_trait]
pub trait WordStore: Send + Sync {
    /// Whether `word` is a member of the user's collection `collection_name`
    async fn is_word_in_collection(
        &self,
        user_id: &str,
        collection_name: &str,
        word: &str,
    ) -> StoreResult<bool>;

    /// Whether a translation for `word` is already cached
    async fn is_translation_cached(&self, word: &str) -> StoreResult<bool>;

    /// Cache a translation.
    ///
    /// A second write for the same word must fail with
    /// [`StoreError::DuplicateTranslation`](crate::error::StoreError::DuplicateTranslation)
    /// so the caller can decide how to treat a lost race.
    async fn cache_translation(&self, translation: &WordTranslation) -> StoreResult<()>;

    /// Add a membership row for `collection`
    async fn link_word_to_collection(&self, collection: &Collection) -> StoreResult<()>;

    /// Overwrite `last_repeat` and `time_diff` of the matching membership row
    async fn update_learn_interval(&self, collection: &Collection) -> StoreResult<()>;

    /// Remove a membership row. Removing a missing row succeeds.
    async fn remove_word_from_collection(
        &self,
        user_id: &str,
        collection_name: &str,
        word: &str,
    ) -> StoreResult<()>;

    /// All words of a user grouped by collection name
    async fn list_user_words(&self, user_id: &str) -> StoreResult<UserWords>;
}
