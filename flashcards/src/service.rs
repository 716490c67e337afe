//! Word acquisition and collection management
//!
//! `WordService` decides, for each added word, whether the translation
//! provider has to be called and whether a translation must be cached, then
//! links the word to the user's collection. Every other operation is a
//! single store call.
//!
//! The service keeps no mutable state of its own. Two concurrent
//! `add_word` calls for a word nobody has added before can both miss the
//! cache and both reach the provider; the second cache write then fails
//! with a duplicate key, which [`DuplicateCachePolicy`] resolves. Two
//! concurrent adds of the same word to the same collection both end in
//! success with a single membership row, whatever the policy.
//!
//! Cancellation is dropping the future: an `add_word` abandoned while the
//! provider call is in flight performs no further writes.

use crate::entity::{Collection, UserWords, is_blank};
use crate::error::{StoreError, Step, WordError, WordResult};
use crate::store::WordStore;
use crate::translator::Translator;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// How a duplicate-key failure on the translation cache write is treated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DuplicateCachePolicy {
    /// Another request cached the word first; continue as if this write succeeded
    #[default]
    AcceptExisting,
    /// Surface the duplicate as a cache write failure
    Reject,
}

/// Orchestrates word acquisition against a store and a translator
#[derive(Clone)]
pub struct WordService {
    store: Arc<dyn WordStore>,
    translator: Arc<dyn Translator>,
    duplicate_policy: DuplicateCachePolicy,
}

impl WordService {
    pub fn new(store: Arc<dyn WordStore>, translator: Arc<dyn Translator>) -> Self {
        Self {
            store,
            translator,
            duplicate_policy: DuplicateCachePolicy::default(),
        }
    }

    pub fn with_duplicate_cache_policy(mut self, policy: DuplicateCachePolicy) -> Self {
        self.duplicate_policy = policy;
        self
    }

    pub fn duplicate_cache_policy(&self) -> DuplicateCachePolicy {
        self.duplicate_policy
    }

    /// Add a word to one of the user's collections.
    ///
    /// 1. If the word is already in the collection, nothing happens.
    /// 2. If the word has no cached translation, the translator is called
    ///    and its result cached. `WordNotSupported` stops here without any
    ///    write.
    /// 3. The membership row is written. A row that appeared since step 1
    ///    counts as written.
    pub async fn add_word(&self, collection: &Collection) -> WordResult<()> {
        validate(&collection.user_id, &collection.name, &collection.word)?;

        let in_collection = self
            .store
            .is_word_in_collection(&collection.user_id, &collection.name, &collection.word)
            .await
            .map_err(WordError::persistence(Step::MembershipCheck))?;
        if in_collection {
            debug!(
                user_id = %collection.user_id,
                collection = %collection.name,
                word = %collection.word,
                "word already in collection"
            );
            return Ok(());
        }

        let cached = self
            .store
            .is_translation_cached(&collection.word)
            .await
            .map_err(WordError::persistence(Step::CacheCheck))?;
        if cached {
            debug!(word = %collection.word, "translation cache hit");
        } else {
            self.acquire_translation(&collection.word).await?;
        }

        match self.store.link_word_to_collection(collection).await {
            Ok(()) => {}
            // A concurrent add of the same word linked it first
            Err(StoreError::DuplicateMembership { .. }) => {
                debug!(
                    user_id = %collection.user_id,
                    collection = %collection.name,
                    word = %collection.word,
                    "word linked concurrently"
                );
                return Ok(());
            }
            Err(source) => {
                return Err(WordError::Persistence {
                    step: Step::MembershipWrite,
                    source,
                });
            }
        }

        info!(
            user_id = %collection.user_id,
            collection = %collection.name,
            word = %collection.word,
            "word added to collection"
        );
        Ok(())
    }

    async fn acquire_translation(&self, word: &str) -> WordResult<()> {
        debug!(
            word,
            provider = self.translator.provider_name(),
            "translation cache miss"
        );
        let translation = self
            .translator
            .translate(word)
            .await
            .map_err(WordError::translation(Step::GatewayCall))?;

        match self.store.cache_translation(&translation).await {
            Ok(()) => Ok(()),
            Err(StoreError::DuplicateTranslation(existing))
                if self.duplicate_policy == DuplicateCachePolicy::AcceptExisting =>
            {
                warn!(word = %existing, "translation cached concurrently, keeping existing entry");
                Ok(())
            }
            Err(source) => Err(WordError::Persistence {
                step: Step::CacheWrite,
                source,
            }),
        }
    }

    /// Remove a word from a collection. Removing a word that is not there succeeds.
    pub async fn delete_word(
        &self,
        user_id: &str,
        collection_name: &str,
        word: &str,
    ) -> WordResult<()> {
        validate(user_id, collection_name, word)?;
        self.store
            .remove_word_from_collection(user_id, collection_name, word)
            .await
            .map_err(WordError::persistence(Step::MembershipRemoval))
    }

    /// Overwrite the learn interval of a membership row
    pub async fn update_learn_interval(&self, collection: &Collection) -> WordResult<()> {
        validate(&collection.user_id, &collection.name, &collection.word)?;
        self.store
            .update_learn_interval(collection)
            .await
            .map_err(WordError::persistence(Step::IntervalUpdate))
    }

    /// All words of a user grouped by collection
    pub async fn user_words(&self, user_id: &str) -> WordResult<UserWords> {
        if is_blank(user_id) {
            return Err(WordError::InvalidInput("user id cannot be empty".to_string()));
        }
        self.store
            .list_user_words(user_id)
            .await
            .map_err(WordError::persistence(Step::WordListing))
    }
}

fn validate(user_id: &str, collection_name: &str, word: &str) -> WordResult<()> {
    let missing = [
        ("user id", user_id),
        ("collection name", collection_name),
        ("word", word),
    ]
    .into_iter()
    .find(|(_, value)| is_blank(value));

    match missing {
        Some((field, _)) => Err(WordError::InvalidInput(format!("{} cannot be empty", field))),
        None => Ok(()),
    }
}
