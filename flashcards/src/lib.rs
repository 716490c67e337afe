//! Vocabulary flashcards core
//!
//! Users add words to named collections; every word carries a translation
//! fetched once from a [`Translator`] and cached for all users.
//!
//! # Example
//!
//! ```ignore
//! use flashcards::{Collection, MemoryStore, MockMode, MockTranslator, WordService};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let service = WordService::new(
//!         Arc::new(MemoryStore::new()),
//!         Arc::new(MockTranslator::new(MockMode::Echo)),
//!     );
//!
//!     let word = Collection::new("user-1", "metals", "lead", chrono::Utc::now(), Default::default());
//!     service.add_word(&word).await?;
//!
//!     let words = service.user_words("user-1").await?;
//!     println!("{}", serde_json::to_string_pretty(&words)?);
//!     Ok(())
//! }
//! ```

pub mod entity;
pub mod error;
pub mod memory;
pub mod mock;
pub mod service;
pub mod store;
pub mod translator;

pub use entity::{
    Collection, CollectionName, Definition, PartOfSpeech, UserWords, WordEntry, WordTranslation,
    is_blank,
};
pub use error::{
    Step, StoreError, StoreResult, TranslateError, TranslateResult, WordError, WordResult,
};
pub use memory::MemoryStore;
pub use mock::{MockMode, MockTranslator};
pub use service::{DuplicateCachePolicy, WordService};
pub use store::WordStore;
pub use translator::{Translator, require_non_empty};
