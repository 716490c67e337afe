//! Batch-execute translation gateway for flashcards
//!
//! Builds the double-encoded RPC request, sends it, and decodes the
//! positional response into a [`flashcards::WordTranslation`].
//!
//! # Workflow Example
//!
//! ```ignore
//! use flashcards::{MemoryStore, WordService};
//! use flashcards_translate::GoogleTranslateProvider;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let provider = GoogleTranslateProvider::new(GoogleTranslateProvider::DEFAULT_URL, "en", "ru")?;
//!     let service = WordService::new(Arc::new(MemoryStore::new()), Arc::new(provider));
//!     // service.add_word(...) now fetches translations on first use
//!     Ok(())
//! }
//! ```

pub mod google_translate;
pub mod json_path;
pub mod request;
pub mod response;

// Re-export main types for convenient access
pub use google_translate::{GoogleTranslateProvider, finish_translation};
pub use json_path::JsonPath;
pub use request::{FORM_FIELD, RPC_ID, encode_form_body, encode_payload, encode_request};
pub use response::{decode_payload, decode_response};
