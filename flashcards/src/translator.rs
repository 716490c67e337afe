//! Translation provider trait
//!
//! The `Translator` trait decouples word acquisition from any concrete
//! translation backend (the batch-execute gateway, a mock, ...).
//!
//! # Example
//!
//! ```ignore
//! use flashcards::{MockMode, MockTranslator, Translator};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let provider = MockTranslator::new(MockMode::Echo);
//!     let translation = provider.translate("lead").await?;
//!     println!("{}", translation.main_translation); // "lead_ru"
//!     Ok(())
//! }
//! ```

use crate::entity::{WordTranslation, is_blank};
use crate::error::{TranslateError, TranslateResult};
use async_trait::async_trait;

/// Generic trait for translation providers
///
/// The source and target languages are fixed per provider instance; they
/// are deployment configuration, not request arguments.
#[async_trait]
pub trait Translator: Send + Sync {
    /// Translate a single word
    ///
    /// # Returns
    ///
    /// * `Ok(WordTranslation)` - A translation with at least one entry in
    ///   `translations`
    /// * `Err(TranslateError::WordNotSupported)` - The provider knows nothing
    ///   about the word
    /// * `Err(TranslateError)` - Any other failure
    async fn translate(&self, word: &str) -> TranslateResult<WordTranslation>;

    /// Source language code used for every request
    fn source_lang(&self) -> &str;

    /// Target language code used for every request
    fn target_lang(&self) -> &str;

    /// Name of this provider, for logging
    fn provider_name(&self) -> &str;
}

/// Reject empty request arguments
///
/// Language codes are not checked any further; malformed codes are left for
/// the remote service to reject.
///
/// # Example
///
/// ```ignore
/// require_non_empty("word", "lead")?; // OK
/// require_non_empty("word", "").unwrap_err(); // InvalidInput
/// ```
pub fn require_non_empty(field: &str, value: &str) -> TranslateResult<()> {
    if is_blank(value) {
        return Err(TranslateError::InvalidInput(format!(
            "{} cannot be empty",
            field
        )));
    }
    Ok(())
}
