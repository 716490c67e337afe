//! Mock translator for testing
//!
//! Deterministic, network-free provider used by the orchestrator tests and
//! by the CLI's `--mock` flag. Every call is counted so tests can assert
//! how often the gateway was reached.
//!
//! # Example
//!
//! ```ignore
//! use flashcards::{MockMode, MockTranslator, Translator};
//!
//! #[tokio::test]
//! async fn test_translation() {
//!     let mock = MockTranslator::new(MockMode::Echo);
//!     let result = mock.translate("lead").await.unwrap();
//!     assert_eq!(result.main_translation, "lead_ru");
//!     assert_eq!(mock.calls(), 1);
//! }
//! ```

use crate::entity::{PartOfSpeech, WordTranslation};
use crate::error::{TranslateError, TranslateResult};
use crate::translator::{Translator, require_non_empty};
use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Mock translation modes for testing different scenarios
#[derive(Debug, Clone)]
pub enum MockMode {
    /// Synthesize a translation for any word: "lead" → "lead_ru"
    Echo,

    /// Use predefined translations keyed by word.
    /// Unknown words are reported as not supported.
    Mappings(HashMap<String, WordTranslation>),

    /// Report every word as not supported
    Unsupported,

    /// Simulate transport errors
    Error(String),
}

/// Mock translator that simulates gateway behaviour
///
/// Clones share the call counter.
#[derive(Debug, Clone)]
pub struct MockTranslator {
    mode: MockMode,
    source_lang: String,
    target_lang: String,
    /// Optional simulated network delay (in milliseconds)
    delay_ms: u64,
    calls: Arc<AtomicUsize>,
}

impl MockTranslator {
    /// Create a new MockTranslator for the en → ru pair
    pub fn new(mode: MockMode) -> Self {
        Self::with_langs(mode, "en", "ru")
    }

    /// Create a MockTranslator for an explicit language pair
    pub fn with_langs(mode: MockMode, source_lang: &str, target_lang: &str) -> Self {
        Self {
            mode,
            source_lang: source_lang.to_string(),
            target_lang: target_lang.to_string(),
            delay_ms: 0,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Add a simulated delay to every call
    ///
    /// # Example
    ///
    /// ```ignore
    /// let mock = MockTranslator::new(MockMode::Echo).with_delay(50);
    /// // Each translation will take ~50ms
    /// ```
    pub fn with_delay(mut self, delay_ms: u64) -> Self {
        self.delay_ms = delay_ms;
        self
    }

    /// Number of `translate` calls made so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Build the translation `Echo` mode returns for `word`
    pub fn echo_translation(&self, word: &str) -> WordTranslation {
        let translated = format!("{}_{}", word, self.target_lang);
        let mut translations = BTreeMap::new();
        translations.insert(PartOfSpeech::from("noun"), vec![translated.clone()]);

        WordTranslation {
            word: word.to_string(),
            source_lang: self.source_lang.clone(),
            target_lang: self.target_lang.clone(),
            main_translation: translated,
            examples: vec![format!("an example with {}", word)],
            translations,
            ..Default::default()
        }
    }

    fn apply_translation(&self, word: &str) -> TranslateResult<WordTranslation> {
        match &self.mode {
            MockMode::Echo => Ok(self.echo_translation(word)),
            MockMode::Mappings(map) => map
                .get(word)
                .cloned()
                .ok_or(TranslateError::WordNotSupported),
            MockMode::Unsupported => Err(TranslateError::WordNotSupported),
            MockMode::Error(msg) => Err(TranslateError::Transport(msg.clone())),
        }
    }
}

#[async_trait]
impl Translator for MockTranslator {
    async fn translate(&self, word: &str) -> TranslateResult<WordTranslation> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        require_non_empty("word", word)?;

        if self.delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(self.delay_ms)).await;
        }

        self.apply_translation(word)
    }

    fn source_lang(&self) -> &str {
        &self.source_lang
    }

    fn target_lang(&self) -> &str {
        &self.target_lang
    }

    fn provider_name(&self) -> &str {
        "Mock Translator"
    }
}
