//! Google Translate batch-execute provider
//!
//! Talks to the web frontend's undocumented batch-execute endpoint, the
//! one that returns dictionary data (definitions, examples, translations
//! grouped by part of speech) and not just a single translated string.
//!
//! # Example
//!
//! ```ignore
//! use flashcards::Translator;
//! use flashcards_translate::GoogleTranslateProvider;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let provider = GoogleTranslateProvider::new(
//!         GoogleTranslateProvider::DEFAULT_URL,
//!         "en",
//!         "ru",
//!     )?;
//!
//!     let translation = provider.translate("lead").await?;
//!     println!("{}", translation.main_translation);
//!     Ok(())
//! }
//! ```

use crate::request::{QUERY_PARAMS, encode_form_body};
use crate::response::decode_response;
use async_trait::async_trait;
use flashcards::{TranslateError, TranslateResult, Translator, WordTranslation, require_non_empty};
use reqwest::header::CONTENT_TYPE;
use std::time::Duration;
use tracing::debug;
use url::Url;

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded;charset=utf-8";

/// Google Translate batch-execute provider
///
/// The language pair is fixed at construction.
#[derive(Clone)]
pub struct GoogleTranslateProvider {
    /// HTTP client for async requests
    client: reqwest::Client,
    /// Endpoint including the fixed RPC query parameters
    endpoint: Url,
    source_lang: String,
    target_lang: String,
}

impl GoogleTranslateProvider {
    /// Public batch-execute endpoint of the translate web frontend
    pub const DEFAULT_URL: &'static str =
        "https://translate.google.com/_/TranslateWebserverUi/data/batchexecute";

    /// Request timeout used unless [`with_timeout`](Self::with_timeout) overrides it
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

    /// Create a provider for one language pair
    ///
    /// # Arguments
    ///
    /// * `base_url` - Batch-execute endpoint, usually [`Self::DEFAULT_URL`]
    /// * `source_lang` - Source language code (e.g., "en")
    /// * `target_lang` - Target language code (e.g., "ru")
    ///
    /// # Returns
    ///
    /// * `Ok(Self)` - New provider instance
    /// * `Err(TranslateError::Config)` - If the URL is invalid or a language is empty
    pub fn new(base_url: &str, source_lang: &str, target_lang: &str) -> TranslateResult<Self> {
        Self::with_timeout(base_url, source_lang, target_lang, Self::DEFAULT_TIMEOUT)
    }

    /// Create a provider with an explicit request timeout
    pub fn with_timeout(
        base_url: &str,
        source_lang: &str,
        target_lang: &str,
        timeout: Duration,
    ) -> TranslateResult<Self> {
        require_non_empty("source language", source_lang)
            .and_then(|_| require_non_empty("target language", target_lang))
            .map_err(|e| TranslateError::Config(e.to_string()))?;

        let endpoint = Self::endpoint(base_url)?;

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TranslateError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint,
            source_lang: source_lang.to_string(),
            target_lang: target_lang.to_string(),
        })
    }

    /// Append the fixed RPC query parameters to `base_url`
    fn endpoint(base_url: &str) -> TranslateResult<Url> {
        let mut url = Url::parse(base_url)
            .map_err(|e| TranslateError::Config(format!("Invalid translate URL '{}': {}", base_url, e)))?;
        url.query_pairs_mut().clear().extend_pairs(QUERY_PARAMS);
        Ok(url)
    }

    /// Full endpoint URL requests are sent to
    pub fn endpoint_url(&self) -> &str {
        self.endpoint.as_str()
    }

    /// POST the RPC for `word` and return the raw response body
    async fn fetch(&self, word: &str) -> TranslateResult<Vec<u8>> {
        let body = encode_form_body(word, &self.source_lang, &self.target_lang)?;

        let response = self
            .client
            .post(self.endpoint.clone())
            .header(CONTENT_TYPE, FORM_CONTENT_TYPE)
            .body(body)
            .send()
            .await
            .map_err(|e| TranslateError::Transport(format!("request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(TranslateError::Transport(format!(
                "unexpected status ({}): {}",
                status,
                error_text.chars().take(200).collect::<String>()
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| TranslateError::Transport(format!("reading response failed: {}", e)))?;
        Ok(bytes.to_vec())
    }
}

/// Turn a decoded body into the gateway's result for `word`
///
/// An empty `translations` map means the service does not know the word.
/// The entry is keyed by the word that was asked for, so later cache
/// lookups for that word find it.
pub fn finish_translation(
    word: &str,
    mut translation: WordTranslation,
) -> TranslateResult<WordTranslation> {
    if translation.translations.is_empty() {
        return Err(TranslateError::WordNotSupported);
    }
    if translation.word != word {
        debug!(requested = word, returned = %translation.word, "service echoed a different word");
        translation.word = word.to_string();
    }
    Ok(translation)
}

impl std::fmt::Debug for GoogleTranslateProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoogleTranslateProvider")
            .field("endpoint", &self.endpoint.as_str())
            .field("source_lang", &self.source_lang)
            .field("target_lang", &self.target_lang)
            .finish()
    }
}

#[async_trait]
impl Translator for GoogleTranslateProvider {
    async fn translate(&self, word: &str) -> TranslateResult<WordTranslation> {
        debug!(word, source = %self.source_lang, target = %self.target_lang, "calling translate RPC");
        let body = self.fetch(word).await?;
        let translation = decode_response(&body)?;
        finish_translation(word, translation)
    }

    fn source_lang(&self) -> &str {
        &self.source_lang
    }

    fn target_lang(&self) -> &str {
        &self.target_lang
    }

    fn provider_name(&self) -> &str {
        "Google Translate"
    }
}
