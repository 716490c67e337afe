use flashcards::DuplicateCachePolicy;
use flashcards_translate::GoogleTranslateProvider;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{key} has invalid value '{value}': {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

/// Server configuration read from `FLASHCARDS_*` environment variables
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub translate_url: String,
    pub source_lang: String,
    pub target_lang: String,
    pub translate_timeout: Duration,
    pub duplicate_cache_policy: DuplicateCachePolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8000,
            translate_url: GoogleTranslateProvider::DEFAULT_URL.to_string(),
            source_lang: "en".to_string(),
            target_lang: "ru".to_string(),
            translate_timeout: GoogleTranslateProvider::DEFAULT_TIMEOUT,
            duplicate_cache_policy: DuplicateCachePolicy::AcceptExisting,
        }
    }
}

impl Config {
    /// Read the configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read the configuration through `lookup`; unset keys keep their defaults
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Config::default();

        if let Some(host) = lookup("FLASHCARDS_HOST") {
            config.host = host;
        }
        if let Some(port) = lookup("FLASHCARDS_PORT") {
            config.port = parse("FLASHCARDS_PORT", port)?;
        }
        if let Some(url) = lookup("FLASHCARDS_TRANSLATE_URL") {
            config.translate_url = url;
        }
        if let Some(lang) = lookup("FLASHCARDS_SOURCE_LANG") {
            config.source_lang = lang;
        }
        if let Some(lang) = lookup("FLASHCARDS_TARGET_LANG") {
            config.target_lang = lang;
        }
        if let Some(secs) = lookup("FLASHCARDS_TRANSLATE_TIMEOUT_SECS") {
            config.translate_timeout =
                Duration::from_secs(parse("FLASHCARDS_TRANSLATE_TIMEOUT_SECS", secs)?);
        }
        if let Some(accept) = lookup("FLASHCARDS_ACCEPT_DUPLICATE_CACHE") {
            config.duplicate_cache_policy =
                if parse::<bool>("FLASHCARDS_ACCEPT_DUPLICATE_CACHE", accept)? {
                    DuplicateCachePolicy::AcceptExisting
                } else {
                    DuplicateCachePolicy::Reject
                };
        }

        Ok(config)
    }

    /// Socket address to bind, e.g. `127.0.0.1:8000`
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse<T>(key: &'static str, value: String) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
        key,
        reason: e.to_string(),
        value,
    })
}
