/// Error types for translation, persistence and word acquisition
use std::fmt;
use thiserror::Error;

/// Failure of a translation provider
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TranslateError {
    /// The remote service could not be reached or answered with a failure status
    #[error("transport error: {0}")]
    Transport(String),
    /// The response body could not be parsed even defensively
    #[error("decode error: {0}")]
    Decode(String),
    /// The service answered but has no translation for the word
    #[error("word not supported")]
    WordNotSupported,
    /// A required request argument was empty
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// The provider could not be constructed
    #[error("configuration error: {0}")]
    Config(String),
}

/// Result type for translation providers
pub type TranslateResult<T> = Result<T, TranslateError>;

/// Failure reported by a [`WordStore`](crate::store::WordStore)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// A translation for this word is already cached
    #[error("translation for '{0}' is already cached")]
    DuplicateTranslation(String),
    /// The word is already a member of the collection
    #[error("word '{word}' is already in collection '{collection}'")]
    DuplicateMembership { word: String, collection: String },
    /// The record violates a store invariant
    #[error("invalid record: {0}")]
    InvalidRecord(String),
    /// Any other backend failure
    #[error("store backend error: {0}")]
    Backend(String),
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Step of a word operation, attached to every propagated failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Step {
    MembershipCheck,
    CacheCheck,
    GatewayCall,
    CacheWrite,
    MembershipWrite,
    IntervalUpdate,
    MembershipRemoval,
    WordListing,
}

impl Step {
    pub fn name(&self) -> &'static str {
        match self {
            Step::MembershipCheck => "membership check",
            Step::CacheCheck => "cache check",
            Step::GatewayCall => "gateway call",
            Step::CacheWrite => "cache write",
            Step::MembershipWrite => "membership write",
            Step::IntervalUpdate => "interval update",
            Step::MembershipRemoval => "membership removal",
            Step::WordListing => "word listing",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Failure of a [`WordService`](crate::service::WordService) operation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WordError {
    /// The translation service has no translation for the word.
    /// This is a client-facing outcome, not a server fault.
    #[error("word not supported")]
    WordNotSupported,
    /// The caller supplied an empty user id, word or collection name
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// The translation provider failed
    #[error("{step} failed: {source}")]
    Translation {
        step: Step,
        #[source]
        source: TranslateError,
    },
    /// The store failed
    #[error("{step} failed: {source}")]
    Persistence {
        step: Step,
        #[source]
        source: StoreError,
    },
}

impl WordError {
    pub(crate) fn persistence(step: Step) -> impl FnOnce(StoreError) -> WordError {
        move |source| WordError::Persistence { step, source }
    }

    /// Lifts a provider failure; `WordNotSupported` keeps its own variant
    pub(crate) fn translation(step: Step) -> impl FnOnce(TranslateError) -> WordError {
        move |source| match source {
            TranslateError::WordNotSupported => WordError::WordNotSupported,
            source => WordError::Translation { step, source },
        }
    }

    /// The step that failed, if the error came from a collaborator
    pub fn step(&self) -> Option<Step> {
        match self {
            WordError::Translation { step, .. } | WordError::Persistence { step, .. } => {
                Some(*step)
            }
            WordError::WordNotSupported | WordError::InvalidInput(_) => None,
        }
    }

    pub fn is_word_not_supported(&self) -> bool {
        matches!(self, WordError::WordNotSupported)
    }
}

/// Result type for word operations
pub type WordResult<T> = Result<T, WordError>;
