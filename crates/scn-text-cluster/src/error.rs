//! Text clustering error types.

use thiserror::Error;

/// Result type for text clustering operations.
pub type TextClusterResult<T> = Result<T, TextClusterError>;

/// Errors raised by the text clustering service.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TextClusterError {
    #[error("Cannot vectorize an empty corpus")]
    EmptyCorpus,

    #[error("Corpus of {0} documents produced an empty vocabulary")]
    EmptyVocabulary(usize),
}
