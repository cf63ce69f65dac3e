//! Error types for model parsing.

use thiserror::Error;

/// Result type for model operations.
pub type ModelResult<T> = Result<T, ModelError>;

/// Errors raised while interpreting identifiers and snapshot keys.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    /// Shot identifier has no parseable ordinal (`shot_<n>`).
    #[error("Shot id '{0}' has no parseable ordinal")]
    InvalidShotId(String),

    /// Cluster key is not a non-negative integer, or leaves no room for new keys.
    #[error("Cluster key '{0}' is not a usable integer key")]
    InvalidClusterKey(String),

    #[error("Invalid timestamp '{0}'")]
    InvalidTimestamp(String),
}

impl ModelError {
    pub fn invalid_shot_id(id: impl Into<String>) -> Self {
        Self::InvalidShotId(id.into())
    }

    pub fn invalid_cluster_key(key: impl Into<String>) -> Self {
        Self::InvalidClusterKey(key.into())
    }

    pub fn invalid_timestamp(ts: impl Into<String>) -> Self {
        Self::InvalidTimestamp(ts.into())
    }

    /// Identifier and key errors are malformed-input conditions that abort a run.
    pub fn is_format_error(&self) -> bool {
        matches!(self, ModelError::InvalidShotId(_) | ModelError::InvalidClusterKey(_))
    }
}
