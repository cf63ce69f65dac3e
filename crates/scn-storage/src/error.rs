//! Storage error types.

use std::path::Path;

use scn_models::ModelError;
use thiserror::Error;

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors that can occur while loading or persisting snapshots.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Snapshot not found: {0}")]
    NotFound(String),

    #[error("Failed to persist snapshot {path}: {message}")]
    PersistFailed { path: String, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid snapshot contents: {0}")]
    Model(#[from] ModelError),
}

impl StorageError {
    pub fn not_found(path: &Path) -> Self {
        Self::NotFound(path.display().to_string())
    }

    pub fn persist_failed(path: &Path, message: impl Into<String>) -> Self {
        Self::PersistFailed {
            path: path.display().to_string(),
            message: message.into(),
        }
    }

    /// True when the snapshot parsed but held malformed ids or keys.
    pub fn is_format_error(&self) -> bool {
        matches!(self, Self::Model(e) if e.is_format_error())
    }
}
