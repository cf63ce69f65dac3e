//! Worker error types.

use thiserror::Error;

pub type WorkerResult<T> = Result<T, WorkerError>;

#[derive(Debug, Error)]
pub enum WorkerError {
    #[error("No cluster could be described; nothing to re-cluster")]
    EmptyCorpus,

    #[error("Clustering service returned {actual} labels for {expected} descriptions")]
    LabelMismatch { expected: usize, actual: usize },

    #[error("Analysis failed: {0}")]
    AnalysisFailed(String),

    #[error("AI analysis failed: {0}")]
    AiFailed(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Core error: {0}")]
    Core(#[from] scn_core::CoreError),

    #[error("Text clustering error: {0}")]
    TextCluster(#[from] scn_text_cluster::TextClusterError),

    #[error("Storage error: {0}")]
    Storage(#[from] scn_storage::StorageError),

    #[error("Model error: {0}")]
    Model(#[from] scn_models::ModelError),
}

impl WorkerError {
    pub fn analysis_failed(msg: impl Into<String>) -> Self {
        Self::AnalysisFailed(msg.into())
    }

    pub fn ai_failed(msg: impl Into<String>) -> Self {
        Self::AiFailed(msg.into())
    }

    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    /// Check if the run was aborted by malformed shot ids or cluster keys.
    pub fn is_format_error(&self) -> bool {
        match self {
            WorkerError::Core(e) => e.is_format_error(),
            WorkerError::Storage(e) => e.is_format_error(),
            WorkerError::Model(e) => e.is_format_error(),
            _ => false,
        }
    }
}
