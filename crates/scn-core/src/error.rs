//! Error types for clustering rules.

use thiserror::Error;

use scn_models::ModelError;

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur while refining clusters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// Malformed shot id or cluster key.
    #[error("Format error: {0}")]
    Format(#[from] ModelError),

    /// No member of the cluster had both an audio and a video record.
    #[error("Cannot aggregate cluster: none of its {member_count} shots has both audio and video features")]
    EmptyAggregate { member_count: usize },

    /// Operation requires a registry capability that is switched off.
    #[error("Registry capability '{0}' is disabled")]
    CapabilityDisabled(&'static str),
}

impl CoreError {
    pub fn empty_aggregate(member_count: usize) -> Self {
        Self::EmptyAggregate { member_count }
    }

    /// Check if this is a malformed-input error that must abort the run.
    pub fn is_format_error(&self) -> bool {
        matches!(self, CoreError::Format(_))
    }
}
