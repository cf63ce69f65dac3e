//! Structured run logging.
//!
//! Every line emitted through [`RunLogger`] carries the run id and the
//! operation name so a single run can be followed in JSON logs.

use tracing::{error, info, warn, Span};
use uuid::Uuid;

/// Logger bound to one run of one operation.
#[derive(Debug, Clone)]
pub struct RunLogger {
    run_id: String,
    operation: &'static str,
}

impl RunLogger {
    /// Create a logger with a fresh run id.
    ///
    /// # Arguments
    /// * `operation` - The kind of run (e.g., "recluster", "summarize")
    pub fn new(operation: &'static str) -> Self {
        Self {
            run_id: Uuid::new_v4().to_string(),
            operation,
        }
    }

    pub fn log_start(&self, message: &str) {
        info!(
            run_id = %self.run_id,
            operation = self.operation,
            "Run started: {}", message
        );
    }

    pub fn log_progress(&self, message: &str) {
        info!(
            run_id = %self.run_id,
            operation = self.operation,
            "Run progress: {}", message
        );
    }

    pub fn log_warning(&self, message: &str) {
        warn!(
            run_id = %self.run_id,
            operation = self.operation,
            "Run warning: {}", message
        );
    }

    pub fn log_error(&self, message: &str) {
        error!(
            run_id = %self.run_id,
            operation = self.operation,
            "Run error: {}", message
        );
    }

    pub fn log_completion(&self, message: &str) {
        info!(
            run_id = %self.run_id,
            operation = self.operation,
            "Run completed: {}", message
        );
    }

    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    /// Span carrying the run id and operation.
    pub fn create_span(&self) -> Span {
        tracing::info_span!(
            "run",
            run_id = %self.run_id,
            operation = self.operation
        )
    }
}
