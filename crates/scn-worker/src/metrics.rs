//! Run metrics.
//!
//! Recorded through the `metrics` facade; nothing is exported unless the
//! embedding process installs a recorder.

use metrics::{counter, histogram};

/// Metric names as constants for consistency.
pub mod names {
    pub const RUNS_TOTAL: &str = "scn_runs_total";
    pub const RUN_FAILURES_TOTAL: &str = "scn_run_failures_total";
    pub const STAGE_CLUSTERS: &str = "scn_stage_clusters";
    pub const EMPTY_AGGREGATES_TOTAL: &str = "scn_empty_aggregates_total";
    pub const RUN_DURATION_SECONDS: &str = "scn_run_duration_seconds";
}

/// Record a finished run.
pub fn record_run(operation: &str, duration_secs: f64) {
    let labels = [("operation", operation.to_string())];
    counter!(names::RUNS_TOTAL, &labels).increment(1);
    histogram!(names::RUN_DURATION_SECONDS, &labels).record(duration_secs);
}

/// Record a failed run.
pub fn record_run_failure(operation: &str) {
    let labels = [("operation", operation.to_string())];
    counter!(names::RUN_FAILURES_TOTAL, &labels).increment(1);
}

/// Record the number of clusters after a pipeline stage.
pub fn record_stage_clusters(stage: &'static str, clusters: usize) {
    let labels = [("stage", stage.to_string())];
    histogram!(names::STAGE_CLUSTERS, &labels).record(clusters as f64);
}

/// Record clusters excluded from the corpus for lack of eligible shots.
pub fn record_empty_aggregates(count: usize) {
    counter!(names::EMPTY_AGGREGATES_TOTAL).increment(count as u64);
}
