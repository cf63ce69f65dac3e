//! Shared data models for shot-to-scene clustering.
//!
//! This crate provides Serde-serializable types for:
//! - Shot identifiers and their temporal ordinals
//! - Raw audio/video analysis records and merged feature records
//! - Cluster snapshots (flat and linked)
//! - Shot timings and scene spans

pub mod cluster;
pub mod error;
pub mod features;
pub mod shot;
pub mod timing;

// Re-export common types
pub use cluster::{
    keyed_from, parse_cluster_keys, total_shots, ClusterKey, ClusterMap, LinkedClusterMap,
    SceneSummaries,
};
pub use error::{ModelError, ModelResult};
pub use features::{
    AudioMap, AudioShotRecord, ClusterDescription, Detection, Sentiment, ShotFeatureRecord,
    TranscriptSegment, VideoEvent, VideoFrameRecord, VideoMap, VideoShotRecord,
};
pub use shot::{shot_ids, ShotId};
pub use timing::{format_time, parse_timestamp, SceneSpan, SceneSpans, ShotTiming, ShotTimings};
