//! JSON snapshot storage.
//!
//! This crate provides:
//! - Whole-document JSON load/save with atomic replacement
//! - Typed loaders for audio, video, cluster, timing and summary documents

pub mod documents;
pub mod error;
pub mod snapshot;

pub use documents::{
    load_audio_map, load_cluster_map, load_linked_cluster_map, load_scene_audio,
    load_scene_video, load_shot_timings, load_video_map, save_audio_map, save_cluster_map,
    save_linked_cluster_map, save_scene_spans, save_shot_timings, save_summaries,
    save_video_map,
};
pub use error::{StorageError, StorageResult};
pub use snapshot::{load_json, save_json, to_pretty_json};
