//! Typed loaders and writers for every persisted document.

use std::collections::BTreeMap;
use std::path::Path;

use scn_models::{
    parse_cluster_keys, AudioMap, AudioShotRecord, ClusterMap, LinkedClusterMap, SceneSpans,
    SceneSummaries, ShotId, ShotTimings, VideoMap, VideoShotRecord,
};
use tracing::info;

use crate::error::StorageResult;
use crate::snapshot::{load_json, save_json};

/// Per-shot audio analysis document.
pub fn load_audio_map(path: &Path) -> StorageResult<AudioMap> {
    let map: AudioMap = load_json(path)?;
    info!(path = %path.display(), shots = map.len(), "Loaded audio document");
    Ok(map)
}

/// Per-shot video analysis document.
pub fn load_video_map(path: &Path) -> StorageResult<VideoMap> {
    let map: VideoMap = load_json(path)?;
    info!(path = %path.display(), shots = map.len(), "Loaded video document");
    Ok(map)
}

pub fn save_audio_map(path: &Path, map: &AudioMap) -> StorageResult<()> {
    save_json(path, map)
}

pub fn save_video_map(path: &Path, map: &VideoMap) -> StorageResult<()> {
    save_json(path, map)
}

/// Flat cluster snapshot. Keys must be stringified integers.
pub fn load_cluster_map(path: &Path) -> StorageResult<ClusterMap> {
    let raw: BTreeMap<String, Vec<ShotId>> = load_json(path)?;
    let clusters = parse_cluster_keys(raw)?;
    info!(path = %path.display(), clusters = clusters.len(), "Loaded cluster snapshot");
    Ok(clusters)
}

pub fn save_cluster_map(path: &Path, clusters: &ClusterMap) -> StorageResult<()> {
    save_json(path, clusters)?;
    info!(path = %path.display(), clusters = clusters.len(), "Saved cluster snapshot");
    Ok(())
}

/// Linked snapshot whose members may name other clusters.
pub fn load_linked_cluster_map(path: &Path) -> StorageResult<LinkedClusterMap> {
    load_json(path)
}

pub fn save_linked_cluster_map(path: &Path, clusters: &LinkedClusterMap) -> StorageResult<()> {
    save_json(path, clusters)
}

/// `shot_id -> {start_time, end_time}` document.
pub fn load_shot_timings(path: &Path) -> StorageResult<ShotTimings> {
    load_json(path)
}

pub fn save_shot_timings(path: &Path, timings: &ShotTimings) -> StorageResult<()> {
    save_json(path, timings)
}

pub fn save_scene_spans(path: &Path, spans: &SceneSpans) -> StorageResult<()> {
    save_json(path, spans)?;
    info!(path = %path.display(), scenes = spans.len(), "Saved scene spans");
    Ok(())
}

/// Audio records keyed by scene id.
pub fn load_scene_audio(path: &Path) -> StorageResult<BTreeMap<String, AudioShotRecord>> {
    load_json(path)
}

/// Video records keyed by scene id.
pub fn load_scene_video(path: &Path) -> StorageResult<BTreeMap<String, VideoShotRecord>> {
    load_json(path)
}

pub fn save_summaries(path: &Path, summaries: &SceneSummaries) -> StorageResult<()> {
    save_json(path, summaries)?;
    info!(path = %path.display(), scenes = summaries.len(), "Saved scene summaries");
    Ok(())
}
