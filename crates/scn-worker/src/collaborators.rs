//! Collaborator seams around the re-clustering core.
//!
//! Shot segmentation and per-shot audio/video analysis run outside this
//! workspace; the pipeline only consumes their JSON output. The traits here
//! let an embedding process (or a test) plug those stages in directly.

use std::path::Path;

use scn_models::{AudioMap, AudioShotRecord, ShotId, ShotTiming, ShotTimings, VideoMap, VideoShotRecord};
use tracing::{debug, info};

use crate::error::WorkerResult;

/// One detected shot of the source video.
#[derive(Debug, Clone, PartialEq)]
pub struct ShotBoundary {
    pub shot_id: ShotId,
    pub start_secs: f64,
    pub end_secs: f64,
}

impl ShotBoundary {
    pub fn new(ordinal: u64, start_secs: f64, end_secs: f64) -> Self {
        Self {
            shot_id: ShotId::from_ordinal(ordinal),
            start_secs,
            end_secs,
        }
    }

    pub fn duration(&self) -> f64 {
        (self.end_secs - self.start_secs).max(0.0)
    }
}

/// Splits a video into shots, in temporal order.
pub trait ShotSegmenter: Send + Sync {
    fn segment(&self, video: &Path) -> WorkerResult<Vec<ShotBoundary>>;
}

/// Produces the audio-side record of one shot.
pub trait AudioAnalyzer: Send + Sync {
    fn analyze(&self, video: &Path, shot: &ShotBoundary) -> WorkerResult<AudioShotRecord>;
}

/// Produces the video-side record (sampled frames) of one shot.
pub trait VideoAnalyzer: Send + Sync {
    fn analyze(&self, video: &Path, shot: &ShotBoundary) -> WorkerResult<VideoShotRecord>;
}

/// Documents produced by the analysis stage.
#[derive(Debug, Clone, Default)]
pub struct ShotFeatures {
    pub audio: AudioMap,
    pub video: VideoMap,
    pub timings: ShotTimings,
}

/// Segment `video` and analyse every shot, one call per analyzer per shot.
pub fn collect_shot_features(
    video: &Path,
    segmenter: &dyn ShotSegmenter,
    audio_analyzer: &dyn AudioAnalyzer,
    video_analyzer: &dyn VideoAnalyzer,
) -> WorkerResult<ShotFeatures> {
    let shots = segmenter.segment(video)?;
    info!(video = %video.display(), shots = shots.len(), "Segmented video");

    let mut features = ShotFeatures::default();
    for shot in &shots {
        debug!(shot = %shot.shot_id, duration = shot.duration(), "Analysing shot");

        let audio = audio_analyzer.analyze(video, shot)?;
        let frames = video_analyzer.analyze(video, shot)?;

        features.audio.insert(shot.shot_id.clone(), audio);
        features.video.insert(shot.shot_id.clone(), frames);
        features.timings.insert(
            shot.shot_id.clone(),
            ShotTiming::from_seconds(shot.start_secs, shot.end_secs),
        );
    }

    Ok(features)
}
