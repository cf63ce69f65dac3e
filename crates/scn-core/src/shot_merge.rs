//! Merging one shot's audio and video analysis into a feature record.

use std::collections::BTreeSet;

use scn_models::{AudioShotRecord, ShotFeatureRecord, VideoShotRecord};

use crate::aggregate::most_common;

/// Default confidence a detection needs to count as a visible object.
pub const DEFAULT_MIN_DETECTION_CONFIDENCE: f64 = 0.7;

/// Default probability an event needs to count as present.
pub const DEFAULT_MIN_EVENT_PROBABILITY: f64 = 0.7;

/// Combines one shot's audio-side and video-side records.
pub trait ShotMerger: Send + Sync {
    fn merge(&self, audio: &AudioShotRecord, video: &VideoShotRecord) -> ShotFeatureRecord;
}

/// Merger that keeps only confident detections and events.
#[derive(Debug, Clone, Copy)]
pub struct ConfidenceShotMerger {
    pub min_detection_confidence: f64,
    pub min_event_probability: f64,
}

impl Default for ConfidenceShotMerger {
    fn default() -> Self {
        Self {
            min_detection_confidence: DEFAULT_MIN_DETECTION_CONFIDENCE,
            min_event_probability: DEFAULT_MIN_EVENT_PROBABILITY,
        }
    }
}

impl ShotMerger for ConfidenceShotMerger {
    fn merge(&self, audio: &AudioShotRecord, video: &VideoShotRecord) -> ShotFeatureRecord {
        let transcription = audio
            .transcriptions
            .iter()
            .map(|segment| segment.text.trim())
            .filter(|text| !text.is_empty())
            .collect::<Vec<_>>()
            .join(" ");

        let labeled_transcriptions =
            most_common(audio.transcriptions.iter().filter_map(|s| s.label.clone()))
                .unwrap_or_default();

        let clap_analysis = most_common(audio.clap_analysis.iter().cloned()).unwrap_or_default();

        let avg_video_objects: BTreeSet<String> = video
            .iter()
            .flat_map(|frame| frame.detections.iter())
            .filter(|det| det.confidence > self.min_detection_confidence)
            .map(|det| det.class_name.clone())
            .collect();

        let avg_events: BTreeSet<String> = video
            .iter()
            .flat_map(|frame| frame.events.iter())
            .filter(|event| event.probability > self.min_event_probability)
            .map(|event| event.name.clone())
            .collect();

        let moving_objects = video
            .iter()
            .flat_map(|frame| frame.moving_objects.iter())
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ");

        ShotFeatureRecord {
            transcription,
            sentiment: audio.sentiment.clone(),
            rms: audio.rms,
            spectral_centroid: audio.spectral_centroid,
            spectral_bandwidth: audio.spectral_bandwidth,
            clap_analysis,
            labeled_transcriptions,
            avg_video_objects,
            avg_events,
            moving_objects,
            sound_type: audio.sound_type.clone(),
        }
    }
}

/// Merge with the default confidence thresholds.
pub fn merge_shot_data(audio: &AudioShotRecord, video: &VideoShotRecord) -> ShotFeatureRecord {
    ConfidenceShotMerger::default().merge(audio, video)
}
