//! Per-shot feature records.
//!
//! Two raw documents are produced by the external analyzers (one audio-side,
//! one video-side). They are merged per shot into a [`ShotFeatureRecord`],
//! which is also the shape of an aggregated cluster description.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::shot::ShotId;

/// Sentiment label attached to a shot's speech.
///
/// The label set is open: anything the sentiment model emits that is not
/// one of the common labels is kept verbatim in [`Sentiment::Other`].
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Sentiment {
    Positive,
    Neutral,
    Negative,
    /// No label was recorded
    #[default]
    Unknown,
    Other(String),
}

impl Sentiment {
    pub fn as_str(&self) -> &str {
        match self {
            Sentiment::Positive => "positive",
            Sentiment::Neutral => "neutral",
            Sentiment::Negative => "negative",
            Sentiment::Unknown => "unknown",
            Sentiment::Other(label) => label,
        }
    }

    /// Parse a model label. Common labels ignore case and surrounding
    /// whitespace; any other label is kept as written.
    pub fn parse(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "positive" => Sentiment::Positive,
            "neutral" => Sentiment::Neutral,
            "negative" => Sentiment::Negative,
            "unknown" | "" => Sentiment::Unknown,
            _ => Sentiment::Other(label.to_string()),
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Serialize for Sentiment {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Sentiment {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label = String::deserialize(deserializer)?;
        Ok(Sentiment::parse(&label))
    }
}

/// One transcribed speech segment of a shot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptSegment {
    /// Recognised text
    pub text: String,

    /// Text category assigned by the zero-shot labeler
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

/// Audio-side analysis of one shot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AudioShotRecord {
    #[serde(default)]
    pub transcriptions: Vec<TranscriptSegment>,

    #[serde(default)]
    pub sentiment: Sentiment,

    /// Root-mean-square loudness
    #[serde(default)]
    pub rms: f64,

    #[serde(default)]
    pub spectral_centroid: f64,

    #[serde(default)]
    pub spectral_bandwidth: f64,

    /// CLAP sound-class labels, strongest first
    #[serde(default)]
    pub clap_analysis: Vec<String>,

    /// Coarse sound category (e.g. `Speech`, `Music`)
    #[serde(default)]
    pub sound_type: String,
}

/// A detected object in an analysed frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    #[serde(rename = "class")]
    pub class_name: String,
    pub confidence: f64,
}

/// A recognised action/event in an analysed frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoEvent {
    pub name: String,
    pub probability: f64,
}

/// Video-side analysis of one sampled frame.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VideoFrameRecord {
    #[serde(default)]
    pub detections: Vec<Detection>,

    #[serde(default)]
    pub events: Vec<VideoEvent>,

    /// Free-text descriptions of tracked moving objects
    #[serde(default)]
    pub moving_objects: Vec<String>,
}

/// Video-side analysis of one shot: its sampled frames in order.
pub type VideoShotRecord = Vec<VideoFrameRecord>;

/// Audio document keyed by shot id.
pub type AudioMap = BTreeMap<ShotId, AudioShotRecord>;

/// Video document keyed by shot id.
pub type VideoMap = BTreeMap<ShotId, VideoShotRecord>;

/// Unified feature record of one shot.
///
/// Aggregated cluster descriptions share this exact shape, see
/// [`ClusterDescription`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShotFeatureRecord {
    pub transcription: String,
    pub sentiment: Sentiment,
    pub rms: f64,
    pub spectral_centroid: f64,
    pub spectral_bandwidth: f64,
    pub clap_analysis: String,
    pub labeled_transcriptions: String,
    pub avg_video_objects: BTreeSet<String>,
    pub avg_events: BTreeSet<String>,
    pub moving_objects: String,
    #[serde(default)]
    pub sound_type: String,
}

/// Aggregated description of a whole cluster.
pub type ClusterDescription = ShotFeatureRecord;
