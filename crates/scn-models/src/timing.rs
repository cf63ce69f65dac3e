//! Shot timings and scene spans.
//!
//! The segmenter records each shot's boundaries as `HH:MM:SS` strings. Once
//! shots are grouped into scenes, a scene's span runs from its earliest shot
//! start to its latest shot end.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::cluster::ClusterKey;
use crate::error::{ModelError, ModelResult};
use crate::shot::ShotId;

/// Start/end of one shot in the source video.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShotTiming {
    /// Start timestamp (HH:MM:SS)
    pub start_time: String,
    /// End timestamp (HH:MM:SS)
    pub end_time: String,
}

impl ShotTiming {
    /// Build from seconds, truncating to whole seconds.
    pub fn from_seconds(start_secs: f64, end_secs: f64) -> Self {
        Self {
            start_time: format_time(start_secs),
            end_time: format_time(end_secs),
        }
    }
}

/// Timing document keyed by shot id.
pub type ShotTimings = BTreeMap<ShotId, ShotTiming>;

/// Time span covered by one final scene.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SceneSpan {
    pub start_time: String,
    pub end_time: String,
    /// Number of shots in the scene that had timings
    pub shot_count: usize,
}

/// Scene spans keyed by final cluster key.
pub type SceneSpans = BTreeMap<ClusterKey, SceneSpan>;

/// Parse `HH:MM:SS`, `MM:SS` or `SS` (fractional seconds allowed) to seconds.
///
/// # Examples
/// ```
/// use scn_models::timing::parse_timestamp;
/// assert_eq!(parse_timestamp("01:01:01").unwrap(), 3661.0);
/// assert_eq!(parse_timestamp("05:30").unwrap(), 330.0);
/// ```
pub fn parse_timestamp(ts: &str) -> ModelResult<f64> {
    let ts = ts.trim();
    let parts: Vec<&str> = ts.split(':').collect();
    if ts.is_empty() || parts.len() > 3 {
        return Err(ModelError::invalid_timestamp(ts));
    }

    let mut total = 0.0;
    for part in &parts {
        let value: f64 = part
            .parse()
            .map_err(|_| ModelError::invalid_timestamp(ts))?;
        if value < 0.0 || !value.is_finite() {
            return Err(ModelError::invalid_timestamp(ts));
        }
        total = total * 60.0 + value;
    }
    Ok(total)
}

/// Format seconds as zero-padded `HH:MM:SS`, dropping the fractional part.
pub fn format_time(seconds: f64) -> String {
    let whole = seconds.max(0.0) as u64;
    let hours = whole / 3600;
    let minutes = (whole % 3600) / 60;
    let secs = whole % 60;
    format!("{:02}:{:02}:{:02}", hours, minutes, secs)
}
