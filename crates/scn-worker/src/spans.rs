//! Scene span report.

use scn_models::{format_time, parse_timestamp, ClusterMap, SceneSpan, SceneSpans, ShotTimings};
use tracing::debug;

use crate::error::WorkerResult;

/// Earliest start and latest end of each final cluster's timed shots.
///
/// Clusters with no timed shot are left out. Unparseable timestamps abort
/// the report.
pub fn scene_spans(clusters: &ClusterMap, timings: &ShotTimings) -> WorkerResult<SceneSpans> {
    let mut spans = SceneSpans::new();

    for (&key, shots) in clusters {
        let mut bounds: Option<(f64, f64)> = None;
        let mut timed = 0usize;

        for shot in shots {
            let Some(timing) = timings.get(shot) else {
                continue;
            };
            let start = parse_timestamp(&timing.start_time)?;
            let end = parse_timestamp(&timing.end_time)?;
            timed += 1;
            bounds = Some(match bounds {
                Some((lo, hi)) => (lo.min(start), hi.max(end)),
                None => (start, end),
            });
        }

        if let Some((start, end)) = bounds {
            spans.insert(
                key,
                SceneSpan {
                    start_time: format_time(start),
                    end_time: format_time(end),
                    shot_count: timed,
                },
            );
        } else {
            debug!(cluster = key, "No timings for cluster, skipping span");
        }
    }

    Ok(spans)
}

#[cfg(test)]
mod tests {
    use super::*;
    use scn_models::{shot_ids, ShotId, ShotTiming};

    fn timing(start: &str, end: &str) -> ShotTiming {
        ShotTiming {
            start_time: start.to_string(),
            end_time: end.to_string(),
        }
    }

    #[test]
    fn test_scene_spans() {
        let mut clusters = ClusterMap::new();
        clusters.insert(1, shot_ids(["shot_1", "shot_2", "shot_3"]));
        clusters.insert(2, shot_ids(["shot_4"]));
        clusters.insert(3, shot_ids(["shot_9"]));

        let mut timings = ShotTimings::new();
        timings.insert(ShotId::from("shot_2"), timing("00:00:05", "00:00:09"));
        timings.insert(ShotId::from("shot_1"), timing("00:00:00", "00:00:05"));
        timings.insert(ShotId::from("shot_3"), timing("00:00:09", "00:01:02.7"));
        timings.insert(ShotId::from("shot_4"), timing("00:01:02", "00:01:30"));

        let spans = scene_spans(&clusters, &timings).unwrap();

        assert_eq!(spans.len(), 2);
        assert_eq!(spans[&1].start_time, "00:00:00");
        assert_eq!(spans[&1].end_time, "00:01:02");
        assert_eq!(spans[&1].shot_count, 3);
        assert_eq!(spans[&2].shot_count, 1);
        assert!(!spans.contains_key(&3));
    }

    #[test]
    fn test_bad_timestamp() {
        let mut clusters = ClusterMap::new();
        clusters.insert(1, shot_ids(["shot_1"]));
        let mut timings = ShotTimings::new();
        timings.insert(ShotId::from("shot_1"), timing("soon", "later"));

        assert!(scene_spans(&clusters, &timings).is_err());
    }
}
