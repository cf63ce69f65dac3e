//! Cluster feature aggregation.
//!
//! Turns the member shots of a cluster into one [`ClusterDescription`]:
//! - categorical fields take the most frequent value (first seen wins ties)
//! - numeric fields take the arithmetic mean
//! - object/event sets take the union
//! - moving-object text is concatenated in member order
//!
//! Shots missing from either the audio or the video document are skipped.

use std::collections::{BTreeSet, HashMap};
use std::hash::Hash;

use scn_models::{AudioMap, ClusterDescription, ShotFeatureRecord, ShotId, VideoMap};
use tracing::debug;

use crate::error::{CoreError, CoreResult};
use crate::shot_merge::{ConfidenceShotMerger, ShotMerger};

/// Most frequent item; ties go to the item encountered first.
pub fn most_common<T, I>(items: I) -> Option<T>
where
    T: Eq + Hash + Clone,
    I: IntoIterator<Item = T>,
{
    // item -> (first position, count)
    let mut counts: HashMap<T, (usize, usize)> = HashMap::new();
    for (pos, item) in items.into_iter().enumerate() {
        counts.entry(item).or_insert((pos, 0)).1 += 1;
    }

    counts
        .into_iter()
        .min_by(|(_, (pos_a, count_a)), (_, (pos_b, count_b))| {
            count_b.cmp(count_a).then(pos_a.cmp(pos_b))
        })
        .map(|(item, _)| item)
}

/// Arithmetic mean, 0 for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

/// Merged records of the cluster members present in both documents, in member order.
pub fn eligible_records(
    shot_ids: &[ShotId],
    audio: &AudioMap,
    video: &VideoMap,
    merger: &dyn ShotMerger,
) -> Vec<ShotFeatureRecord> {
    shot_ids
        .iter()
        .filter_map(|shot| match (audio.get(shot), video.get(shot)) {
            (Some(a), Some(v)) => Some(merger.merge(a, v)),
            _ => {
                debug!(shot = %shot, "Skipping shot without both audio and video features");
                None
            }
        })
        .collect()
}

/// Aggregate a cluster using the default shot merger.
pub fn aggregate(
    shot_ids: &[ShotId],
    audio: &AudioMap,
    video: &VideoMap,
) -> CoreResult<ClusterDescription> {
    aggregate_with(shot_ids, audio, video, &ConfidenceShotMerger::default())
}

/// Aggregate a cluster with an explicit shot merger.
///
/// Fails with [`CoreError::EmptyAggregate`] when no member is eligible, since
/// the categorical fields would otherwise have to be made up.
pub fn aggregate_with(
    shot_ids: &[ShotId],
    audio: &AudioMap,
    video: &VideoMap,
    merger: &dyn ShotMerger,
) -> CoreResult<ClusterDescription> {
    let members = eligible_records(shot_ids, audio, video, merger);
    aggregate_records(&members).ok_or_else(|| CoreError::empty_aggregate(shot_ids.len()))
}

/// Aggregate already-merged records. Returns `None` for an empty slice.
pub fn aggregate_records(members: &[ShotFeatureRecord]) -> Option<ClusterDescription> {
    let transcription = most_common(members.iter().map(|m| m.transcription.clone()))?;
    let sentiment = most_common(members.iter().map(|m| m.sentiment.clone()))?;
    let clap_analysis = most_common(members.iter().map(|m| m.clap_analysis.clone()))?;
    let labeled_transcriptions =
        most_common(members.iter().map(|m| m.labeled_transcriptions.clone()))?;
    let sound_type = most_common(members.iter().map(|m| m.sound_type.clone()))?;

    let rms: Vec<f64> = members.iter().map(|m| m.rms).collect();
    let centroids: Vec<f64> = members.iter().map(|m| m.spectral_centroid).collect();
    let bandwidths: Vec<f64> = members.iter().map(|m| m.spectral_bandwidth).collect();

    let avg_video_objects: BTreeSet<String> = members
        .iter()
        .flat_map(|m| m.avg_video_objects.iter().cloned())
        .collect();
    let avg_events: BTreeSet<String> = members
        .iter()
        .flat_map(|m| m.avg_events.iter().cloned())
        .collect();

    let moving_objects = members
        .iter()
        .map(|m| m.moving_objects.as_str())
        .collect::<Vec<_>>()
        .join(", ");

    Some(ClusterDescription {
        transcription,
        sentiment,
        rms: mean(&rms),
        spectral_centroid: mean(&centroids),
        spectral_bandwidth: mean(&bandwidths),
        clap_analysis,
        labeled_transcriptions,
        avg_video_objects,
        avg_events,
        moving_objects,
        sound_type,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use scn_models::{AudioShotRecord, Sentiment, TranscriptSegment, VideoFrameRecord};

    fn audio_record(text: &str, sentiment: Sentiment, rms: f64, clap: &str) -> AudioShotRecord {
        AudioShotRecord {
            transcriptions: vec![TranscriptSegment { text: text.to_string(), label: None }],
            sentiment,
            rms,
            spectral_centroid: rms * 1000.0,
            spectral_bandwidth: rms * 100.0,
            clap_analysis: vec![clap.to_string()],
            sound_type: "Speech".to_string(),
        }
    }

    fn video_record(objects: &[&str], moving: &str) -> Vec<VideoFrameRecord> {
        vec![VideoFrameRecord {
            detections: objects
                .iter()
                .map(|o| scn_models::Detection { class_name: o.to_string(), confidence: 0.9 })
                .collect(),
            events: Vec::new(),
            moving_objects: vec![moving.to_string()],
        }]
    }

    fn fixture() -> (AudioMap, VideoMap) {
        let mut audio = AudioMap::new();
        audio.insert("shot_1".into(), audio_record("a", Sentiment::Neutral, 0.2, "Music"));
        audio.insert("shot_2".into(), audio_record("b", Sentiment::Positive, 0.4, "Speech"));
        audio.insert("shot_3".into(), audio_record("b", Sentiment::Positive, 0.6, "Music"));
        audio.insert("shot_4".into(), audio_record("z", Sentiment::Negative, 9.0, "Noise"));

        let mut video = VideoMap::new();
        video.insert("shot_1".into(), video_record(&["person"], "car"));
        video.insert("shot_2".into(), video_record(&["person", "dog"], "car"));
        video.insert("shot_3".into(), video_record(&["tree"], "bike"));
        // shot_4 has no video record
        (audio, video)
    }

    #[test]
    fn test_most_common_tie_prefers_first_seen() {
        assert_eq!(most_common(vec!["b", "a", "a", "b"]), Some("b"));
        assert_eq!(most_common(vec!["x", "y", "y"]), Some("y"));
        assert_eq!(most_common(Vec::<&str>::new()), None);
    }

    #[test]
    fn test_mean() {
        assert_eq!(mean(&[]), 0.0);
        assert!((mean(&[1.0, 2.0, 6.0]) - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_aggregate_cluster() {
        let (audio, video) = fixture();
        let shots = scn_models::shot_ids(["shot_1", "shot_2", "shot_3", "shot_4"]);

        let desc = aggregate(&shots, &audio, &video).unwrap();

        assert_eq!(desc.transcription, "b");
        assert_eq!(desc.sentiment, Sentiment::Positive);
        assert_eq!(desc.clap_analysis, "Music");
        // shot_4 is excluded from the mean
        assert!((desc.rms - 0.4).abs() < 1e-12);
        assert_eq!(
            desc.avg_video_objects.iter().collect::<Vec<_>>(),
            vec!["dog", "person", "tree"]
        );
        assert_eq!(desc.moving_objects, "car, car, bike");
        assert_eq!(desc.sound_type, "Speech");
    }

    #[test]
    fn test_aggregate_without_eligible_members() {
        let (audio, video) = fixture();
        let shots = scn_models::shot_ids(["shot_4", "shot_99"]);

        let err = aggregate(&shots, &audio, &video).unwrap_err();
        assert_eq!(err, CoreError::EmptyAggregate { member_count: 2 });
    }

    #[test]
    fn test_categorical_choice_is_a_most_frequent_member_value() {
        let (audio, video) = fixture();
        let shots = scn_models::shot_ids(["shot_3", "shot_1", "shot_2"]);
        let members = eligible_records(&shots, &audio, &video, &ConfidenceShotMerger::default());
        let desc = aggregate_records(&members).unwrap();

        let count = |value: &str| members.iter().filter(|m| m.clap_analysis == value).count();
        assert!(members.iter().any(|m| m.clap_analysis == desc.clap_analysis));
        for m in &members {
            assert!(count(&desc.clap_analysis) >= count(&m.clap_analysis));
        }
    }

    #[test]
    fn test_aggregate_keeps_unrecognised_sentiment() {
        let (mut audio, video) = fixture();
        let sad = Sentiment::parse("sad");
        audio.insert("shot_1".into(), audio_record("a", sad.clone(), 0.2, "Music"));
        audio.insert("shot_2".into(), audio_record("b", sad.clone(), 0.4, "Speech"));
        audio.insert("shot_3".into(), audio_record("b", Sentiment::parse("joyful"), 0.6, "Music"));
        let shots = scn_models::shot_ids(["shot_1", "shot_2", "shot_3"]);

        let desc = aggregate(&shots, &audio, &video).unwrap();

        assert_eq!(desc.sentiment, sad);
        assert_eq!(desc.sentiment.as_str(), "sad");
    }
}
