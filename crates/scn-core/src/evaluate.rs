//! Cluster quality diagnostics.
//!
//! Rewards clusters whose members carry many objects/events while staying
//! consistent in mood and sound category:
//!
//! ```text
//! score = (avg_object_count + avg_event_count)
//!         / (distinct_sentiments + distinct_sound_types + 1)
//! ```

use std::collections::{BTreeMap, BTreeSet};

use scn_models::ShotFeatureRecord;

/// Quality breakdown for one label.
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterQuality {
    pub member_count: usize,
    pub avg_object_count: f64,
    pub avg_event_count: f64,
    pub distinct_sentiments: usize,
    pub distinct_sound_types: usize,
    pub score: f64,
}

impl ClusterQuality {
    fn from_members(members: &[&ShotFeatureRecord]) -> Self {
        let n = members.len().max(1) as f64;
        let avg_object_count =
            members.iter().map(|m| m.avg_video_objects.len()).sum::<usize>() as f64 / n;
        let avg_event_count = members.iter().map(|m| m.avg_events.len()).sum::<usize>() as f64 / n;
        let distinct_sentiments = members.iter().map(|m| &m.sentiment).collect::<BTreeSet<_>>().len();
        let distinct_sound_types = members
            .iter()
            .map(|m| m.sound_type.as_str())
            .collect::<BTreeSet<_>>()
            .len();

        let score = (avg_object_count + avg_event_count)
            / (distinct_sentiments + distinct_sound_types + 1) as f64;

        Self {
            member_count: members.len(),
            avg_object_count,
            avg_event_count,
            distinct_sentiments,
            distinct_sound_types,
            score,
        }
    }
}

/// Per-label quality breakdown.
///
/// `labels[i]` is the label of the i-th record; extra labels or records
/// beyond the shorter of the two are ignored.
pub fn evaluate_clusters<'a, L, I>(labels: &[L], records: I) -> BTreeMap<L, ClusterQuality>
where
    L: Ord + Clone,
    I: IntoIterator<Item = &'a ShotFeatureRecord>,
{
    let mut grouped: BTreeMap<L, Vec<&ShotFeatureRecord>> = BTreeMap::new();
    for (label, record) in labels.iter().zip(records) {
        grouped.entry(label.clone()).or_default().push(record);
    }

    grouped
        .into_iter()
        .map(|(label, members)| (label, ClusterQuality::from_members(&members)))
        .collect()
}

/// Per-label score.
pub fn evaluate<'a, L, I>(labels: &[L], records: I) -> BTreeMap<L, f64>
where
    L: Ord + Clone,
    I: IntoIterator<Item = &'a ShotFeatureRecord>,
{
    evaluate_clusters(labels, records)
        .into_iter()
        .map(|(label, quality)| (label, quality.score))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use scn_models::Sentiment;

    fn record(objects: &[&str], events: &[&str], sentiment: Sentiment, sound: &str) -> ShotFeatureRecord {
        ShotFeatureRecord {
            sentiment,
            sound_type: sound.to_string(),
            avg_video_objects: objects.iter().map(|s| s.to_string()).collect(),
            avg_events: events.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_evaluate_scores() {
        let records = vec![
            record(&["person", "car"], &["talking"], Sentiment::Positive, "Speech"),
            record(&["person"], &[], Sentiment::Positive, "Speech"),
            record(&["dog", "ball", "tree"], &["running", "barking"], Sentiment::Neutral, "Music"),
        ];
        let labels = vec![0, 0, 1];

        let scores = evaluate(&labels, &records);

        // label 0: (1.5 + 0.5) / (1 + 1 + 1)
        assert!((scores[&0] - 2.0 / 3.0).abs() < 1e-12);
        // single member: diversity terms are 1 each
        assert!((scores[&1] - 5.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_diversity_lowers_score() {
        let records = vec![
            record(&["a"], &[], Sentiment::Positive, "Speech"),
            record(&["a"], &[], Sentiment::Negative, "Music"),
        ];
        let quality = evaluate_clusters(&["x", "x"], &records);

        let q = &quality["x"];
        assert_eq!(q.member_count, 2);
        assert_eq!(q.distinct_sentiments, 2);
        assert_eq!(q.distinct_sound_types, 2);
        assert!((q.score - 0.2).abs() < 1e-12);
    }

    #[test]
    fn test_evaluate_empty() {
        let records: Vec<ShotFeatureRecord> = Vec::new();
        assert!(evaluate::<u32, _>(&[], &records).is_empty());
    }

    #[test]
    fn test_unrecognised_sentiments_stay_distinct() {
        let records = vec![
            record(&["a"], &[], Sentiment::parse("sad"), "Speech"),
            record(&["a"], &[], Sentiment::parse("joyful"), "Speech"),
        ];
        let quality = evaluate_clusters(&["x", "x"], &records);

        assert_eq!(quality["x"].distinct_sentiments, 2);
    }
}
