//! Cluster registry operations on flat snapshots.
//!
//! Reindexing replaces the whole key space: every cluster is split on
//! temporal gaps and each resulting group receives a fresh key above the
//! previous maximum. Pruning drops empty clusters and compacts keys to
//! `1..=N`.

use scn_models::{keyed_from, ClusterKey, ClusterMap, ModelError, ShotId};
use tracing::debug;

use crate::error::CoreResult;
use crate::temporal::{sort_by_ordinal, split};

/// Split every cluster on gaps above `threshold` and re-key the groups.
///
/// New keys start right after the largest existing key and strictly
/// increase in iteration order. The multiset of shot ids is unchanged.
///
/// Fails with a format error when the key space above the largest key is
/// too small for the new groups.
pub fn reindex(clusters: &ClusterMap, threshold: u64) -> CoreResult<ClusterMap> {
    let Some(max_key) = clusters.keys().next_back().copied() else {
        return Ok(ClusterMap::new());
    };

    let mut last_key = max_key;
    let mut reindexed = ClusterMap::new();

    for shots in clusters.values() {
        let mut members = shots.clone();
        members.sort();
        for group in split(&members, threshold)? {
            last_key = last_key
                .checked_add(1)
                .ok_or_else(|| ModelError::invalid_cluster_key(max_key.to_string()))?;
            reindexed.insert(last_key, group);
        }
    }

    debug!(
        input_clusters = clusters.len(),
        output_clusters = reindexed.len(),
        threshold,
        "Reindexed clusters"
    );

    Ok(reindexed)
}

/// Drop empty clusters and re-key the rest as `1..=N`, keeping their order.
pub fn prune_and_reindex(clusters: ClusterMap) -> ClusterMap {
    let before = clusters.len();
    let pruned = keyed_from(1, clusters.into_values().filter(|shots| !shots.is_empty()));

    debug!(before, after = pruned.len(), "Pruned empty clusters");
    pruned
}

/// Order clusters by their lowest shot ordinal, with shots sorted inside each.
///
/// Empty clusters sort last.
pub fn order_by_first_shot(clusters: ClusterMap) -> CoreResult<Vec<Vec<ShotId>>> {
    let mut ordered = Vec::with_capacity(clusters.len());
    for mut shots in clusters.into_values() {
        sort_by_ordinal(&mut shots)?;
        let first = match shots.first() {
            Some(shot) => shot.ordinal()?,
            None => u64::MAX,
        };
        ordered.push((first, shots));
    }
    ordered.sort_by_key(|(first, _)| *first);

    Ok(ordered.into_iter().map(|(_, shots)| shots).collect())
}

/// Key ordered clusters sequentially from zero.
pub fn positional(clusters: Vec<Vec<ShotId>>) -> ClusterMap {
    keyed_from(0 as ClusterKey, clusters)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::merge::absorb_singletons;
    use scn_models::{shot_ids, total_shots};

    fn sorted_ids(clusters: &ClusterMap) -> Vec<ShotId> {
        let mut ids: Vec<ShotId> = clusters.values().flatten().cloned().collect();
        ids.sort();
        ids
    }

    #[test]
    fn test_reindex_scenario() {
        let mut clusters = ClusterMap::new();
        clusters.insert(0, shot_ids(["shot_1", "shot_2", "shot_15"]));
        clusters.insert(1, shot_ids(["shot_20"]));

        let reindexed = reindex(&clusters, 10).unwrap();

        let mut expected = ClusterMap::new();
        expected.insert(2, shot_ids(["shot_1", "shot_2"]));
        expected.insert(3, shot_ids(["shot_15"]));
        expected.insert(4, shot_ids(["shot_20"]));
        assert_eq!(reindexed, expected);
    }

    #[test]
    fn test_reindex_preserves_shot_multiset() {
        let mut clusters = ClusterMap::new();
        clusters.insert(5, shot_ids(["shot_9", "shot_30", "shot_1", "shot_31"]));
        clusters.insert(7, shot_ids(["shot_100"]));
        clusters.insert(8, Vec::new());

        for threshold in [0, 1, 10, 1000] {
            let reindexed = reindex(&clusters, threshold).unwrap();
            assert_eq!(sorted_ids(&reindexed), sorted_ids(&clusters));
            assert_eq!(total_shots(&reindexed), total_shots(&clusters));
            assert!(reindexed.keys().all(|k| *k > 8));
        }
    }

    #[test]
    fn test_reindex_empty_and_malformed() {
        assert!(reindex(&ClusterMap::new(), 10).unwrap().is_empty());

        let mut clusters = ClusterMap::new();
        clusters.insert(0, shot_ids(["shot_1", "credits"]));
        assert!(reindex(&clusters, 10).unwrap_err().is_format_error());
    }

    #[test]
    fn test_reindex_rejects_exhausted_key_space() {
        let mut clusters = ClusterMap::new();
        clusters.insert(u64::MAX, shot_ids(["shot_1"]));

        let err = reindex(&clusters, 10).unwrap_err();
        assert!(err.is_format_error());

        clusters.clear();
        clusters.insert(u64::MAX - 1, shot_ids(["shot_1", "shot_50"]));
        assert!(reindex(&clusters, 10).unwrap_err().is_format_error());

        clusters.clear();
        clusters.insert(u64::MAX - 1, shot_ids(["shot_1"]));
        assert_eq!(reindex(&clusters, 10).unwrap().keys().next(), Some(&u64::MAX));
    }

    #[test]
    fn test_prune_and_reindex() {
        let clusters = positional(vec![
            shot_ids(["shot_1", "shot_2"]),
            Vec::new(),
            shot_ids(["shot_3"]),
            Vec::new(),
        ]);

        let pruned = prune_and_reindex(clusters);
        assert_eq!(pruned.keys().copied().collect::<Vec<_>>(), vec![1, 2]);
        assert_eq!(pruned[&1], shot_ids(["shot_1", "shot_2"]));
        assert_eq!(pruned[&2], shot_ids(["shot_3"]));
    }

    #[test]
    fn test_absorb_then_prune_scenario() {
        let clusters = vec![
            shot_ids(["shot_1"]),
            shot_ids(["shot_2", "shot_3"]),
            shot_ids(["shot_4"]),
        ];

        let final_clusters = prune_and_reindex(positional(absorb_singletons(clusters, 2)));

        let mut expected = ClusterMap::new();
        expected.insert(1, shot_ids(["shot_1", "shot_2", "shot_3", "shot_4"]));
        assert_eq!(final_clusters, expected);
    }

    #[test]
    fn test_order_by_first_shot() {
        let mut clusters = ClusterMap::new();
        clusters.insert(1, shot_ids(["shot_12", "shot_10"]));
        clusters.insert(2, Vec::new());
        clusters.insert(3, shot_ids(["shot_3", "shot_2"]));

        let ordered = order_by_first_shot(clusters).unwrap();
        assert_eq!(
            ordered,
            vec![shot_ids(["shot_2", "shot_3"]), shot_ids(["shot_10", "shot_12"]), Vec::new()]
        );
    }
}
