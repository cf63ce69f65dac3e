//! Cluster snapshot models.

use std::collections::BTreeMap;

use crate::error::{ModelError, ModelResult};
use crate::shot::ShotId;

/// Key of a cluster in a flat snapshot.
pub type ClusterKey = u64;

/// Flat snapshot: cluster key → ordered shot ids.
///
/// Iteration order is ascending key order, which matches allocation order
/// since reindexing always hands out strictly increasing keys.
pub type ClusterMap = BTreeMap<ClusterKey, Vec<ShotId>>;

/// Snapshot in which a cluster's members may be shot ids or other cluster ids.
pub type LinkedClusterMap = BTreeMap<String, Vec<String>>;

/// One-sentence summaries keyed by scene id.
pub type SceneSummaries = BTreeMap<String, String>;

/// Convert a snapshot with stringified keys into a [`ClusterMap`].
pub fn parse_cluster_keys(raw: BTreeMap<String, Vec<ShotId>>) -> ModelResult<ClusterMap> {
    raw.into_iter()
        .map(|(key, shots)| {
            key.trim()
                .parse::<ClusterKey>()
                .map(|k| (k, shots))
                .map_err(|_| ModelError::invalid_cluster_key(key))
        })
        .collect()
}

/// Total number of shot ids across all clusters.
pub fn total_shots(clusters: &ClusterMap) -> usize {
    clusters.values().map(Vec::len).sum()
}

/// Key the given ordered clusters from `start` upward.
pub fn keyed_from<I>(start: ClusterKey, clusters: I) -> ClusterMap
where
    I: IntoIterator<Item = Vec<ShotId>>,
{
    clusters
        .into_iter()
        .enumerate()
        .map(|(idx, shots)| (start + idx as ClusterKey, shots))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shot::shot_ids;

    #[test]
    fn test_parse_cluster_keys() {
        let mut raw = BTreeMap::new();
        raw.insert("10".to_string(), shot_ids(["shot_1"]));
        raw.insert("2".to_string(), shot_ids(["shot_5", "shot_6"]));

        let parsed = parse_cluster_keys(raw).unwrap();
        assert_eq!(parsed.keys().copied().collect::<Vec<_>>(), vec![2, 10]);
        assert_eq!(total_shots(&parsed), 3);
    }

    #[test]
    fn test_parse_cluster_keys_rejects_names() {
        let mut raw = BTreeMap::new();
        raw.insert("cluster_a".to_string(), shot_ids(["shot_1"]));

        assert_eq!(
            parse_cluster_keys(raw),
            Err(ModelError::InvalidClusterKey("cluster_a".to_string()))
        );
    }

    #[test]
    fn test_keyed_from() {
        let map = keyed_from(1, vec![shot_ids(["shot_1"]), Vec::new()]);
        assert_eq!(map.keys().copied().collect::<Vec<_>>(), vec![1, 2]);
        assert!(map[&2].is_empty());
    }
}
