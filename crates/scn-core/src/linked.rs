//! Linked-cluster registry.
//!
//! In this mode a cluster's members may name other clusters, and removing a
//! cluster also removes every cluster that references it. The re-clustering
//! pipeline never builds linked snapshots, so the registry is gated behind
//! [`RegistryCapabilities::linked_clusters`].

use std::collections::BTreeMap;

use scn_models::LinkedClusterMap;
use tracing::{info, warn};

use crate::error::{CoreError, CoreResult};

/// Optional registry features.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RegistryCapabilities {
    /// Allow cluster-of-clusters snapshots and cascading removal
    pub linked_clusters: bool,
}

impl RegistryCapabilities {
    pub fn with_linked_clusters(mut self, enabled: bool) -> Self {
        self.linked_clusters = enabled;
        self
    }
}

/// Removed groups keyed by the cluster id that was asked for.
pub type RemovedGroups = BTreeMap<String, Vec<Vec<String>>>;

/// Registry over a snapshot whose members may reference cluster ids.
#[derive(Debug, Clone)]
pub struct LinkedClusterRegistry {
    clusters: LinkedClusterMap,
}

impl LinkedClusterRegistry {
    /// Wrap a linked snapshot. Requires the `linked_clusters` capability.
    pub fn new(clusters: LinkedClusterMap, capabilities: RegistryCapabilities) -> CoreResult<Self> {
        if !capabilities.linked_clusters {
            return Err(CoreError::CapabilityDisabled("linked_clusters"));
        }
        warn!("Linked-cluster mode is not integrated with the re-clustering pipeline");
        Ok(Self { clusters })
    }

    /// Remove `cluster_id` and every cluster that references it.
    ///
    /// Each removed non-empty cluster is recorded as its members followed by
    /// its own id. The cascade is one level deep. Returns an empty map when
    /// nothing was recorded.
    pub fn remove(&mut self, cluster_id: &str) -> RemovedGroups {
        let mut removed = Vec::new();

        if let Some(members) = self.clusters.remove(cluster_id) {
            if !members.is_empty() {
                removed.push(with_own_id(members, cluster_id));
            }
        }

        let referencing: Vec<String> = self
            .clusters
            .iter()
            .filter(|(_, members)| members.iter().any(|m| m == cluster_id))
            .map(|(key, _)| key.clone())
            .collect();

        for key in referencing {
            if let Some(members) = self.clusters.remove(&key) {
                if !members.is_empty() {
                    removed.push(with_own_id(members, &key));
                }
            }
        }

        info!(cluster_id, removed_groups = removed.len(), "Removed linked cluster");

        if removed.is_empty() {
            RemovedGroups::new()
        } else {
            RemovedGroups::from([(cluster_id.to_string(), removed)])
        }
    }

    pub fn clusters(&self) -> &LinkedClusterMap {
        &self.clusters
    }

    pub fn into_inner(self) -> LinkedClusterMap {
        self.clusters
    }
}

fn with_own_id(mut members: Vec<String>, id: &str) -> Vec<String> {
    members.push(id.to_string());
    members
}
