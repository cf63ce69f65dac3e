//! Fixpoint merge passes for undersized clusters.
//!
//! Both passes restart until nothing changes. A single linear sweep does not
//! reach the same partition when several small clusters sit next to each
//! other, so the restart semantics are part of the contract.

use tracing::debug;

/// Clusters smaller than this are merged with a small neighbour.
pub const DEFAULT_MIN_ADJACENT_SIZE: usize = 4;

/// Clusters smaller than this are absorbed into a neighbour.
pub const DEFAULT_MIN_CLUSTER_SIZE: usize = 2;

/// Size thresholds for the merge passes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MergeConfig {
    pub min_adjacent_size: usize,
    pub min_cluster_size: usize,
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self {
            min_adjacent_size: DEFAULT_MIN_ADJACENT_SIZE,
            min_cluster_size: DEFAULT_MIN_CLUSTER_SIZE,
        }
    }
}

/// Concatenate consecutive pairs that are both below `min_size`, until stable.
///
/// Within a pass a merged pair is not reconsidered; the next comparison
/// starts after the consumed neighbour.
pub fn merge_adjacent_undersized<T>(clusters: Vec<Vec<T>>, min_size: usize) -> Vec<Vec<T>> {
    let mut clusters = clusters;
    let mut passes = 0usize;

    loop {
        passes += 1;
        let mut changed = false;
        let mut merged = Vec::with_capacity(clusters.len());
        let mut iter = clusters.into_iter().peekable();

        while let Some(mut current) = iter.next() {
            if current.len() < min_size {
                if let Some(next) = iter.next_if(|next| next.len() < min_size) {
                    current.extend(next);
                    changed = true;
                }
            }
            merged.push(current);
        }

        clusters = merged;
        if !changed {
            break;
        }
    }

    debug!(passes, clusters = clusters.len(), "Adjacent merge reached fixpoint");
    clusters
}

/// Fold clusters below `min_size` into a neighbour, restarting after every merge.
///
/// The first position pulls in the next non-empty cluster; any other
/// position is appended to its predecessor. Donor slots are left empty so
/// positions stay stable; pruning removes them later.
pub fn absorb_singletons<T>(clusters: Vec<Vec<T>>, min_size: usize) -> Vec<Vec<T>> {
    let mut clusters = clusters;
    let mut merges = 0usize;
    let mut i = 0;

    while i < clusters.len() {
        let size = clusters[i].len();
        if size == 0 || size >= min_size {
            i += 1;
            continue;
        }

        if i == 0 {
            match (1..clusters.len()).find(|&j| !clusters[j].is_empty()) {
                Some(j) => {
                    let donor = std::mem::take(&mut clusters[j]);
                    clusters[0].extend(donor);
                }
                // Nothing left to absorb
                None => break,
            }
        } else {
            let donor = std::mem::take(&mut clusters[i]);
            clusters[i - 1].extend(donor);
        }

        merges += 1;
        i = 0;
    }

    debug!(merges, "Singleton absorption reached fixpoint");
    clusters
}
