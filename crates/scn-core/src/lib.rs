//! Cluster refinement rules for shot-to-scene grouping.
//!
//! This crate provides:
//! - Per-shot audio/video merging and cluster feature aggregation
//! - Temporal distance and gap-based splitting
//! - Registry operations (reindex, prune, linked-cluster removal)
//! - Fixpoint merge passes for undersized clusters
//! - A read-only cluster quality diagnostic
//!
//! Everything here is synchronous and allocation-only; no I/O.

pub mod aggregate;
pub mod error;
pub mod evaluate;
pub mod linked;
pub mod merge;
pub mod registry;
pub mod shot_merge;
pub mod temporal;
pub mod textualize;

pub use aggregate::{aggregate, aggregate_records, aggregate_with, eligible_records, mean, most_common};
pub use error::{CoreError, CoreResult};
pub use evaluate::{evaluate, evaluate_clusters, ClusterQuality};
pub use linked::{LinkedClusterRegistry, RegistryCapabilities, RemovedGroups};
pub use merge::{absorb_singletons, merge_adjacent_undersized, MergeConfig};
pub use registry::{order_by_first_shot, positional, prune_and_reindex, reindex};
pub use shot_merge::{merge_shot_data, ConfidenceShotMerger, ShotMerger};
pub use temporal::{distance, sort_by_ordinal, split, DEFAULT_SPLIT_THRESHOLD};
pub use textualize::describe;
