//! Re-clustering orchestrator.
//!
//! One run takes the initial cluster snapshot through:
//! temporal reindex, aggregation, textualization, semantic clustering,
//! reconciliation, ordering, the two merge passes and the final prune.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};

use scn_core::{
    absorb_singletons, aggregate_with, describe, evaluate, merge_adjacent_undersized,
    order_by_first_shot, positional, prune_and_reindex, reindex, ConfidenceShotMerger, CoreError,
    ShotMerger,
};
use scn_models::{total_shots, AudioMap, ClusterDescription, ClusterKey, ClusterMap, VideoMap};
use scn_text_cluster::{serialize_labels, LocalTextClusterer, TextClusteringService};

use crate::config::PipelineConfig;
use crate::error::{WorkerError, WorkerResult};
use crate::logging::RunLogger;
use crate::metrics;
use crate::spans::scene_spans;

const OPERATION: &str = "recluster";

/// Cluster counts after each stage of a run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunStats {
    pub initial_clusters: usize,
    pub temporal_clusters: usize,
    pub described_clusters: usize,
    pub empty_aggregates: usize,
    pub chosen_k: usize,
    pub semantic_clusters: usize,
    pub merged_clusters: usize,
    pub final_clusters: usize,
    pub total_shots: usize,
}

/// Outcome of one run.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub run_id: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    /// Final snapshot, keys `1..=N`
    pub clusters: ClusterMap,
    pub stats: RunStats,
    /// Quality score per semantic label
    pub scores: BTreeMap<usize, f64>,
}

/// Drives the re-clustering pipeline.
pub struct Reclusterer {
    config: PipelineConfig,
    text_clusterer: Arc<dyn TextClusteringService>,
    merger: Arc<dyn ShotMerger>,
}

impl Reclusterer {
    /// Orchestrator with the in-process text clusterer and default shot merger.
    pub fn new(config: PipelineConfig) -> Self {
        let text_clusterer = LocalTextClusterer::new().with_max_k(config.max_k);
        Self {
            config,
            text_clusterer: Arc::new(text_clusterer),
            merger: Arc::new(ConfidenceShotMerger::default()),
        }
    }

    pub fn with_text_clusterer(mut self, service: Arc<dyn TextClusteringService>) -> Self {
        self.text_clusterer = service;
        self
    }

    pub fn with_shot_merger(mut self, merger: Arc<dyn ShotMerger>) -> Self {
        self.merger = merger;
        self
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Load the configured documents, run, and persist the final snapshot.
    ///
    /// When a timings document is configured the scene span report is
    /// written as well.
    pub fn run(&self) -> WorkerResult<RunReport> {
        let logger = RunLogger::new(OPERATION);
        let _span = logger.create_span().entered();
        let started = Instant::now();

        let result = self.run_logged(&logger);

        match &result {
            Ok(report) => {
                metrics::record_run(OPERATION, started.elapsed().as_secs_f64());
                logger.log_completion(&format!(
                    "{} shots in {} scenes written to {}",
                    report.stats.total_shots,
                    report.stats.final_clusters,
                    self.config.output_path.display()
                ));
            }
            Err(e) => {
                metrics::record_run_failure(OPERATION);
                logger.log_error(&e.to_string());
            }
        }

        result
    }

    fn run_logged(&self, logger: &RunLogger) -> WorkerResult<RunReport> {
        logger.log_start(&format!("clusters from {}", self.config.clusters_path.display()));

        let audio = scn_storage::load_audio_map(&self.config.audio_path)?;
        let video = scn_storage::load_video_map(&self.config.video_path)?;
        let clusters = scn_storage::load_cluster_map(&self.config.clusters_path)?;
        let timings = match &self.config.timings_path {
            Some(path) => Some(scn_storage::load_shot_timings(path)?),
            None => None,
        };

        let report = self.run_with_logger(logger, &audio, &video, &clusters)?;

        // Nothing is written unless every output can be produced
        let spans = match &timings {
            Some(timings) => Some(scene_spans(&report.clusters, timings)?),
            None => None,
        };

        scn_storage::save_cluster_map(&self.config.output_path, &report.clusters)?;
        if let Some(spans) = &spans {
            scn_storage::save_scene_spans(&self.config.resolved_spans_path(), spans)?;
        }

        Ok(report)
    }

    /// Run the pipeline on in-memory documents. Nothing is persisted.
    pub fn run_with_inputs(
        &self,
        audio: &AudioMap,
        video: &VideoMap,
        clusters: &ClusterMap,
    ) -> WorkerResult<RunReport> {
        let logger = RunLogger::new(OPERATION);
        self.run_with_logger(&logger, audio, video, clusters)
    }

    fn run_with_logger(
        &self,
        logger: &RunLogger,
        audio: &AudioMap,
        video: &VideoMap,
        clusters: &ClusterMap,
    ) -> WorkerResult<RunReport> {
        let started_at = Utc::now();
        let threshold = self.config.split_threshold;
        let mut stats = RunStats {
            initial_clusters: clusters.len(),
            total_shots: total_shots(clusters),
            ..Default::default()
        };

        // Temporal reindex
        let temporal = reindex(clusters, threshold)?;
        stats.temporal_clusters = temporal.len();
        metrics::record_stage_clusters("temporal", temporal.len());
        logger.log_progress(&format!(
            "{} clusters split into {} temporal clusters",
            stats.initial_clusters, stats.temporal_clusters
        ));

        // Aggregate
        let (described, undescribed) = self.describe_clusters(&temporal, audio, video)?;
        stats.described_clusters = described.len();
        stats.empty_aggregates = undescribed.len();
        if !undescribed.is_empty() {
            metrics::record_empty_aggregates(undescribed.len());
            logger.log_warning(&format!(
                "{} clusters had no shot with both audio and video features",
                undescribed.len()
            ));
        }
        if described.is_empty() {
            return Err(WorkerError::EmptyCorpus);
        }

        // Textualize, vectorize, choose k, cluster
        let corpus: Vec<String> = described.iter().map(|(_, d)| describe(d)).collect();
        let matrix = self.text_clusterer.vectorize(&corpus)?;

        let k = match self.text_clusterer.choose_k(&matrix, corpus.len()) {
            Some(k) if k >= 1 => k,
            other => {
                warn!(suggested = ?other, "No usable cluster count, falling back to k = 1");
                1
            }
        };
        stats.chosen_k = k;

        let labels = self.text_clusterer.cluster(&matrix, k)?;
        if labels.len() != corpus.len() {
            return Err(WorkerError::LabelMismatch {
                expected: corpus.len(),
                actual: labels.len(),
            });
        }

        let scores = evaluate(&labels, described.iter().map(|(_, d)| d));
        for (label, score) in &scores {
            debug!(label, score, "Semantic cluster quality");
        }

        // Reconcile labels back into shot lists
        let keys: Vec<ClusterKey> = described.iter().map(|(key, _)| *key).collect();
        let semantic = reconcile(&temporal, &keys, &labels, &undescribed);
        stats.semantic_clusters = semantic.len();
        metrics::record_stage_clusters("semantic", semantic.len());

        // Re-index and order by first shot
        let ordered = order_by_first_shot(reindex(&semantic, threshold)?)?;
        metrics::record_stage_clusters("ordered", ordered.len());

        // Merge passes
        let merged = merge_adjacent_undersized(ordered, self.config.merge.min_adjacent_size);
        stats.merged_clusters = merged.len();
        metrics::record_stage_clusters("merged", merged.len());
        debug!(sizes = ?merged.iter().map(Vec::len).collect::<Vec<_>>(), "Merged clusters");

        let absorbed = absorb_singletons(merged, self.config.merge.min_cluster_size);

        // Prune and re-key from 1
        let final_clusters = prune_and_reindex(positional(absorbed));
        stats.final_clusters = final_clusters.len();
        metrics::record_stage_clusters("final", final_clusters.len());

        debug_assert_eq!(total_shots(&final_clusters), stats.total_shots);

        info!(
            initial = stats.initial_clusters,
            temporal = stats.temporal_clusters,
            k = stats.chosen_k,
            semantic = stats.semantic_clusters,
            merged = stats.merged_clusters,
            final_clusters = stats.final_clusters,
            "Re-clustering finished"
        );

        Ok(RunReport {
            run_id: logger.run_id().to_string(),
            started_at,
            finished_at: Utc::now(),
            clusters: final_clusters,
            stats,
            scores,
        })
    }

    /// Aggregate every cluster, separating those with no eligible shot.
    fn describe_clusters(
        &self,
        clusters: &ClusterMap,
        audio: &AudioMap,
        video: &VideoMap,
    ) -> WorkerResult<(Vec<(ClusterKey, ClusterDescription)>, Vec<ClusterKey>)> {
        let mut described = Vec::with_capacity(clusters.len());
        let mut undescribed = Vec::new();

        for (&key, shots) in clusters {
            match aggregate_with(shots, audio, video, self.merger.as_ref()) {
                Ok(description) => described.push((key, description)),
                Err(CoreError::EmptyAggregate { member_count }) => {
                    warn!(cluster = key, member_count, "Cluster excluded from semantic corpus");
                    undescribed.push(key);
                }
                Err(e) => return Err(e.into()),
            }
        }

        Ok((described, undescribed))
    }
}

/// Group described clusters by label and append undescribed ones as their own groups.
///
/// A label becomes the new key and its shots are the member clusters'
/// shots concatenated in key order. Undescribed clusters take keys after
/// the largest label.
fn reconcile(
    clusters: &ClusterMap,
    keys: &[ClusterKey],
    labels: &[usize],
    undescribed: &[ClusterKey],
) -> ClusterMap {
    let mut reconciled = ClusterMap::new();

    for (label, members) in serialize_labels(keys, labels) {
        let shots = members
            .iter()
            .filter_map(|key| clusters.get(key))
            .flatten()
            .cloned()
            .collect();
        reconciled.insert(label as ClusterKey, shots);
    }

    let mut next_key = reconciled.keys().next_back().map_or(0, |k| k + 1);
    for key in undescribed {
        if let Some(shots) = clusters.get(key) {
            reconciled.insert(next_key, shots.clone());
            next_key += 1;
        }
    }

    reconciled
}
