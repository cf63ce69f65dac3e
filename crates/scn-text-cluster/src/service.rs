//! Text clustering service seam.
//!
//! The pipeline only needs three operations from a clustering backend:
//! vectorize a corpus, suggest a cluster count, and label rows. The local
//! implementation runs entirely in-process.

use std::collections::BTreeMap;

use tracing::{debug, info};

use crate::agglomerative::ward_labels;
use crate::error::{TextClusterError, TextClusterResult};
use crate::silhouette::{choose_k, DEFAULT_MAX_K};
use crate::tfidf::{vectorize, Matrix};

/// Clustering backend used by the re-clustering pipeline.
pub trait TextClusteringService: Send + Sync {
    /// Turn a corpus into one row per document.
    fn vectorize(&self, corpus: &[String]) -> TextClusterResult<Matrix>;

    /// Suggested cluster count, or `None` when no count can be justified.
    fn choose_k(&self, matrix: &Matrix, n_items: usize) -> Option<usize>;

    /// One label per row, numbered from 0.
    fn cluster(&self, matrix: &Matrix, k: usize) -> TextClusterResult<Vec<usize>>;
}

/// In-process TF-IDF + Ward backend.
#[derive(Debug, Clone)]
pub struct LocalTextClusterer {
    max_k: usize,
}

impl Default for LocalTextClusterer {
    fn default() -> Self {
        Self { max_k: DEFAULT_MAX_K }
    }
}

impl LocalTextClusterer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cap the largest cluster count considered by `choose_k`.
    pub fn with_max_k(mut self, max_k: usize) -> Self {
        self.max_k = max_k.max(2);
        self
    }

    pub fn max_k(&self) -> usize {
        self.max_k
    }
}

impl TextClusteringService for LocalTextClusterer {
    fn vectorize(&self, corpus: &[String]) -> TextClusterResult<Matrix> {
        vectorize(corpus)
    }

    fn choose_k(&self, matrix: &Matrix, n_items: usize) -> Option<usize> {
        let k = choose_k(matrix, n_items, self.max_k);
        info!(n_items, k = ?k, "Chose cluster count");
        k
    }

    fn cluster(&self, matrix: &Matrix, k: usize) -> TextClusterResult<Vec<usize>> {
        if matrix.nrows() == 0 {
            return Err(TextClusterError::EmptyCorpus);
        }
        let labels = ward_labels(matrix, k);
        debug!(rows = matrix.nrows(), k, "Labelled rows");
        Ok(labels)
    }
}

/// Group item ids by label, preserving item order within each label.
///
/// Items past the end of `labels` (or labels past the end of `items`) are
/// ignored; callers check lengths beforehand.
pub fn serialize_labels<K: Clone>(items: &[K], labels: &[usize]) -> BTreeMap<usize, Vec<K>> {
    let mut grouped: BTreeMap<usize, Vec<K>> = BTreeMap::new();
    for (item, &label) in items.iter().zip(labels) {
        grouped.entry(label).or_default().push(item.clone());
    }
    grouped
}
