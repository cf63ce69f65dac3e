//! Silhouette score and k selection.

use tracing::debug;

use crate::agglomerative::ward_labels;
use crate::tfidf::Matrix;

/// Upper bound on the cluster counts tried by [`choose_k`].
pub const DEFAULT_MAX_K: usize = 10;

fn euclidean(matrix: &Matrix, a: usize, b: usize) -> f64 {
    matrix
        .row(a)
        .iter()
        .zip(matrix.row(b).iter())
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f64>()
        .sqrt()
}

/// Mean silhouette coefficient of a labelling, in `[-1, 1]`.
///
/// Rows in single-member clusters contribute 0. Returns `None` unless there
/// are at least two clusters and fewer clusters than rows.
pub fn silhouette_score(matrix: &Matrix, labels: &[usize]) -> Option<f64> {
    let n = matrix.nrows().min(labels.len());
    let n_clusters = labels[..n].iter().copied().max().map_or(0, |m| m + 1);
    if n_clusters < 2 || n_clusters >= n {
        return None;
    }

    let mut sizes = vec![0usize; n_clusters];
    for &label in &labels[..n] {
        sizes[label] += 1;
    }

    let mut total = 0.0;
    for i in 0..n {
        let own = labels[i];
        if sizes[own] <= 1 {
            continue;
        }

        let mut sums = vec![0.0f64; n_clusters];
        for j in 0..n {
            if i != j {
                sums[labels[j]] += euclidean(matrix, i, j);
            }
        }

        let a = sums[own] / (sizes[own] - 1) as f64;
        let b = (0..n_clusters)
            .filter(|&c| c != own && sizes[c] > 0)
            .map(|c| sums[c] / sizes[c] as f64)
            .fold(f64::INFINITY, f64::min);

        let denom = a.max(b);
        if denom > 0.0 && denom.is_finite() {
            total += (b - a) / denom;
        }
    }

    Some(total / n as f64)
}

/// Pick the cluster count with the best silhouette score.
///
/// Candidates are `2..min(n_items, max_k + 1)`. Returns `None` when fewer
/// than three items make any candidate meaningful. Ties keep the smaller k.
pub fn choose_k(matrix: &Matrix, n_items: usize, max_k: usize) -> Option<usize> {
    let upper = n_items.min(matrix.nrows()).min(max_k.saturating_add(1));
    let mut best: Option<(usize, f64)> = None;

    for k in 2..upper {
        let labels = ward_labels(matrix, k);
        let Some(score) = silhouette_score(matrix, &labels) else {
            continue;
        };
        debug!(k, score, "Silhouette candidate");
        if best.map_or(true, |(_, s)| score > s) {
            best = Some((k, score));
        }
    }

    best.map(|(k, _)| k)
}
