//! Ward agglomerative clustering.
//!
//! Starts from one cluster per row and repeatedly merges the pair with the
//! smallest Ward linkage until `k` clusters remain. Linkages are updated with
//! the Lance-Williams recurrence on squared Euclidean distances.

use ndarray::ArrayView1;
use tracing::debug;

use crate::tfidf::Matrix;

fn squared_distance(a: ArrayView1<f64>, b: ArrayView1<f64>) -> f64 {
    a.iter().zip(b.iter()).map(|(x, y)| (x - y) * (x - y)).sum()
}

/// Cluster the rows of `matrix` into `k` groups.
///
/// `k` is clamped to `1..=rows`. Labels are numbered `0..k` in order of
/// each cluster's first row. Ties are broken by the lowest row pair.
pub fn ward_labels(matrix: &Matrix, k: usize) -> Vec<usize> {
    let n = matrix.nrows();
    if n == 0 {
        return Vec::new();
    }
    let k = k.clamp(1, n);

    let mut linkage = vec![vec![0.0f64; n]; n];
    for i in 0..n {
        for j in (i + 1)..n {
            let d = squared_distance(matrix.row(i), matrix.row(j));
            linkage[i][j] = d;
            linkage[j][i] = d;
        }
    }

    // members[i] is None once cluster i has been merged away
    let mut members: Vec<Option<Vec<usize>>> = (0..n).map(|i| Some(vec![i])).collect();
    let mut active = n;

    while active > k {
        let mut best: Option<(usize, usize, f64)> = None;
        for i in 0..n {
            if members[i].is_none() {
                continue;
            }
            for j in (i + 1)..n {
                if members[j].is_none() {
                    continue;
                }
                if best.map_or(true, |(_, _, d)| linkage[i][j] < d) {
                    best = Some((i, j, linkage[i][j]));
                }
            }
        }

        let Some((a, b, d_ab)) = best else { break };
        let size_a = members[a].as_ref().map_or(0, Vec::len) as f64;
        let size_b = members[b].as_ref().map_or(0, Vec::len) as f64;

        for other in 0..n {
            if other == a || other == b {
                continue;
            }
            let Some(size_o) = members[other].as_ref().map(|m| m.len() as f64) else {
                continue;
            };
            let updated = ((size_a + size_o) * linkage[a][other]
                + (size_b + size_o) * linkage[b][other]
                - size_o * d_ab)
                / (size_a + size_b + size_o);
            linkage[a][other] = updated;
            linkage[other][a] = updated;
        }

        if let Some(absorbed) = members[b].take() {
            if let Some(target) = members[a].as_mut() {
                target.extend(absorbed);
            }
        }
        active -= 1;
    }

    let mut labels = vec![0usize; n];
    let mut groups: Vec<Vec<usize>> = members.into_iter().flatten().collect();
    groups.sort_by_key(|rows| rows.iter().copied().min().unwrap_or(usize::MAX));
    for (label, rows) in groups.iter().enumerate() {
        for &row in rows {
            labels[row] = label;
        }
    }

    debug!(rows = n, clusters = groups.len(), "Ward clustering finished");
    labels
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_two_obvious_groups() {
        let matrix = array![[0.0, 0.0], [0.1, 0.0], [5.0, 5.0], [5.1, 5.0], [0.0, 0.1]];
        let labels = ward_labels(&matrix, 2);
        assert_eq!(labels, vec![0, 0, 1, 1, 0]);
    }

    #[test]
    fn test_k_is_clamped() {
        let matrix = array![[0.0], [1.0], [3.0]];
        assert_eq!(ward_labels(&matrix, 0), vec![0, 0, 0]);
        assert_eq!(ward_labels(&matrix, 10), vec![0, 1, 2]);
    }

    #[test]
    fn test_labels_cover_range() {
        let matrix = array![[0.0], [0.2], [4.0], [4.1], [9.0], [9.3]];
        let labels = ward_labels(&matrix, 3);
        assert_eq!(labels, vec![0, 0, 1, 1, 2, 2]);
    }

    #[test]
    fn test_empty_matrix() {
        let matrix = Matrix::zeros((0, 3));
        assert!(ward_labels(&matrix, 2).is_empty());
    }
}
