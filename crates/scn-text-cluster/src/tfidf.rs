//! TF-IDF vectorizer.
//!
//! Tokens are lower-cased runs of two or more word characters. Weights are
//! raw term counts scaled by the smoothed inverse document frequency
//! `ln((1 + n) / (1 + df)) + 1`, and every row is L2-normalized.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::OnceLock;

use ndarray::Array2;
use regex::Regex;
use tracing::debug;

use crate::error::{TextClusterError, TextClusterResult};

/// Dense document-term matrix, one row per document.
pub type Matrix = Array2<f64>;

fn token_regex() -> &'static Regex {
    static TOKEN: OnceLock<Regex> = OnceLock::new();
    TOKEN.get_or_init(|| Regex::new(r"\b\w\w+\b").expect("token pattern is valid"))
}

/// Split a document into lower-cased tokens.
pub fn tokenize(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    token_regex()
        .find_iter(&lowered)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Fitted vocabulary and idf weights.
#[derive(Debug, Clone)]
pub struct TfidfModel {
    /// term -> column, columns in alphabetical term order
    vocabulary: BTreeMap<String, usize>,
    idf: Vec<f64>,
}

impl TfidfModel {
    /// Learn vocabulary and idf weights from a corpus.
    pub fn fit(corpus: &[String]) -> TextClusterResult<Self> {
        if corpus.is_empty() {
            return Err(TextClusterError::EmptyCorpus);
        }

        let tokenized: Vec<Vec<String>> = corpus.iter().map(|doc| tokenize(doc)).collect();
        let terms: BTreeSet<&String> = tokenized.iter().flatten().collect();
        if terms.is_empty() {
            return Err(TextClusterError::EmptyVocabulary(corpus.len()));
        }

        let vocabulary: BTreeMap<String, usize> = terms
            .into_iter()
            .enumerate()
            .map(|(col, term)| (term.clone(), col))
            .collect();

        let mut df = vec![0usize; vocabulary.len()];
        for tokens in &tokenized {
            let unique: BTreeSet<&String> = tokens.iter().collect();
            for term in unique {
                if let Some(&col) = vocabulary.get(term) {
                    df[col] += 1;
                }
            }
        }

        let n = corpus.len() as f64;
        let idf = df
            .iter()
            .map(|&d| ((1.0 + n) / (1.0 + d as f64)).ln() + 1.0)
            .collect();

        debug!(documents = corpus.len(), terms = vocabulary.len(), "Fitted TF-IDF vocabulary");

        Ok(Self { vocabulary, idf })
    }

    /// Number of terms in the vocabulary.
    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary.len()
    }

    /// Column of a term, if it is in the vocabulary.
    pub fn column(&self, term: &str) -> Option<usize> {
        self.vocabulary.get(term).copied()
    }

    /// Weight documents against the fitted vocabulary. Unknown terms are ignored.
    pub fn transform(&self, corpus: &[String]) -> Matrix {
        let mut matrix = Matrix::zeros((corpus.len(), self.vocabulary.len()));

        for (row, doc) in corpus.iter().enumerate() {
            for token in tokenize(doc) {
                if let Some(&col) = self.vocabulary.get(&token) {
                    matrix[[row, col]] += 1.0;
                }
            }
            for (col, idf) in self.idf.iter().enumerate() {
                matrix[[row, col]] *= idf;
            }

            let norm = matrix.row(row).mapv(|v| v * v).sum().sqrt();
            if norm > 0.0 {
                matrix.row_mut(row).mapv_inplace(|v| v / norm);
            }
        }

        matrix
    }
}

/// Fit on the corpus and return its weighted matrix.
pub fn vectorize(corpus: &[String]) -> TextClusterResult<Matrix> {
    let model = TfidfModel::fit(corpus)?;
    Ok(model.transform(corpus))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corpus(docs: &[&str]) -> Vec<String> {
        docs.iter().map(|d| d.to_string()).collect()
    }

    #[test]
    fn test_tokenize() {
        assert_eq!(
            tokenize("Transcription: Hi there, a Goal! ['ball']"),
            vec!["transcription", "hi", "there", "goal", "ball"]
        );
        assert_eq!(tokenize("Привет мир"), vec!["привет", "мир"]);
    }

    #[test]
    fn test_rows_are_unit_length() {
        let docs = corpus(&["red car fast", "red bike", "blue sky sky"]);
        let matrix = vectorize(&docs).unwrap();

        assert_eq!(matrix.nrows(), 3);
        for row in matrix.rows() {
            let norm = row.mapv(|v| v * v).sum().sqrt();
            assert!((norm - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_rare_terms_weigh_more() {
        let docs = corpus(&["red car", "red bike", "red boat"]);
        let model = TfidfModel::fit(&docs).unwrap();
        let matrix = model.transform(&docs);

        let red = model.column("red").unwrap();
        let car = model.column("car").unwrap();
        assert!(matrix[[0, car]] > matrix[[0, red]]);
        assert_eq!(matrix[[1, car]], 0.0);
    }

    #[test]
    fn test_deterministic() {
        let docs = corpus(&["one two three", "three four", "five"]);
        assert_eq!(vectorize(&docs).unwrap(), vectorize(&docs).unwrap());
    }

    #[test]
    fn test_errors() {
        assert_eq!(vectorize(&[]), Err(TextClusterError::EmptyCorpus));
        assert_eq!(
            vectorize(&corpus(&["a", "!"])),
            Err(TextClusterError::EmptyVocabulary(2))
        );
    }
}
