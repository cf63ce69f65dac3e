//! Text clustering for cluster descriptions.
//!
//! - TF-IDF vectorization
//! - Ward agglomerative clustering
//! - Silhouette-based cluster count selection
//! - [`TextClusteringService`] seam with an in-process implementation

pub mod agglomerative;
pub mod error;
pub mod service;
pub mod silhouette;
pub mod tfidf;

pub use agglomerative::ward_labels;
pub use error::{TextClusterError, TextClusterResult};
pub use service::{serialize_labels, LocalTextClusterer, TextClusteringService};
pub use silhouette::{choose_k, silhouette_score, DEFAULT_MAX_K};
pub use tfidf::{tokenize, vectorize, Matrix, TfidfModel};
