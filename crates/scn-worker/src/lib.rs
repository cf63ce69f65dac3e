//! Shot-to-scene re-clustering worker.
//!
//! This crate provides:
//! - The re-clustering orchestrator and its run report
//! - Scene span reporting from shot timings
//! - The chat-completions scene summarizer
//! - Collaborator seams for segmentation and per-shot analysis
//! - Configuration, structured run logging and metrics

pub mod collaborators;
pub mod config;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod orchestrator;
pub mod spans;
pub mod summarizer;

pub use collaborators::{
    collect_shot_features, AudioAnalyzer, ShotBoundary, ShotFeatures, ShotSegmenter, VideoAnalyzer,
};
pub use config::{PipelineConfig, SummarizerConfig};
pub use error::{WorkerError, WorkerResult};
pub use logging::RunLogger;
pub use orchestrator::{Reclusterer, RunReport, RunStats};
pub use spans::scene_spans;
pub use summarizer::{summarize_scenes, ChatSummarizer, SceneEvidence, SceneSummarizer};
