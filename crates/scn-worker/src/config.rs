//! Pipeline and summarizer configuration.

use std::path::PathBuf;
use std::time::Duration;

use scn_core::{MergeConfig, RegistryCapabilities, DEFAULT_SPLIT_THRESHOLD};
use scn_text_cluster::DEFAULT_MAX_K;

/// Re-clustering run configuration.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Per-shot audio analysis document
    pub audio_path: PathBuf,
    /// Per-shot video analysis document
    pub video_path: PathBuf,
    /// Initial cluster snapshot
    pub clusters_path: PathBuf,
    /// Where the final cluster snapshot is written
    pub output_path: PathBuf,
    /// Optional shot timings; enables the scene span report
    pub timings_path: Option<PathBuf>,
    /// Scene span report path (defaults next to the output)
    pub spans_path: Option<PathBuf>,
    /// Largest ordinal gap allowed inside one cluster
    pub split_threshold: u64,
    /// Size thresholds for the merge passes
    pub merge: MergeConfig,
    /// Upper bound for the cluster count sweep
    pub max_k: usize,
    pub capabilities: RegistryCapabilities,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            audio_path: PathBuf::from("audio_results.json"),
            video_path: PathBuf::from("video_results.json"),
            clusters_path: PathBuf::from("clusters_merged.json"),
            output_path: PathBuf::from("final_clusters.json"),
            timings_path: None,
            spans_path: None,
            split_threshold: DEFAULT_SPLIT_THRESHOLD,
            merge: MergeConfig::default(),
            max_k: DEFAULT_MAX_K,
            capabilities: RegistryCapabilities::default(),
        }
    }
}

impl PipelineConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            audio_path: std::env::var("SCN_AUDIO_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.audio_path),
            video_path: std::env::var("SCN_VIDEO_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.video_path),
            clusters_path: std::env::var("SCN_CLUSTERS_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.clusters_path),
            output_path: std::env::var("SCN_OUTPUT_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.output_path),
            timings_path: std::env::var("SCN_TIMINGS_PATH").ok().map(PathBuf::from),
            spans_path: std::env::var("SCN_SPANS_PATH").ok().map(PathBuf::from),
            split_threshold: std::env::var("SCN_SPLIT_THRESHOLD")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.split_threshold),
            merge: MergeConfig {
                min_adjacent_size: std::env::var("SCN_MIN_ADJACENT_SIZE")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(defaults.merge.min_adjacent_size),
                min_cluster_size: std::env::var("SCN_MIN_CLUSTER_SIZE")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(defaults.merge.min_cluster_size),
            },
            max_k: std::env::var("SCN_MAX_K")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.max_k),
            capabilities: RegistryCapabilities::default().with_linked_clusters(
                std::env::var("SCN_LINKED_CLUSTERS")
                    .map(|v| matches!(v.to_lowercase().as_str(), "1" | "true" | "yes"))
                    .unwrap_or(false),
            ),
        }
    }

    pub fn with_audio_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.audio_path = path.into();
        self
    }

    pub fn with_video_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.video_path = path.into();
        self
    }

    pub fn with_clusters_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.clusters_path = path.into();
        self
    }

    pub fn with_output_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_path = path.into();
        self
    }

    pub fn with_timings_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.timings_path = Some(path.into());
        self
    }

    pub fn with_spans_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.spans_path = Some(path.into());
        self
    }

    pub fn with_split_threshold(mut self, threshold: u64) -> Self {
        self.split_threshold = threshold;
        self
    }

    pub fn with_merge(mut self, merge: MergeConfig) -> Self {
        self.merge = merge;
        self
    }

    pub fn with_max_k(mut self, max_k: usize) -> Self {
        self.max_k = max_k;
        self
    }

    pub fn with_linked_clusters(mut self, enabled: bool) -> Self {
        self.capabilities = self.capabilities.with_linked_clusters(enabled);
        self
    }

    /// Span report path: explicit, or `<output stem>_spans.json` beside the output.
    pub fn resolved_spans_path(&self) -> PathBuf {
        if let Some(path) = &self.spans_path {
            return path.clone();
        }
        let stem = self
            .output_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "final_clusters".to_string());
        self.output_path.with_file_name(format!("{}_spans.json", stem))
    }
}

/// Default OpenAI-compatible endpoint (local Ollama).
pub const DEFAULT_LLM_BASE_URL: &str = "http://localhost:11434/v1/";
pub const DEFAULT_LLM_MODEL: &str = "mistral";
pub const DEFAULT_LLM_API_KEY: &str = "ollama";

/// Scene summarizer configuration.
#[derive(Debug, Clone)]
pub struct SummarizerConfig {
    pub base_url: String,
    pub model: String,
    pub api_key: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub request_timeout: Duration,
}

impl Default for SummarizerConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_LLM_BASE_URL.to_string(),
            model: DEFAULT_LLM_MODEL.to_string(),
            api_key: DEFAULT_LLM_API_KEY.to_string(),
            temperature: 0.35,
            max_tokens: 300,
            request_timeout: Duration::from_secs(120),
        }
    }
}

impl SummarizerConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            base_url: std::env::var("SCN_LLM_BASE_URL").unwrap_or(defaults.base_url),
            model: std::env::var("SCN_LLM_MODEL").unwrap_or(defaults.model),
            api_key: std::env::var("SCN_LLM_API_KEY").unwrap_or(defaults.api_key),
            temperature: std::env::var("SCN_LLM_TEMPERATURE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.temperature),
            max_tokens: std::env::var("SCN_LLM_MAX_TOKENS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.max_tokens),
            request_timeout: Duration::from_secs(
                std::env::var("SCN_LLM_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(120),
            ),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// `<base_url>/chat/completions`, tolerating a trailing slash on the base.
    pub fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}
