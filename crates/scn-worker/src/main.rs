//! Shot-to-scene re-clustering CLI.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use scn_core::{LinkedClusterRegistry, MergeConfig};
use scn_worker::{
    summarize_scenes, ChatSummarizer, PipelineConfig, Reclusterer, RunLogger, SummarizerConfig,
};

#[derive(Debug, Parser)]
#[command(name = "scn-worker", version, about = "Group video shots into scenes")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Re-cluster an initial shot partition into scenes
    Recluster(ReclusterArgs),

    /// Write a one-sentence summary for every scene
    Summarize(SummarizeArgs),

    /// Remove a cluster and every cluster that references it from a linked snapshot
    RemoveLinked(RemoveLinkedArgs),
}

#[derive(Debug, clap::Args)]
struct ReclusterArgs {
    /// Per-shot audio analysis document
    #[arg(long)]
    audio: Option<PathBuf>,

    /// Per-shot video analysis document
    #[arg(long)]
    video: Option<PathBuf>,

    /// Initial cluster snapshot
    #[arg(long)]
    clusters: Option<PathBuf>,

    /// Final cluster snapshot
    #[arg(long, short)]
    output: Option<PathBuf>,

    /// Shot timings; writes a scene span report when given
    #[arg(long)]
    timings: Option<PathBuf>,

    /// Scene span report path
    #[arg(long)]
    spans: Option<PathBuf>,

    /// Largest ordinal gap inside one cluster
    #[arg(long)]
    split_threshold: Option<u64>,

    /// Neighbouring clusters below this size are merged
    #[arg(long)]
    min_adjacent_size: Option<usize>,

    /// Clusters below this size are absorbed by a neighbour
    #[arg(long)]
    min_cluster_size: Option<usize>,

    /// Largest cluster count tried when choosing k
    #[arg(long)]
    max_k: Option<usize>,
}

#[derive(Debug, clap::Args)]
struct SummarizeArgs {
    /// Audio records keyed by scene
    #[arg(long)]
    audio: PathBuf,

    /// Video records keyed by scene
    #[arg(long)]
    video: PathBuf,

    /// Summary document
    #[arg(long, short)]
    output: PathBuf,

    /// Chat-completions base URL
    #[arg(long, env = "SCN_LLM_BASE_URL")]
    base_url: Option<String>,

    /// Model name
    #[arg(long, env = "SCN_LLM_MODEL")]
    model: Option<String>,
}

#[derive(Debug, clap::Args)]
struct RemoveLinkedArgs {
    /// Linked cluster snapshot
    #[arg(long)]
    clusters: PathBuf,

    /// Cluster id to remove
    #[arg(long)]
    id: String,

    /// Where to write the remaining snapshot (defaults to overwriting the input)
    #[arg(long, short)]
    output: Option<PathBuf>,

    /// Where to write the removed groups
    #[arg(long)]
    removed: Option<PathBuf>,
}

fn init_tracing() {
    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false);

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("scn=info"));

    if use_json {
        tracing_subscriber::registry()
            .with(fmt::layer().json())
            .with(env_filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_ansi(true)
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_file(false)
                    .with_line_number(false),
            )
            .with(env_filter)
            .init();
    }
}

fn pipeline_config(args: ReclusterArgs) -> PipelineConfig {
    let mut config = PipelineConfig::from_env();

    if let Some(path) = args.audio {
        config = config.with_audio_path(path);
    }
    if let Some(path) = args.video {
        config = config.with_video_path(path);
    }
    if let Some(path) = args.clusters {
        config = config.with_clusters_path(path);
    }
    if let Some(path) = args.output {
        config = config.with_output_path(path);
    }
    if let Some(path) = args.timings {
        config = config.with_timings_path(path);
    }
    if let Some(path) = args.spans {
        config = config.with_spans_path(path);
    }
    if let Some(threshold) = args.split_threshold {
        config = config.with_split_threshold(threshold);
    }
    if let Some(max_k) = args.max_k {
        config = config.with_max_k(max_k);
    }

    let merge = MergeConfig {
        min_adjacent_size: args.min_adjacent_size.unwrap_or(config.merge.min_adjacent_size),
        min_cluster_size: args.min_cluster_size.unwrap_or(config.merge.min_cluster_size),
    };
    config.with_merge(merge)
}

fn recluster(args: ReclusterArgs) -> anyhow::Result<()> {
    let config = pipeline_config(args);
    info!("Pipeline config: {:?}", config);

    let report = Reclusterer::new(config).run()?;
    info!(
        run_id = %report.run_id,
        stats = %serde_json::to_string(&report.stats)?,
        "Run report"
    );
    Ok(())
}

async fn summarize(args: SummarizeArgs) -> anyhow::Result<()> {
    let logger = RunLogger::new("summarize");
    logger.log_start(&format!("scenes from {}", args.video.display()));

    let mut config = SummarizerConfig::from_env();
    if let Some(base_url) = args.base_url {
        config = config.with_base_url(base_url);
    }
    if let Some(model) = args.model {
        config = config.with_model(model);
    }

    let audio_scenes = scn_storage::load_scene_audio(&args.audio)
        .with_context(|| format!("loading {}", args.audio.display()))?;
    let video_scenes = scn_storage::load_scene_video(&args.video)
        .with_context(|| format!("loading {}", args.video.display()))?;

    let summarizer = ChatSummarizer::new(config)?;
    let summaries = summarize_scenes(&summarizer, &audio_scenes, &video_scenes).await?;

    scn_storage::save_summaries(&args.output, &summaries)?;
    logger.log_completion(&format!("{} summaries written", summaries.len()));
    Ok(())
}

fn remove_linked(args: RemoveLinkedArgs) -> anyhow::Result<()> {
    let config = PipelineConfig::from_env();
    let clusters = scn_storage::load_linked_cluster_map(&args.clusters)
        .with_context(|| format!("loading {}", args.clusters.display()))?;

    let mut registry = LinkedClusterRegistry::new(clusters, config.capabilities)
        .context("set SCN_LINKED_CLUSTERS=true to edit linked snapshots")?;
    let removed = registry.remove(&args.id);

    let output = args.output.unwrap_or(args.clusters);
    scn_storage::save_linked_cluster_map(&output, registry.clusters())?;
    if let Some(path) = args.removed {
        scn_storage::save_json(&path, &removed)?;
    }

    info!(
        cluster_id = %args.id,
        removed_groups = removed.get(&args.id).map_or(0, Vec::len),
        "Linked cluster removed"
    );
    Ok(())
}

#[tokio::main]
async fn main() {
    // Load environment variables
    dotenvy::dotenv().ok();

    init_tracing();

    let cli = Cli::parse();
    info!("Starting scn-worker");

    let result = match cli.command {
        Command::Recluster(args) => recluster(args),
        Command::Summarize(args) => summarize(args).await,
        Command::RemoveLinked(args) => remove_linked(args),
    };

    if let Err(e) = result {
        error!("scn-worker failed: {:#}", e);
        std::process::exit(1);
    }
}
