//! One-line text rendering of a cluster description.
//!
//! The rendered string is the only semantic signal handed to the text
//! clustering service.

use std::collections::BTreeSet;

use scn_models::ClusterDescription;

/// Render a description as `Field: value, ` pairs.
pub fn describe(description: &ClusterDescription) -> String {
    format!(
        "Transcription: {}, Sentiment: {}, Clap Analysis: {}, Average Video Objects: {}, Average Video Events: {}, ",
        description.transcription,
        description.sentiment,
        description.clap_analysis,
        render_set(&description.avg_video_objects),
        render_set(&description.avg_events),
    )
}

fn render_set(items: &BTreeSet<String>) -> String {
    let quoted: Vec<String> = items.iter().map(|item| format!("'{}'", item)).collect();
    format!("[{}]", quoted.join(", "))
}
