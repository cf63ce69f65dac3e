//! Scene summarizer.
//!
//! Sends each scene's audio and video evidence to an OpenAI-compatible
//! chat-completions endpoint (a local Ollama server by default) and keeps
//! the one-sentence answer.

use std::collections::BTreeMap;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use scn_core::shot_merge::{DEFAULT_MIN_DETECTION_CONFIDENCE, DEFAULT_MIN_EVENT_PROBABILITY};
use scn_models::{AudioShotRecord, SceneSummaries, VideoShotRecord};

use crate::config::SummarizerConfig;
use crate::error::{WorkerError, WorkerResult};

const SYSTEM_PROMPT: &str = "Extract the key content of the scene based on audio and video data. \
The answer should consist of one sentence that conveys only the essence of the scene without \
unnecessary details, avoiding introductory phrases or additional recommendations. \
The answer must be in Russian.";

/// Evidence about one scene handed to the summarizer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SceneEvidence {
    pub transcription: String,
    pub clap_analysis: Vec<String>,
    /// Confident detection classes of the first frame
    pub detections: Vec<String>,
    /// Confident event names of the first frame
    pub events: Vec<String>,
}

impl SceneEvidence {
    /// Build from a scene's audio record and its first analysed frame.
    ///
    /// Returns `None` when the scene has no frames.
    pub fn from_records(audio: &AudioShotRecord, video: &VideoShotRecord) -> Option<Self> {
        let frame = video.first()?;

        Some(Self {
            transcription: audio
                .transcriptions
                .first()
                .map(|t| t.text.clone())
                .unwrap_or_default(),
            clap_analysis: audio.clap_analysis.clone(),
            detections: frame
                .detections
                .iter()
                .filter(|d| d.confidence > DEFAULT_MIN_DETECTION_CONFIDENCE)
                .map(|d| d.class_name.clone())
                .collect(),
            events: frame
                .events
                .iter()
                .filter(|e| e.probability > DEFAULT_MIN_EVENT_PROBABILITY)
                .map(|e| e.name.clone())
                .collect(),
        })
    }

    /// User message sent to the model.
    pub fn to_prompt(&self) -> String {
        format!(
            "Транскрипция: {}. Анализ хлопков: {}. Объекты обнаружения: {}. Объекты событий: {}.",
            self.transcription,
            self.clap_analysis.join(", "),
            self.detections.join(", "),
            self.events.join(", "),
        )
    }
}

/// Turns scene evidence into a one-sentence description.
#[async_trait]
pub trait SceneSummarizer: Send + Sync {
    async fn summarize(&self, evidence: &SceneEvidence) -> WorkerResult<String>;
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Chat-completions client.
pub struct ChatSummarizer {
    config: SummarizerConfig,
    client: Client,
}

impl ChatSummarizer {
    pub fn new(config: SummarizerConfig) -> WorkerResult<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| WorkerError::config_error(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    pub fn config(&self) -> &SummarizerConfig {
        &self.config
    }
}

#[async_trait]
impl SceneSummarizer for ChatSummarizer {
    async fn summarize(&self, evidence: &SceneEvidence) -> WorkerResult<String> {
        let prompt = evidence.to_prompt();
        let request = ChatRequest {
            model: &self.config.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: &prompt,
                },
            ],
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
        };

        let response = self
            .client
            .post(self.config.completions_url())
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| WorkerError::ai_failed(format!("Chat request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(WorkerError::ai_failed(format!(
                "Chat endpoint returned {}: {}",
                status, error_text
            )));
        }

        let chat: ChatResponse = response
            .json()
            .await
            .map_err(|e| WorkerError::ai_failed(format!("Failed to parse chat response: {}", e)))?;

        chat.choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty())
            .ok_or_else(|| WorkerError::ai_failed("No content in chat response"))
    }
}

/// Summarize every scene that has both video frames and an audio record.
///
/// Scenes are visited in key order; the first failed request aborts.
pub async fn summarize_scenes(
    summarizer: &dyn SceneSummarizer,
    audio_scenes: &BTreeMap<String, AudioShotRecord>,
    video_scenes: &BTreeMap<String, VideoShotRecord>,
) -> WorkerResult<SceneSummaries> {
    let mut summaries = SceneSummaries::new();

    for (scene, frames) in video_scenes {
        let Some(audio) = audio_scenes.get(scene) else {
            debug!(scene = %scene, "No audio record for scene, skipping");
            continue;
        };
        let Some(evidence) = SceneEvidence::from_records(audio, frames) else {
            debug!(scene = %scene, "No video frames for scene, skipping");
            continue;
        };

        let summary = summarizer.summarize(&evidence).await.map_err(|e| {
            warn!(scene = %scene, error = %e, "Scene summary failed");
            e
        })?;
        summaries.insert(scene.clone(), summary);
    }

    info!(scenes = summaries.len(), "Summarized scenes");
    Ok(summaries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use scn_models::{Detection, TranscriptSegment, VideoEvent, VideoFrameRecord};

    fn audio(text: &str) -> AudioShotRecord {
        AudioShotRecord {
            transcriptions: vec![
                TranscriptSegment {
                    text: text.to_string(),
                    label: None,
                },
                TranscriptSegment {
                    text: "ignored".to_string(),
                    label: None,
                },
            ],
            clap_analysis: vec!["Cheering".to_string(), "Crowd".to_string()],
            ..Default::default()
        }
    }

    fn frame() -> VideoFrameRecord {
        VideoFrameRecord {
            detections: vec![
                Detection {
                    class_name: "person".to_string(),
                    confidence: 0.95,
                },
                Detection {
                    class_name: "dog".to_string(),
                    confidence: 0.7,
                },
            ],
            events: vec![
                VideoEvent {
                    name: "running".to_string(),
                    probability: 0.8,
                },
                VideoEvent {
                    name: "sleeping".to_string(),
                    probability: 0.1,
                },
            ],
            moving_objects: Vec::new(),
        }
    }

    #[test]
    fn test_evidence_filters_first_frame() {
        let evidence = SceneEvidence::from_records(&audio("гол"), &vec![frame(), VideoFrameRecord::default()])
            .unwrap();

        assert_eq!(evidence.transcription, "гол");
        assert_eq!(evidence.detections, vec!["person"]);
        assert_eq!(evidence.events, vec!["running"]);
        assert_eq!(
            evidence.to_prompt(),
            "Транскрипция: гол. Анализ хлопков: Cheering, Crowd. \
             Объекты обнаружения: person. Объекты событий: running."
        );
    }

    #[test]
    fn test_evidence_requires_frames() {
        assert!(SceneEvidence::from_records(&audio("x"), &Vec::new()).is_none());

        let silent = SceneEvidence::from_records(&AudioShotRecord::default(), &vec![frame()]).unwrap();
        assert_eq!(silent.transcription, "");
    }

    struct EchoSummarizer;

    #[async_trait]
    impl SceneSummarizer for EchoSummarizer {
        async fn summarize(&self, evidence: &SceneEvidence) -> WorkerResult<String> {
            Ok(format!("Сцена: {}", evidence.transcription))
        }
    }

    #[tokio::test]
    async fn test_summarize_scenes_skips_incomplete() {
        let mut audio_scenes = BTreeMap::new();
        audio_scenes.insert("scene_1".to_string(), audio("гол"));
        audio_scenes.insert("scene_2".to_string(), audio("пас"));

        let mut video_scenes = BTreeMap::new();
        video_scenes.insert("scene_1".to_string(), vec![frame()]);
        video_scenes.insert("scene_2".to_string(), Vec::new());
        video_scenes.insert("scene_3".to_string(), vec![frame()]);

        let summaries = summarize_scenes(&EchoSummarizer, &audio_scenes, &video_scenes)
            .await
            .unwrap();

        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries["scene_1"], "Сцена: гол");
    }
}
