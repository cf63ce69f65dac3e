//! Chat summarizer tests against a mock completions endpoint.

use std::collections::BTreeMap;

use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use scn_models::{AudioShotRecord, Detection, TranscriptSegment, VideoFrameRecord};
use scn_worker::{
    summarize_scenes, ChatSummarizer, SceneEvidence, SceneSummarizer, SummarizerConfig,
    WorkerError,
};

fn config(server: &MockServer) -> SummarizerConfig {
    SummarizerConfig::default().with_base_url(format!("{}/v1/", server.uri()))
}

fn completion(content: &str) -> serde_json::Value {
    json!({
        "id": "chatcmpl-1",
        "object": "chat.completion",
        "choices": [{
            "index": 0,
            "message": { "role": "assistant", "content": content },
            "finish_reason": "stop"
        }]
    })
}

fn evidence() -> SceneEvidence {
    SceneEvidence {
        transcription: "Мяч в сетке".to_string(),
        clap_analysis: vec!["Cheering".to_string()],
        detections: vec!["person".to_string()],
        events: vec!["celebrating".to_string()],
    }
}

#[tokio::test]
async fn test_summarize_sends_chat_request() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("authorization", "Bearer ollama"))
        .and(body_partial_json(json!({
            "model": "mistral",
            "max_tokens": 300,
            "messages": [
                { "role": "system" },
                { "role": "user", "content": evidence().to_prompt() }
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("  Игроки празднуют гол.  ")))
        .expect(1)
        .mount(&server)
        .await;

    let summarizer = ChatSummarizer::new(config(&server)).unwrap();
    let summary = summarizer.summarize(&evidence()).await.unwrap();

    assert_eq!(summary, "Игроки празднуют гол.");
}

#[tokio::test]
async fn test_summarize_maps_http_errors() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(500).set_body_string("model not loaded"))
        .mount(&server)
        .await;

    let summarizer = ChatSummarizer::new(config(&server)).unwrap();
    let err = summarizer.summarize(&evidence()).await.unwrap_err();

    assert!(matches!(err, WorkerError::AiFailed(ref msg) if msg.contains("model not loaded")));
}

#[tokio::test]
async fn test_summarize_rejects_empty_choices() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "choices": [] })))
        .mount(&server)
        .await;

    let summarizer = ChatSummarizer::new(config(&server)).unwrap();
    let err = summarizer.summarize(&evidence()).await.unwrap_err();

    assert!(matches!(err, WorkerError::AiFailed(_)));
}

#[tokio::test]
async fn test_summarize_scenes_over_http() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("Сцена на стадионе.")))
        .expect(1)
        .mount(&server)
        .await;

    let mut audio_scenes = BTreeMap::new();
    audio_scenes.insert(
        "scene_1".to_string(),
        AudioShotRecord {
            transcriptions: vec![TranscriptSegment {
                text: "Гол!".to_string(),
                label: None,
            }],
            ..Default::default()
        },
    );

    let mut video_scenes = BTreeMap::new();
    video_scenes.insert(
        "scene_1".to_string(),
        vec![VideoFrameRecord {
            detections: vec![Detection {
                class_name: "person".to_string(),
                confidence: 0.99,
            }],
            ..Default::default()
        }],
    );
    video_scenes.insert("scene_2".to_string(), vec![VideoFrameRecord::default()]);

    let summarizer = ChatSummarizer::new(config(&server)).unwrap();
    let summaries = summarize_scenes(&summarizer, &audio_scenes, &video_scenes)
        .await
        .unwrap();

    assert_eq!(summaries.len(), 1);
    assert_eq!(summaries["scene_1"], "Сцена на стадионе.");
}
