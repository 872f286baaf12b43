use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use axum::body::Body;
use axum::http::{Request, StatusCode};
use base64::{Engine as _, engine::general_purpose};
use tower::ServiceExt;

use sightline::application::ports::{
    CaptionEngine, CaptionError, CompletionClient, CompletionError, DetectorError, ObjectDetector,
    SpeechEngine, SpeechError, TranscriptionEngine, TranscriptionError,
};
use sightline::application::services::{NarrationService, build_scene_prompt};
use sightline::domain::AudioFormat;
use sightline::presentation::{AppState, create_router};

const BOUNDARY: &str = "sightline-test-boundary";
const TRANSCRIPT: &str = "hello world";
const CAPTION: &str = "a red ball on a table";
const DETECTION: &str = "ball 0.92";
const SUMMARY: &str = "There is a red ball on a table in front of you.";
const SPEECH_BYTES: &[u8] = b"fake mp3 bytes";

struct MockTranscriptionEngine {
    calls: AtomicUsize,
    failures_before_success: usize,
}

impl MockTranscriptionEngine {
    fn succeeding() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            failures_before_success: 0,
        }
    }

    fn failing_first_attempt() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            failures_before_success: 1,
        }
    }

    fn always_failing() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            failures_before_success: usize::MAX,
        }
    }

    fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl TranscriptionEngine for MockTranscriptionEngine {
    async fn transcribe(
        &self,
        _audio_data: &[u8],
        _format: AudioFormat,
    ) -> Result<String, TranscriptionError> {
        let attempt = self.calls.fetch_add(1, Ordering::SeqCst);
        if attempt < self.failures_before_success {
            Err(TranscriptionError::ApiRequestFailed(
                "upstream rejected the clip".to_string(),
            ))
        } else {
            Ok(TRANSCRIPT.to_string())
        }
    }
}

struct MockCaptionEngine {
    calls: AtomicUsize,
}

impl MockCaptionEngine {
    fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
        }
    }

    fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl CaptionEngine for MockCaptionEngine {
    async fn describe(
        &self,
        _image_data: &[u8],
        _media_type: &str,
    ) -> Result<String, CaptionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(CAPTION.to_string())
    }
}

struct MockCompletionClient {
    calls: AtomicUsize,
    prompts: Mutex<Vec<String>>,
}

impl MockCompletionClient {
    fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        }
    }

    fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn recorded_prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl CompletionClient for MockCompletionClient {
    async fn complete(&self, prompt: &str) -> Result<String, CompletionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(prompt.to_string());
        Ok(SUMMARY.to_string())
    }
}

struct MockSpeechEngine {
    calls: AtomicUsize,
}

impl MockSpeechEngine {
    fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
        }
    }

    fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl SpeechEngine for MockSpeechEngine {
    async fn synthesize(&self, _text: &str) -> Result<Vec<u8>, SpeechError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(SPEECH_BYTES.to_vec())
    }
}

enum MockDetectorBehavior {
    Labels(&'static str),
    Empty,
    Fail,
}

struct MockDetector {
    behavior: MockDetectorBehavior,
}

#[async_trait::async_trait]
impl ObjectDetector for MockDetector {
    async fn detect(&self, _image_data: &[u8]) -> Result<String, DetectorError> {
        match self.behavior {
            MockDetectorBehavior::Labels(labels) => Ok(labels.to_string()),
            MockDetectorBehavior::Empty => Ok(String::new()),
            MockDetectorBehavior::Fail => Err(DetectorError::CommandFailed {
                status: 1,
                stderr: "weights not found".to_string(),
            }),
        }
    }
}

struct TestHarness {
    transcription: Arc<MockTranscriptionEngine>,
    caption: Arc<MockCaptionEngine>,
    completion: Arc<MockCompletionClient>,
    speech: Arc<MockSpeechEngine>,
    app: axum::Router,
}

fn build_harness(
    transcription: MockTranscriptionEngine,
    detector_behavior: MockDetectorBehavior,
) -> TestHarness {
    let transcription = Arc::new(transcription);
    let caption = Arc::new(MockCaptionEngine::new());
    let completion = Arc::new(MockCompletionClient::new());
    let speech = Arc::new(MockSpeechEngine::new());

    let narration_service = Arc::new(NarrationService::new(
        Arc::clone(&transcription),
        Arc::clone(&caption),
        Arc::clone(&completion),
        Arc::clone(&speech),
        Arc::new(MockDetector {
            behavior: detector_behavior,
        }),
    ));

    let app = create_router(AppState { narration_service });

    TestHarness {
        transcription,
        caption,
        completion,
        speech,
        app,
    }
}

fn multipart_body(parts: &[(&str, &str, &str, &[u8])]) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, filename, content_type, data) in parts {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
                name, filename
            )
            .as_bytes(),
        );
        body.extend_from_slice(format!("Content-Type: {}\r\n\r\n", content_type).as_bytes());
        body.extend_from_slice(data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    body
}

fn master_request(parts: &[(&str, &str, &str, &[u8])]) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/master")
        .header(
            "content-type",
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(multipart_body(parts)))
        .unwrap()
}

fn full_capture_request() -> Request<Body> {
    master_request(&[
        ("audio", "recording.webm", "audio/webm", b"A-audio-bytes"),
        ("image", "capture.png", "image/png", b"I-image-bytes"),
    ])
}

async fn response_json(response: axum::response::Response) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn given_running_server_when_health_check_then_returns_ok() {
    let harness = build_harness(
        MockTranscriptionEngine::succeeding(),
        MockDetectorBehavior::Labels(DETECTION),
    );

    let response = harness
        .app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn given_full_capture_when_master_then_returns_complete_narration() {
    let harness = build_harness(
        MockTranscriptionEngine::succeeding(),
        MockDetectorBehavior::Labels(DETECTION),
    );

    let response = harness.app.oneshot(full_capture_request()).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = response_json(response).await;
    assert_eq!(json["summary"], SUMMARY);
    assert_eq!(json["audio"], general_purpose::STANDARD.encode(SPEECH_BYTES));
    assert_eq!(json["yoloResult"], DETECTION);

    let prompts = harness.completion.recorded_prompts();
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].contains(TRANSCRIPT));
    assert!(prompts[0].contains(CAPTION));
    assert!(prompts[0].contains(DETECTION));
}

#[tokio::test]
async fn given_missing_image_when_master_then_returns_bad_request_without_upstream_calls() {
    let harness = build_harness(
        MockTranscriptionEngine::succeeding(),
        MockDetectorBehavior::Labels(DETECTION),
    );

    let request = master_request(&[("audio", "recording.webm", "audio/webm", b"A-audio-bytes")]);
    let response = harness.app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = response_json(response).await;
    assert!(json["error"].as_str().unwrap().contains("required"));

    assert_eq!(harness.transcription.call_count(), 0);
    assert_eq!(harness.caption.call_count(), 0);
    assert_eq!(harness.completion.call_count(), 0);
    assert_eq!(harness.speech.call_count(), 0);
}

#[tokio::test]
async fn given_missing_audio_when_master_then_returns_bad_request_without_upstream_calls() {
    let harness = build_harness(
        MockTranscriptionEngine::succeeding(),
        MockDetectorBehavior::Labels(DETECTION),
    );

    let request = master_request(&[("image", "capture.png", "image/png", b"I-image-bytes")]);
    let response = harness.app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(harness.transcription.call_count(), 0);
    assert_eq!(harness.caption.call_count(), 0);
}

#[tokio::test]
async fn given_first_transcription_attempt_fails_when_master_then_second_attempt_recovers() {
    let harness = build_harness(
        MockTranscriptionEngine::failing_first_attempt(),
        MockDetectorBehavior::Labels(DETECTION),
    );

    let response = harness.app.oneshot(full_capture_request()).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = response_json(response).await;
    assert_eq!(json["summary"], SUMMARY);
    assert_eq!(harness.transcription.call_count(), 2);
}

#[tokio::test]
async fn given_all_transcription_attempts_fail_when_master_then_pipeline_aborts() {
    let harness = build_harness(
        MockTranscriptionEngine::always_failing(),
        MockDetectorBehavior::Labels(DETECTION),
    );

    let response = harness.app.oneshot(full_capture_request()).await.unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = response_json(response).await;
    assert_eq!(json["error"], "processing error");
    assert!(
        json["details"]
            .as_str()
            .unwrap()
            .contains("transcription failed after retry")
    );

    // One attempt per declared format, then give up before the later stages.
    assert_eq!(
        harness.transcription.call_count(),
        AudioFormat::ATTEMPT_ORDER.len()
    );
    assert_eq!(harness.completion.call_count(), 0);
    assert_eq!(harness.speech.call_count(), 0);
}

#[tokio::test]
async fn given_detector_failure_when_master_then_response_carries_sentinel() {
    let harness = build_harness(
        MockTranscriptionEngine::succeeding(),
        MockDetectorBehavior::Fail,
    );

    let response = harness.app.oneshot(full_capture_request()).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = response_json(response).await;
    assert_eq!(json["yoloResult"], "nothing");
    assert_eq!(json["summary"], SUMMARY);
}

#[tokio::test]
async fn given_detector_with_no_labels_when_master_then_response_carries_sentinel() {
    let harness = build_harness(
        MockTranscriptionEngine::succeeding(),
        MockDetectorBehavior::Empty,
    );

    let response = harness.app.oneshot(full_capture_request()).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = response_json(response).await;
    assert_eq!(json["yoloResult"], "nothing");

    // The sentinel never leaks into the summarizer prompt.
    let prompts = harness.completion.recorded_prompts();
    assert!(!prompts[0].contains("nothing"));
}

#[tokio::test]
async fn given_identical_captures_when_master_twice_then_responses_are_identical() {
    let harness = build_harness(
        MockTranscriptionEngine::succeeding(),
        MockDetectorBehavior::Labels(DETECTION),
    );

    let first = harness
        .app
        .clone()
        .oneshot(full_capture_request())
        .await
        .unwrap();
    let second = harness.app.oneshot(full_capture_request()).await.unwrap();

    assert_eq!(first.status(), StatusCode::OK);
    assert_eq!(second.status(), StatusCode::OK);

    let first_json = response_json(first).await;
    let second_json = response_json(second).await;
    assert_eq!(first_json, second_json);
}

#[tokio::test]
async fn given_request_without_id_when_master_then_response_contains_request_id() {
    let harness = build_harness(
        MockTranscriptionEngine::succeeding(),
        MockDetectorBehavior::Labels(DETECTION),
    );

    let response = harness.app.oneshot(full_capture_request()).await.unwrap();

    assert!(response.headers().contains_key("x-request-id"));
}

#[test]
fn given_transcript_and_caption_when_building_prompt_then_both_appear() {
    let prompt = build_scene_prompt(TRANSCRIPT, CAPTION, None);

    assert!(prompt.contains(TRANSCRIPT));
    assert!(prompt.contains(CAPTION));
    assert!(!prompt.contains("Objects detected"));
}

#[test]
fn given_detection_labels_when_building_prompt_then_labels_appear() {
    let prompt = build_scene_prompt(TRANSCRIPT, CAPTION, Some(DETECTION));

    assert!(prompt.contains(DETECTION));
    assert!(prompt.contains("Objects detected"));
}

#[test]
fn given_attempt_order_then_mp3_is_tried_before_wav() {
    assert_eq!(
        AudioFormat::ATTEMPT_ORDER,
        &[AudioFormat::Mp3, AudioFormat::Wav]
    );
    assert_eq!(AudioFormat::Mp3.file_name(), "recording.mp3");
    assert_eq!(AudioFormat::Wav.as_mime(), "audio/wav");
}
