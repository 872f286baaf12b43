use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;

use sightline::application::ports::{DetectorError, ObjectDetector};
use sightline::application::services::NarrationService;
use sightline::infrastructure::audio::{OpenAiSpeechEngine, OpenAiWhisperEngine};
use sightline::infrastructure::detector::YoloCommandDetector;
use sightline::infrastructure::llm::{OpenAiCaptionEngine, OpenAiCompletionClient};
use sightline::infrastructure::observability::{TracingConfig, init_tracing};
use sightline::presentation::{AppState, Settings, create_router};

/// Stands in for the detector when none is configured; the pipeline treats
/// its error as "no labels" and carries on.
struct DisabledDetector;

#[async_trait::async_trait]
impl ObjectDetector for DisabledDetector {
    async fn detect(&self, _image_data: &[u8]) -> Result<String, DetectorError> {
        Err(DetectorError::Disabled)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::from_env()?;

    init_tracing(TracingConfig::default(), settings.server.port);

    tracing::info!(
        environment = %settings.environment,
        detector_enabled = settings.detector.is_some(),
        "Configuration loaded"
    );

    let openai = &settings.openai;
    let transcription = Arc::new(OpenAiWhisperEngine::new(
        &openai.base_url,
        &openai.api_key,
        &openai.transcription_model,
    ));
    let caption = Arc::new(OpenAiCaptionEngine::new(
        &openai.base_url,
        &openai.api_key,
        &openai.caption_model,
    ));
    let completion = Arc::new(OpenAiCompletionClient::new(
        &openai.base_url,
        &openai.api_key,
        &openai.completion_model,
    ));
    let speech = Arc::new(OpenAiSpeechEngine::new(
        &openai.base_url,
        &openai.api_key,
        &openai.speech_model,
        &openai.voice,
    ));

    let detector: Arc<dyn ObjectDetector> = match &settings.detector {
        Some(d) => Arc::new(YoloCommandDetector::new(&d.program, &d.weights)),
        None => Arc::new(DisabledDetector),
    };

    let narration_service = Arc::new(NarrationService::new(
        transcription,
        caption,
        completion,
        speech,
        detector,
    ));

    let state = AppState { narration_service };
    let router = create_router(state);

    let addr: SocketAddr = format!("{}:{}", settings.server.host, settings.server.port).parse()?;
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}
