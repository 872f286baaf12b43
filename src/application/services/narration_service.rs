use std::sync::Arc;

use crate::application::ports::{
    CaptionEngine, CaptionError, CompletionClient, CompletionError, ObjectDetector, SpeechEngine,
    SpeechError, TranscriptionEngine, TranscriptionError,
};
use crate::domain::{AudioFormat, Capture, NarrationOutcome};

/// Returned to the caller when the detector produced no usable output.
pub const DETECTION_SENTINEL: &str = "nothing";

/// Master pipeline: one capture in, one narration out.
///
/// Transcription and captioning are independent and run concurrently;
/// detection, summarization, and speech synthesis each depend on what came
/// before and run sequentially. Detection is best-effort.
pub struct NarrationService<T, C, L, S>
where
    T: TranscriptionEngine,
    C: CaptionEngine,
    L: CompletionClient,
    S: SpeechEngine,
{
    transcription: Arc<T>,
    caption: Arc<C>,
    completion: Arc<L>,
    speech: Arc<S>,
    detector: Arc<dyn ObjectDetector>,
}

impl<T, C, L, S> NarrationService<T, C, L, S>
where
    T: TranscriptionEngine,
    C: CaptionEngine,
    L: CompletionClient,
    S: SpeechEngine,
{
    pub fn new(
        transcription: Arc<T>,
        caption: Arc<C>,
        completion: Arc<L>,
        speech: Arc<S>,
        detector: Arc<dyn ObjectDetector>,
    ) -> Self {
        Self {
            transcription,
            caption,
            completion,
            speech,
            detector,
        }
    }

    pub async fn narrate(&self, capture: Capture) -> Result<NarrationOutcome, NarrationError> {
        let (transcript, caption) = tokio::join!(
            self.transcribe_with_fallback(&capture.audio),
            self.caption
                .describe(&capture.image, &capture.image_media_type),
        );
        let transcript = transcript?;
        let caption = caption.map_err(NarrationError::Caption)?;

        tracing::debug!(
            transcript_chars = transcript.len(),
            caption_chars = caption.len(),
            "Transcription and captioning complete"
        );

        let detection = match self.detector.detect(&capture.image).await {
            Ok(text) if !text.trim().is_empty() => Some(text.trim().to_string()),
            Ok(_) => {
                tracing::debug!("Detector produced no labels");
                None
            }
            Err(e) => {
                tracing::warn!(error = %e, "Object detection failed, continuing without it");
                None
            }
        };

        let prompt = build_scene_prompt(&transcript, &caption, detection.as_deref());
        let summary = self
            .completion
            .complete(&prompt)
            .await
            .map_err(NarrationError::Summarization)?;

        let speech = self
            .speech
            .synthesize(&summary)
            .await
            .map_err(NarrationError::Speech)?;

        tracing::info!(
            summary_chars = summary.len(),
            speech_bytes = speech.len(),
            detected = detection.is_some(),
            "Narration pipeline complete"
        );

        Ok(NarrationOutcome {
            summary,
            speech,
            detection: detection.unwrap_or_else(|| DETECTION_SENTINEL.to_string()),
        })
    }

    /// Submit the clip once per declared format until the upstream accepts
    /// it. The bytes are never re-encoded; only the declared container
    /// changes between attempts.
    async fn transcribe_with_fallback(&self, audio: &[u8]) -> Result<String, NarrationError> {
        let mut last_error = None;
        for format in AudioFormat::ATTEMPT_ORDER {
            match self.transcription.transcribe(audio, *format).await {
                Ok(text) => return Ok(text),
                Err(e) => {
                    tracing::warn!(
                        format = format.as_mime(),
                        error = %e,
                        "Transcription attempt failed"
                    );
                    last_error = Some(e);
                }
            }
        }
        Err(NarrationError::Transcription(
            last_error.expect("attempt order is never empty"),
        ))
    }
}

/// User content for the summarizer: the transcript and caption always, the
/// detector labels when present.
pub fn build_scene_prompt(transcript: &str, caption: &str, detection: Option<&str>) -> String {
    let mut prompt = format!(
        "The user said: \"{}\"\n\nWhat the camera sees: {}",
        transcript, caption
    );
    if let Some(labels) = detection {
        prompt.push_str("\n\nObjects detected (label confidence): ");
        prompt.push_str(labels);
    }
    prompt
}

#[derive(Debug, thiserror::Error)]
pub enum NarrationError {
    #[error("transcription failed after retry: {0}")]
    Transcription(TranscriptionError),
    #[error("captioning: {0}")]
    Caption(CaptionError),
    #[error("summarization: {0}")]
    Summarization(CompletionError),
    #[error("speech synthesis: {0}")]
    Speech(SpeechError),
}
