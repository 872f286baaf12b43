use axum::Json;
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use base64::{Engine as _, engine::general_purpose};
use serde::Serialize;

use crate::application::ports::{CaptionEngine, CompletionClient, SpeechEngine, TranscriptionEngine};
use crate::domain::Capture;
use crate::presentation::state::AppState;

const AUDIO_FIELD: &str = "audio";
const IMAGE_FIELD: &str = "image";
const DEFAULT_IMAGE_MEDIA_TYPE: &str = "image/jpeg";

#[derive(Serialize)]
pub struct NarrateResponse {
    pub summary: String,
    /// Base64-encoded MP3.
    pub audio: String,
    #[serde(rename = "yoloResult")]
    pub yolo_result: String,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Serialize)]
pub struct ProcessingErrorResponse {
    pub error: String,
    pub details: String,
}

/// `POST /master` — one image, one audio clip, one narrated scene back.
/// Both parts are required; nothing is sent upstream until both are present.
#[tracing::instrument(skip(state, multipart))]
pub async fn narrate_handler<T, C, L, S>(
    State(state): State<AppState<T, C, L, S>>,
    mut multipart: Multipart,
) -> impl IntoResponse
where
    T: TranscriptionEngine + 'static,
    C: CaptionEngine + 'static,
    L: CompletionClient + 'static,
    S: SpeechEngine + 'static,
{
    let mut audio: Option<Vec<u8>> = None;
    let mut image: Option<(Vec<u8>, String)> = None;

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(f)) => f,
            Ok(None) => break,
            Err(e) => {
                tracing::error!(error = %e, "Failed to read multipart");
                return (
                    StatusCode::BAD_REQUEST,
                    Json(ErrorResponse {
                        error: format!("Failed to read multipart: {}", e),
                    }),
                )
                    .into_response();
            }
        };

        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            AUDIO_FIELD => match field.bytes().await {
                Ok(data) => audio = Some(data.to_vec()),
                Err(e) => {
                    tracing::error!(error = %e, "Failed to read audio bytes");
                    return (
                        StatusCode::BAD_REQUEST,
                        Json(ErrorResponse {
                            error: format!("Failed to read audio file: {}", e),
                        }),
                    )
                        .into_response();
                }
            },
            IMAGE_FIELD => {
                let media_type = field
                    .content_type()
                    .unwrap_or(DEFAULT_IMAGE_MEDIA_TYPE)
                    .to_string();
                match field.bytes().await {
                    Ok(data) => image = Some((data.to_vec(), media_type)),
                    Err(e) => {
                        tracing::error!(error = %e, "Failed to read image bytes");
                        return (
                            StatusCode::BAD_REQUEST,
                            Json(ErrorResponse {
                                error: format!("Failed to read image file: {}", e),
                            }),
                        )
                            .into_response();
                    }
                }
            }
            other => {
                tracing::debug!(field = %other, "Ignoring unexpected multipart field");
            }
        }
    }

    let (Some(audio), Some((image, image_media_type))) = (audio, image) else {
        tracing::warn!("Narrate request missing audio or image part");
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "Both 'audio' and 'image' files are required".to_string(),
            }),
        )
            .into_response();
    };

    tracing::debug!(
        audio_bytes = audio.len(),
        image_bytes = image.len(),
        image_media_type = %image_media_type,
        "Capture received"
    );

    let capture = Capture::new(image, image_media_type, audio);

    match state.narration_service.narrate(capture).await {
        Ok(outcome) => (
            StatusCode::OK,
            Json(NarrateResponse {
                summary: outcome.summary,
                audio: general_purpose::STANDARD.encode(&outcome.speech),
                yolo_result: outcome.detection,
            }),
        )
            .into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Narration pipeline failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ProcessingErrorResponse {
                    error: "processing error".to_string(),
                    details: e.to_string(),
                }),
            )
                .into_response()
        }
    }
}
