use std::path::PathBuf;

use super::Environment;

/// Runtime configuration, assembled from process environment variables.
#[derive(Debug, Clone)]
pub struct Settings {
    pub environment: Environment,
    pub server: ServerSettings,
    pub openai: OpenAiSettings,
    /// Object detection is optional; `None` when no detector command is
    /// configured.
    pub detector: Option<DetectorSettings>,
}

#[derive(Debug, Clone)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone)]
pub struct OpenAiSettings {
    pub api_key: String,
    pub base_url: String,
    pub transcription_model: String,
    pub caption_model: String,
    pub completion_model: String,
    pub speech_model: String,
    pub voice: String,
}

#[derive(Debug, Clone)]
pub struct DetectorSettings {
    pub program: PathBuf,
    pub weights: PathBuf,
}

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("OPENAI_API_KEY is not set")]
    MissingApiKey,
    #[error("invalid {name}: {message}")]
    Invalid { name: &'static str, message: String },
}

impl Settings {
    pub fn from_env() -> Result<Self, SettingsError> {
        let environment = Environment::try_from(
            std::env::var("APP_ENV").unwrap_or_else(|_| "local".to_string()),
        )
        .map_err(|message| SettingsError::Invalid {
            name: "APP_ENV",
            message,
        })?;

        let host = std::env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = match std::env::var("SERVER_PORT") {
            Ok(raw) => raw.parse().map_err(|_| SettingsError::Invalid {
                name: "SERVER_PORT",
                message: format!("not a port number: {}", raw),
            })?,
            Err(_) => 3000,
        };

        let api_key = std::env::var("OPENAI_API_KEY")
            .ok()
            .filter(|k| !k.is_empty())
            .ok_or(SettingsError::MissingApiKey)?;

        let openai = OpenAiSettings {
            api_key,
            base_url: std::env::var("OPENAI_BASE_URL")
                .unwrap_or_else(|_| "https://api.openai.com/v1".to_string()),
            transcription_model: std::env::var("OPENAI_TRANSCRIPTION_MODEL")
                .unwrap_or_else(|_| "whisper-1".to_string()),
            caption_model: std::env::var("OPENAI_CAPTION_MODEL")
                .unwrap_or_else(|_| "gpt-4o".to_string()),
            completion_model: std::env::var("OPENAI_COMPLETION_MODEL")
                .unwrap_or_else(|_| "gpt-4o-mini".to_string()),
            speech_model: std::env::var("OPENAI_SPEECH_MODEL")
                .unwrap_or_else(|_| "tts-1".to_string()),
            voice: std::env::var("OPENAI_VOICE").unwrap_or_else(|_| "alloy".to_string()),
        };

        let detector = match std::env::var("DETECTOR_COMMAND") {
            Ok(program) if !program.is_empty() => Some(DetectorSettings {
                program: PathBuf::from(program),
                weights: PathBuf::from(
                    std::env::var("DETECTOR_WEIGHTS")
                        .unwrap_or_else(|_| "yolov5s.pt".to_string()),
                ),
            }),
            _ => None,
        };

        Ok(Self {
            environment,
            server: ServerSettings { host, port },
            openai,
            detector,
        })
    }
}
