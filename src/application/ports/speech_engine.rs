use async_trait::async_trait;

#[async_trait]
pub trait SpeechEngine: Send + Sync {
    /// Synthesize spoken audio for the text; returns raw MP3 bytes.
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>, SpeechError>;
}

#[derive(Debug, thiserror::Error)]
pub enum SpeechError {
    #[error("api request failed: {0}")]
    ApiRequestFailed(String),
}
