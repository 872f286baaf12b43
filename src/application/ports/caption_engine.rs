use async_trait::async_trait;

#[async_trait]
pub trait CaptionEngine: Send + Sync {
    /// Produce a natural-language description of the image.
    async fn describe(&self, image_data: &[u8], media_type: &str) -> Result<String, CaptionError>;
}

#[derive(Debug, thiserror::Error)]
pub enum CaptionError {
    #[error("api request failed: {0}")]
    ApiRequestFailed(String),
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}
