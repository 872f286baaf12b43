use async_trait::async_trait;

#[async_trait]
pub trait ObjectDetector: Send + Sync {
    /// Run object detection on the image and return the raw label text.
    /// Failures here are recoverable: the pipeline continues without labels.
    async fn detect(&self, image_data: &[u8]) -> Result<String, DetectorError>;
}

#[derive(Debug, thiserror::Error)]
pub enum DetectorError {
    #[error("scratch dir: {0}")]
    ScratchDir(String),
    #[error("detector exited with {status}: {stderr}")]
    CommandFailed { status: i32, stderr: String },
    #[error("failed to launch detector: {0}")]
    LaunchFailed(String),
    #[error("label file unreadable: {0}")]
    LabelsUnreadable(String),
    #[error("detector is not configured")]
    Disabled,
}
