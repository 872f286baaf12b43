use std::path::PathBuf;

use async_trait::async_trait;
use tokio::process::Command;

use crate::application::ports::{DetectorError, ObjectDetector};

const IMAGE_FILE_NAME: &str = "capture.jpg";
const RUN_NAME: &str = "detect";
// The detector names the label file after the image stem.
const LABEL_FILE_NAME: &str = "capture.txt";

/// Runs an external YOLO-style detector as a subprocess. The program
/// communicates through files: it reads the image from a path argument and
/// writes one label line per detection under `<project>/<name>/labels/`.
///
/// Every invocation gets its own scratch directory, so concurrent requests
/// never share paths. The directory is removed when it goes out of scope, on
/// success and failure alike.
pub struct YoloCommandDetector {
    program: PathBuf,
    weights: PathBuf,
}

impl YoloCommandDetector {
    pub fn new(program: impl Into<PathBuf>, weights: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            weights: weights.into(),
        }
    }
}

#[async_trait]
impl ObjectDetector for YoloCommandDetector {
    async fn detect(&self, image_data: &[u8]) -> Result<String, DetectorError> {
        let scratch = tempfile::TempDir::new()
            .map_err(|e| DetectorError::ScratchDir(format!("create: {}", e)))?;

        let image_path = scratch.path().join(IMAGE_FILE_NAME);
        tokio::fs::write(&image_path, image_data)
            .await
            .map_err(|e| DetectorError::ScratchDir(format!("write image: {}", e)))?;

        let run_dir = scratch.path().join("runs");

        tracing::debug!(
            program = %self.program.display(),
            scratch = %scratch.path().display(),
            image_bytes = image_data.len(),
            "Invoking object detector"
        );

        let output = Command::new(&self.program)
            .arg("--weights")
            .arg(&self.weights)
            .arg("--source")
            .arg(&image_path)
            .arg("--project")
            .arg(&run_dir)
            .arg("--name")
            .arg(RUN_NAME)
            .arg("--save-txt")
            .arg("--exist-ok")
            .output()
            .await
            .map_err(|e| DetectorError::LaunchFailed(e.to_string()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            return Err(DetectorError::CommandFailed {
                status: output.status.code().unwrap_or(-1),
                stderr,
            });
        }

        // Read before `scratch` drops; the original read after scheduling
        // cleanup, which raced against it.
        let labels_path = run_dir.join(RUN_NAME).join("labels").join(LABEL_FILE_NAME);
        let labels = tokio::fs::read_to_string(&labels_path)
            .await
            .map_err(|e| {
                DetectorError::LabelsUnreadable(format!("{}: {}", labels_path.display(), e))
            })?;

        tracing::info!(
            lines = labels.lines().count(),
            "Object detection completed"
        );

        Ok(labels.trim().to_string())
    }
}
