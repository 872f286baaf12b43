mod caption_engine;
mod completion_client;
mod object_detector;
mod speech_engine;
mod transcription_engine;

pub use caption_engine::{CaptionEngine, CaptionError};
pub use completion_client::{CompletionClient, CompletionError};
pub use object_detector::{DetectorError, ObjectDetector};
pub use speech_engine::{SpeechEngine, SpeechError};
pub use transcription_engine::{TranscriptionEngine, TranscriptionError};
