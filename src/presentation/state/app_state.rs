use std::sync::Arc;

use crate::application::ports::{CaptionEngine, CompletionClient, SpeechEngine, TranscriptionEngine};
use crate::application::services::NarrationService;

pub struct AppState<T, C, L, S>
where
    T: TranscriptionEngine,
    C: CaptionEngine,
    L: CompletionClient,
    S: SpeechEngine,
{
    pub narration_service: Arc<NarrationService<T, C, L, S>>,
}

impl<T, C, L, S> Clone for AppState<T, C, L, S>
where
    T: TranscriptionEngine,
    C: CaptionEngine,
    L: CompletionClient,
    S: SpeechEngine,
{
    fn clone(&self) -> Self {
        Self {
            narration_service: Arc::clone(&self.narration_service),
        }
    }
}
