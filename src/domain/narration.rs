/// Result of one narration pipeline run.
#[derive(Debug, Clone, PartialEq)]
pub struct NarrationOutcome {
    /// Short spoken-style summary of the scene.
    pub summary: String,
    /// Synthesized speech for the summary, as MP3 bytes.
    pub speech: Vec<u8>,
    /// Raw label text from the object detector, or the sentinel value when
    /// detection produced nothing usable.
    pub detection: String,
}
