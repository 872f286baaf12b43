/// One capture submitted by the client: a still image and a short voice clip.
/// Every field is request-scoped and dropped once the response is sent.
#[derive(Debug, Clone, PartialEq)]
pub struct Capture {
    pub image: Vec<u8>,
    pub image_media_type: String,
    pub audio: Vec<u8>,
}

impl Capture {
    pub fn new(image: Vec<u8>, image_media_type: String, audio: Vec<u8>) -> Self {
        Self {
            image,
            image_media_type,
            audio,
        }
    }
}

/// Container format declared to the transcription service. Browsers emit
/// whatever the recorder supports, so the same bytes may need to be submitted
/// under more than one declared format before the upstream accepts them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AudioFormat {
    Mp3,
    Wav,
}

impl AudioFormat {
    /// Order in which formats are attempted during transcription.
    pub const ATTEMPT_ORDER: &'static [AudioFormat] = &[AudioFormat::Mp3, AudioFormat::Wav];

    pub fn as_mime(&self) -> &'static str {
        match self {
            Self::Mp3 => "audio/mpeg",
            Self::Wav => "audio/wav",
        }
    }

    /// Filename hint sent with the upload; the upstream keys format detection
    /// off the extension.
    pub fn file_name(&self) -> &'static str {
        match self {
            Self::Mp3 => "recording.mp3",
            Self::Wav => "recording.wav",
        }
    }
}
