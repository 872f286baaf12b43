mod openai_speech_engine;
mod openai_whisper_engine;

pub use openai_speech_engine::OpenAiSpeechEngine;
pub use openai_whisper_engine::OpenAiWhisperEngine;
