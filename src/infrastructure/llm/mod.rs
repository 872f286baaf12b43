mod openai_caption_engine;
mod openai_completion_client;

pub use openai_caption_engine::OpenAiCaptionEngine;
pub use openai_completion_client::OpenAiCompletionClient;
