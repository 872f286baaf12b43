use async_trait::async_trait;
use base64::{Engine as _, engine::general_purpose};
use serde::Deserialize;

use crate::application::ports::{CaptionEngine, CaptionError};

const CAPTION_PROMPT: &str = "Describe this image in detail.";
const CAPTION_MAX_TOKENS: u32 = 300;

pub struct OpenAiCaptionEngine {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl OpenAiCaptionEngine {
    pub fn new(base_url: &str, api_key: &str, model: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
        }
    }
}

#[derive(Deserialize)]
struct ChatCompletion {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChatMessage,
}

#[derive(Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

#[async_trait]
impl CaptionEngine for OpenAiCaptionEngine {
    async fn describe(&self, image_data: &[u8], media_type: &str) -> Result<String, CaptionError> {
        let b64 = general_purpose::STANDARD.encode(image_data);
        let data_uri = format!("data:{};base64,{}", media_type, b64);

        let body = serde_json::json!({
            "model": self.model,
            "messages": [
                {
                    "role": "user",
                    "content": [
                        {
                            "type": "text",
                            "text": CAPTION_PROMPT
                        },
                        {
                            "type": "image_url",
                            "image_url": { "url": data_uri }
                        }
                    ]
                }
            ],
            "max_tokens": CAPTION_MAX_TOKENS,
        });

        let url = format!("{}/chat/completions", self.base_url);

        tracing::debug!(
            model = %self.model,
            media_type = %media_type,
            image_bytes = image_data.len(),
            "Requesting image caption"
        );

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| CaptionError::ApiRequestFailed(format!("request: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(CaptionError::ApiRequestFailed(format!(
                "status {}: {}",
                status, text
            )));
        }

        let completion: ChatCompletion = response
            .json()
            .await
            .map_err(|e| CaptionError::InvalidResponse(format!("parse: {}", e)))?;

        let caption = completion
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| CaptionError::InvalidResponse("no choices returned".to_string()))?;

        tracing::info!(chars = caption.len(), "Image caption completed");

        Ok(caption.trim().to_string())
    }
}
