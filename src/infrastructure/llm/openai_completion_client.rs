use async_trait::async_trait;
use serde::Deserialize;

use crate::application::ports::{CompletionClient, CompletionError};

/// Fixed persona for every summarization call. The narration is read aloud to
/// someone who cannot see the scene, so it must stay short and lead with
/// anything safety-relevant.
const SYSTEM_PERSONA: &str = "You are an assistant for a blind user. Combine what the user said \
with what the camera sees into a single concise, safety-oriented narration of one or two \
sentences. Mention hazards first. Do not use bullet points.";

pub struct OpenAiCompletionClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl OpenAiCompletionClient {
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
impl CompletionClient for OpenAiCompletionClient {
    async fn complete(&self, prompt: &str) -> Result<String, CompletionError> {
        let body = serde_json::json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": SYSTEM_PERSONA },
                { "role": "user", "content": prompt }
            ],
        });

        let url = format!("{}/chat/completions", self.base_url);

        tracing::debug!(model = %self.model, prompt_chars = prompt.len(), "Requesting summarization");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| CompletionError::ApiRequestFailed(format!("request: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(CompletionError::ApiRequestFailed(format!(
                "status {}: {}",
                status, text
            )));
        }

        let completion: ChatCompletion = response
            .json()
            .await
            .map_err(|e| CompletionError::InvalidResponse(format!("parse: {}", e)))?;

        let narration = completion
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| CompletionError::InvalidResponse("no choices returned".to_string()))?;

        tracing::info!(chars = narration.len(), "Summarization completed");

        Ok(narration.trim().to_string())
    }
}
