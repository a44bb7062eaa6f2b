//! LLM client for post rewriting.
//!
//! Talks to an Ollama-compatible API. The client itself returns typed
//! errors; the delivery boundary is expected to fail soft by rendering the
//! error as a visible string instead of aborting.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, error};

use crate::config::LlmSettings;
use crate::models::Post;

/// Posts shorter than this are refused rather than sent to the model.
const MIN_REWRITE_LEN: usize = 10;

/// Errors from the rewrite service.
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("connection error: {0}")]
    Connection(String),

    #[error("API error: {0}")]
    Api(String),

    #[error("failed to parse response: {0}")]
    Parse(String),
}

/// Ollama generate request format.
#[derive(Debug, Serialize)]
struct GenerateRequest {
    model: String,
    prompt: String,
    stream: bool,
    options: GenerateOptions,
}

#[derive(Debug, Serialize)]
struct GenerateOptions {
    temperature: f32,
}

/// Ollama generate response format.
#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: String,
}

/// Client for the rewrite service.
pub struct LlmClient {
    settings: LlmSettings,
    client: Client,
}

impl LlmClient {
    /// Create a new client with the configured endpoint and timeout.
    pub fn new(settings: LlmSettings) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(settings.timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self { settings, client }
    }

    /// Rewrite a post's text, optionally with a caller-supplied instruction
    /// and model identifier.
    pub async fn rewrite(
        &self,
        post: &Post,
        instruction: Option<&str>,
        model: Option<&str>,
    ) -> Result<String, LlmError> {
        let text = post.text.trim();
        if text.chars().count() < MIN_REWRITE_LEN {
            return Ok("Post is too short to rewrite".to_string());
        }

        let model = model.unwrap_or(&self.settings.model);
        let instruction = instruction.unwrap_or(&self.settings.default_instruction);
        let prompt = format!("{instruction}\n\nOriginal post:\n{text}\n\nRewrite:");

        debug!(post = %post.post_link, model, "requesting rewrite");

        let url = format!("{}/api/generate", self.settings.endpoint);
        let body = GenerateRequest {
            model: model.to_string(),
            prompt,
            stream: false,
            options: GenerateOptions {
                temperature: self.settings.temperature,
            },
        };

        let mut request = self.client.post(&url).json(&body);
        if let Some(key) = &self.settings.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await.map_err(|e| {
            error!(post = %post.post_link, model, "rewrite request failed: {e}");
            LlmError::Connection(e.to_string())
        })?;

        if !response.status().is_success() {
            return Err(LlmError::Api(format!("HTTP {}", response.status())));
        }

        let generated: GenerateResponse = response
            .json()
            .await
            .map_err(|e| LlmError::Parse(e.to_string()))?;

        Ok(generated.response.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MediaType;

    fn post_with_text(text: &str) -> Post {
        Post {
            channel_slug: "chan".to_string(),
            channel_link: "https://t.me/chan".to_string(),
            post_link: "https://t.me/chan/1".to_string(),
            text: text.to_string(),
            posted_at: None,
            views: 0,
            forwards: 0,
            has_media: false,
            is_forwarded: false,
            media_type: MediaType::text(true),
            photo_url: None,
            video_url: None,
        }
    }

    #[tokio::test]
    async fn test_short_post_is_refused_without_network() {
        let client = LlmClient::new(LlmSettings::default());
        let result = client.rewrite(&post_with_text("short"), None, None).await;
        assert_eq!(result.unwrap(), "Post is too short to rewrite");
    }

    #[tokio::test]
    async fn test_whitespace_only_post_is_refused() {
        let client = LlmClient::new(LlmSettings::default());
        let result = client.rewrite(&post_with_text("   \n\n  "), None, None).await;
        assert_eq!(result.unwrap(), "Post is too short to rewrite");
    }
}
