//! Groq API client (OpenAI-compatible chat completions)
//!
//! Single-attempt, timeout-bounded requests. Failures map onto explicit
//! [`ProviderError`] kinds; the fallback-vs-fail decision belongs to the
//! caller.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

use crate::config::ProviderConfig;
use crate::errors::ProviderError;

/// Text generation capability consumed by the reasoning expander, answer
/// engine, section classifier and synthesizer.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generate a completion for a single-prompt request
    async fn generate(&self, prompt: &str) -> Result<String, ProviderError>;
}

/// HTTP client for the Groq chat completions endpoint
pub struct GroqClient {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: String,
}

impl GroqClient {
    /// Create a client from validated provider configuration
    pub fn new(config: &ProviderConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone().unwrap_or_default(),
            model: config.model.clone(),
            temperature: 0.2,
        }
    }

    /// Same client with a different sampling temperature (reasoning and
    /// synthesis run slightly warmer than answer generation)
    pub fn with_temperature(config: &ProviderConfig, temperature: f32) -> Self {
        let mut client = Self::new(config);
        client.temperature = temperature;
        client
    }

    fn map_transport_error(err: reqwest::Error) -> ProviderError {
        if err.is_timeout() {
            ProviderError::Timeout(err.to_string())
        } else if err.is_connect() {
            ProviderError::Unavailable(err.to_string())
        } else if err.is_decode() {
            ProviderError::InvalidResponse(err.to_string())
        } else {
            ProviderError::Unavailable(err.to_string())
        }
    }

    fn map_status(status: StatusCode, body: String) -> ProviderError {
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                ProviderError::Unauthorized(format!("{status}: {body}"))
            }
            StatusCode::TOO_MANY_REQUESTS => {
                ProviderError::Unavailable(format!("rate limited: {body}"))
            }
            s if s.is_server_error() => ProviderError::Unavailable(format!("{status}: {body}")),
            _ => ProviderError::InvalidResponse(format!("{status}: {body}")),
        }
    }
}

#[async_trait]
impl TextGenerator for GroqClient {
    async fn generate(&self, prompt: &str) -> Result<String, ProviderError> {
        let url = format!("{}/chat/completions", self.base_url);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&json!({
                "model": self.model,
                "temperature": self.temperature,
                "messages": [{ "role": "user", "content": prompt }],
            }))
            .send()
            .await
            .map_err(Self::map_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Self::map_status(status, body));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::InvalidResponse(e.to_string()))?;

        parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| ProviderError::InvalidResponse("empty choices array".to_string()))
    }
}
