//! The remote fallback seam.

use crate::config::LlmConfig;
use crate::error::{LlmError, LlmResult};
use crate::request::FallbackRequest;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

/// Answers questions the router could not.
#[async_trait]
pub trait FallbackAsker: Send + Sync {
    async fn ask(&self, request: &FallbackRequest) -> LlmResult<String>;
}

/// Fallback that never reaches the network.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineAsker;

#[async_trait]
impl FallbackAsker for OfflineAsker {
    async fn ask(&self, _request: &FallbackRequest) -> LlmResult<String> {
        Err(LlmError::Offline)
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    temperature: f64,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

/// Chat-completions client for Groq's OpenAI-compatible API.
pub struct GroqClient {
    client: Client,
    config: LlmConfig,
}

impl GroqClient {
    /// Build a client using the configured timeout.
    ///
    /// # Errors
    ///
    /// Returns `LlmError::Http` if the underlying HTTP client cannot be built.
    pub fn new(config: LlmConfig) -> LlmResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .no_proxy()
            .build()
            .map_err(|e| LlmError::Http(e.to_string()))?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &LlmConfig {
        &self.config
    }
}

#[async_trait]
impl FallbackAsker for GroqClient {
    /// Send one user message and return the first choice verbatim.
    async fn ask(&self, request: &FallbackRequest) -> LlmResult<String> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or(LlmError::MissingApiKey)?;

        let body = ChatRequest {
            model: &self.config.model,
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: request.prompt(),
            }],
            temperature: self.config.temperature,
        };

        tracing::debug!(model = %self.config.model, "sending fallback request");
        let response = self
            .client
            .post(self.config.completions_url())
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::Http(e.to_string()))?;

        if !response.status().is_success() {
            return Err(LlmError::Status {
                status: response.status().as_u16(),
                reason: response
                    .status()
                    .canonical_reason()
                    .unwrap_or("Unknown")
                    .to_string(),
            });
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| LlmError::MalformedResponse(e.to_string()))?;

        parsed
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or(LlmError::EmptyResponse)
    }
}

impl std::fmt::Debug for GroqClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GroqClient")
            .field("base_url", &self.config.base_url)
            .field("model", &self.config.model)
            .finish_non_exhaustive()
    }
}
