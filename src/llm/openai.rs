// OpenAI-compatible chat-completions client
//
// Works against mlx_lm.server, Ollama's /v1 endpoint, and any other server
// speaking the OpenAI chat format. Every failure is folded into
// `Completion::Failed`.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::types::{Completion, CompletionRequest};
use super::LlmClient;
use crate::config::constants::{DEFAULT_REQUEST_TIMEOUT_SECS, PREFLIGHT_TIMEOUT_SECS};
use crate::errors::{IdeanatorError, IdeanatorResult};

/// Chat-completions client for a local or remote OpenAI-compatible server
#[derive(Clone)]
pub struct OpenAiCompatClient {
    client: Client,
    base_url: String,
    model: String,
    api_key: String,
    name: String,
}

impl OpenAiCompatClient {
    /// Create a client for `base_url` (e.g. `http://localhost:8080/v1`)
    pub fn new(base_url: impl Into<String>, model: impl Into<String>) -> Result<Self> {
        Self::with_timeout(base_url, model, Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS))
    }

    /// Create a client with a custom per-request timeout
    pub fn with_timeout(
        base_url: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
            // Local servers ignore the key but some proxies insist on one.
            api_key: "local".to_string(),
            name: "openai-compat".to_string(),
        })
    }

    /// Set the API key sent as a bearer token
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = api_key.into();
        self
    }

    /// Set the name used in logs
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Check that the server answers `GET /models`.
    ///
    /// Never fails; an unreachable server yields `false`.
    pub async fn preflight(&self) -> bool {
        match self.check_server().await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("Preflight check failed: {e}");
                false
            }
        }
    }

    /// Like [`preflight`](Self::preflight), but says what went wrong.
    pub async fn check_server(&self) -> IdeanatorResult<()> {
        let url = format!("{}/models", self.base_url);
        let response = self
            .client
            .get(&url)
            .timeout(Duration::from_secs(PREFLIGHT_TIMEOUT_SECS))
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(|e| IdeanatorError::Server(format!("{url} unreachable: {e}")))?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(IdeanatorError::Server(format!("{url} returned {status}")))
        }
    }

    fn to_chat_request<'a>(&'a self, request: &'a CompletionRequest) -> ChatRequest<'a> {
        ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: &request.system_prompt,
                },
                ChatMessage {
                    role: "user",
                    content: &request.user_message,
                },
            ],
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        }
    }

    async fn send_once(&self, request: &CompletionRequest) -> Result<String> {
        let url = format!("{}/chat/completions", self.base_url);
        let body = self.to_chat_request(request);

        tracing::debug!(
            model = %self.model,
            temperature = request.temperature,
            max_tokens = request.max_tokens,
            "Sending chat completion"
        );

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .context("Failed to send request to model server")?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            anyhow::bail!("Model server returned {status}: {error_body}");
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .context("Failed to parse model server response")?;

        let choice = parsed
            .choices
            .into_iter()
            .next()
            .context("Model server returned no choices")?;

        Ok(choice.message.content.unwrap_or_default().trim().to_string())
    }
}

#[async_trait]
impl LlmClient for OpenAiCompatClient {
    async fn call(&self, request: &CompletionRequest) -> Completion {
        match self.send_once(request).await {
            Ok(text) => Completion::Text(text),
            Err(e) => {
                tracing::warn!("Model call failed: {e:#}");
                Completion::Failed(format!("{e:#}"))
            }
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}

// ── Wire types ─────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}
