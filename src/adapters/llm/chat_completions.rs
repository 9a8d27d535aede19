//! OpenAI-compatible chat-completions client.
//!
//! Sends a single user message and returns the first choice's content.
//! Rate limits, server errors and transport failures are retried with
//! exponential backoff; anything else fails immediately.

use async_trait::async_trait;
use backoff::ExponentialBackoffBuilder;
use reqwest::{header, Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::LlmConfig;
use crate::domain::ports::TextGenerator;

/// Environment variable consulted when no key is configured.
pub const API_KEY_ENV: &str = "UPLIFTXP_LLM_API_KEY";

#[derive(Debug, Error)]
pub enum ChatClientError {
    #[error("No API key configured (set llm.api_key or {API_KEY_ENV})")]
    MissingApiKey,
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("API returned {status}: {body}")]
    Api { status: StatusCode, body: String },
    #[error("Response contained no choices")]
    EmptyResponse,
}

impl ChatClientError {
    /// Errors worth another attempt.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Http(e) => e.is_timeout() || e.is_connect() || e.is_request(),
            Self::Api { status, .. } => {
                *status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
            }
            Self::MissingApiKey | Self::EmptyResponse => false,
        }
    }
}

impl From<ChatClientError> for DomainError {
    fn from(err: ChatClientError) -> Self {
        Self::RemoteUnavailable(err.to_string())
    }
}

#[derive(Debug, Clone)]
pub struct ChatCompletionsConfig {
    pub base_url: String,
    pub model: String,
    pub api_key: Option<String>,
    pub timeout: Duration,
    pub temperature: f32,
    pub max_tokens: u32,
    pub max_retries: u32,
    pub initial_backoff: Duration,
}

impl From<&LlmConfig> for ChatCompletionsConfig {
    fn from(config: &LlmConfig) -> Self {
        Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key: config.api_key.clone(),
            timeout: Duration::from_secs(config.timeout_secs),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            max_retries: config.max_retries,
            initial_backoff: Duration::from_millis(500),
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 1],
    temperature: f32,
    max_tokens: u32,
    top_p: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

pub struct ChatCompletionsClient {
    http: Client,
    config: ChatCompletionsConfig,
    api_key: String,
}

impl ChatCompletionsClient {
    /// Build a client; the key comes from the config or [`API_KEY_ENV`].
    pub fn new(config: ChatCompletionsConfig) -> Result<Self, ChatClientError> {
        let api_key = config
            .api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .or_else(|| std::env::var(API_KEY_ENV).ok().filter(|key| !key.trim().is_empty()))
            .ok_or(ChatClientError::MissingApiKey)?;

        let http = Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            http,
            config,
            api_key,
        })
    }

    async fn send_once(&self, prompt: &str) -> Result<String, ChatClientError> {
        let request = ChatRequest {
            model: &self.config.model,
            messages: [ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
            top_p: 1.0,
        };

        let response = self
            .http
            .post(format!("{}/chat/completions", self.config.base_url))
            .header(header::AUTHORIZATION, format!("Bearer {}", self.api_key))
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ChatClientError::Api { status, body });
        }

        let body: ChatResponse = response.json().await?;
        body.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or(ChatClientError::EmptyResponse)
    }

    /// Send with retries.
    pub async fn send(&self, prompt: &str) -> Result<String, ChatClientError> {
        let policy = ExponentialBackoffBuilder::new()
            .with_initial_interval(self.config.initial_backoff)
            .with_max_interval(Duration::from_secs(10))
            .with_max_elapsed_time(None)
            .build();

        let max_retries = self.config.max_retries;
        let mut attempt = 0_u32;
        backoff::future::retry(policy, || {
            attempt += 1;
            let current = attempt;
            let request = self.send_once(prompt);
            async move {
                match request.await {
                    Ok(text) => Ok(text),
                    Err(e) if e.is_transient() && current <= max_retries => {
                        debug!(attempt = current, error = %e, "Retrying chat completion");
                        Err(backoff::Error::transient(e))
                    }
                    Err(e) => Err(backoff::Error::permanent(e)),
                }
            }
        })
        .await
    }
}

#[async_trait]
impl TextGenerator for ChatCompletionsClient {
    async fn complete(&self, prompt: &str) -> DomainResult<String> {
        self.send(prompt).await.map_err(|e| {
            warn!(model = %self.config.model, error = %e, "Chat completion failed");
            e.into()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(api_key: Option<&str>) -> ChatCompletionsConfig {
        ChatCompletionsConfig {
            api_key: api_key.map(str::to_string),
            ..ChatCompletionsConfig::from(&LlmConfig::default())
        }
    }

    #[test]
    fn test_missing_key() {
        temp_env::with_var_unset(API_KEY_ENV, || {
            assert!(matches!(
                ChatCompletionsClient::new(config(None)),
                Err(ChatClientError::MissingApiKey)
            ));
            assert!(matches!(
                ChatCompletionsClient::new(config(Some("  "))),
                Err(ChatClientError::MissingApiKey)
            ));
        });
    }

    #[test]
    fn test_key_from_env() {
        temp_env::with_var(API_KEY_ENV, Some("env-key"), || {
            let client = ChatCompletionsClient::new(config(None)).unwrap();
            assert_eq!(client.api_key, "env-key");
        });
    }

    #[test]
    fn test_transient_classification() {
        let api = |status| ChatClientError::Api {
            status,
            body: String::new(),
        };
        assert!(api(StatusCode::TOO_MANY_REQUESTS).is_transient());
        assert!(api(StatusCode::BAD_GATEWAY).is_transient());
        assert!(!api(StatusCode::UNAUTHORIZED).is_transient());
        assert!(!ChatClientError::EmptyResponse.is_transient());
    }

    #[test]
    fn test_base_url_trailing_slash() {
        let llm = LlmConfig {
            base_url: "http://localhost:9000/v1/".to_string(),
            ..LlmConfig::default()
        };
        assert_eq!(ChatCompletionsConfig::from(&llm).base_url, "http://localhost:9000/v1");
    }
}
