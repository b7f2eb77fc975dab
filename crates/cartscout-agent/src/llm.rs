//! Chat-completion service used to turn a shopper's question into an action
//! line and to summarize pipeline output.

use std::time::Duration;

use async_trait::async_trait;
use cartscout_core::AppConfig;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::AgentError;

/// Sampling temperature for every completion. Kept near zero so the action
/// line format stays stable.
pub const TEMPERATURE: f64 = 0.01;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Anything that can complete an ordered conversation with one reply.
#[async_trait]
pub trait CompletionService: Send + Sync {
    /// # Errors
    ///
    /// Returns [`AgentError`] when the service is unreachable or its reply
    /// cannot be read.
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, AgentError>;
}

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f64,
}

#[derive(Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<CompletionChoice>,
}

#[derive(Deserialize)]
struct CompletionChoice {
    message: CompletionMessage,
}

#[derive(Deserialize)]
struct CompletionMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Client for an OpenAI-compatible `/chat/completions` endpoint.
pub struct OpenAiCompletionClient {
    client: Client,
    endpoint: String,
    api_key: String,
    model: String,
}

impl OpenAiCompletionClient {
    /// # Errors
    ///
    /// Returns [`AgentError::Http`] if the HTTP client cannot be constructed.
    pub fn new(
        base_url: &str,
        api_key: &str,
        model: &str,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, AgentError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent(user_agent)
            .build()?;
        Ok(Self {
            client,
            endpoint: format!("{}/chat/completions", base_url.trim_end_matches('/')),
            api_key: api_key.to_owned(),
            model: model.to_owned(),
        })
    }

    /// # Errors
    ///
    /// Returns [`AgentError::MissingApiKey`] when `OPENAI_API_KEY` is not set.
    pub fn from_config(config: &AppConfig) -> Result<Self, AgentError> {
        let api_key = config
            .completion_api_key
            .as_deref()
            .ok_or(AgentError::MissingApiKey("OPENAI_API_KEY"))?;
        Self::new(
            &config.completion_base_url,
            api_key,
            &config.completion_model,
            config.request_timeout_secs,
            &config.user_agent,
        )
    }
}

#[async_trait]
impl CompletionService for OpenAiCompletionClient {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, AgentError> {
        let request = CompletionRequest {
            model: &self.model,
            messages,
            temperature: TEMPERATURE,
        };

        tracing::debug!(
            model = %self.model,
            turns = messages.len(),
            "requesting completion"
        );
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(AgentError::CompletionStatus {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: CompletionResponse =
            serde_json::from_str(&body).map_err(|e| AgentError::Json {
                context: "completion response".to_owned(),
                source: e,
            })?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or(AgentError::EmptyCompletion)
    }
}
