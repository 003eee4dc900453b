//! Chat completion client for the hosted LLM.

use serde::{Deserialize, Serialize};

/// A single chat message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Request body for `/chat/completions`.
#[derive(Debug, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f64,
    pub max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
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

/// Failure modes of a completion call.
#[derive(Debug, thiserror::Error)]
pub enum CompletionError {
    #[error("Completion request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("Completion service returned {status}: {body}")]
    Service { status: u16, body: String },
    #[error("Completion service returned no message")]
    EmptyReply,
}

/// Client for an OpenAI-compatible chat completion endpoint.
#[derive(Debug, Clone)]
pub struct CompletionClient {
    http_client: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl CompletionClient {
    /// Create a new completion client with an already-resolved API key.
    pub fn new(base_url: &str, api_key: impl Into<String>) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            endpoint: format!("{}/chat/completions", base_url.trim_end_matches('/')),
            api_key: api_key.into(),
        }
    }

    /// Send a chat request and return the first choice's text.
    pub async fn complete(&self, request: &ChatRequest) -> Result<String, CompletionError> {
        let response = self
            .http_client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CompletionError::Service {
                status: status.as_u16(),
                body,
            });
        }

        let chat: ChatResponse = response.json().await?;

        chat.choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or(CompletionError::EmptyReply)
    }
}
