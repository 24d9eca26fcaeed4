use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

const MAX_RETRIES: u32 = 3;

/// Errors that can occur when talking to the LLM backend
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("API returned error (status {status}): {message}")]
    ApiError { status: u16, message: String },

    #[error("LLM returned empty content")]
    EmptyContent,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    stream: bool,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    message: Option<ChatReply>,
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    #[serde(default)]
    content: String,
}

/// Ollama-compatible chat client
///
/// Every extraction and email-drafting call goes through here.
#[derive(Clone)]
pub struct LlmClient {
    base_url: String,
    model: String,
    client: Client,
}

impl LlmClient {
    pub fn new(base_url: String, model: String, timeout_secs: u64) -> Result<Self, LlmError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;

        Ok(Self {
            base_url,
            model,
            client,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Send a single user prompt and return the assistant's reply
    ///
    /// Server errors are retried with exponential backoff (250ms, 500ms);
    /// client errors fail immediately.
    pub async fn chat(&self, prompt: &str) -> Result<String, LlmError> {
        let url = format!("{}/api/chat", self.base_url.trim_end_matches('/'));
        let request = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            stream: false,
        };

        let mut last_error = None;

        for attempt in 0..MAX_RETRIES {
            if attempt > 0 {
                let delay = Duration::from_millis(250 * (1 << (attempt - 1)));
                tracing::warn!(
                    "LLM call attempt {} failed, retrying after {}ms",
                    attempt,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            let response = match self.client.post(&url).json(&request).send().await {
                Ok(r) => r,
                Err(e) => {
                    last_error = Some(LlmError::RequestError(e));
                    continue;
                }
            };

            let status = response.status();
            if status.is_server_error() {
                let body = response.text().await.unwrap_or_default();
                last_error = Some(LlmError::ApiError { status: status.as_u16(), message: body });
                continue;
            }
            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(LlmError::ApiError { status: status.as_u16(), message: body });
            }

            let reply: ChatResponse = response.json().await?;
            let content = reply.message.map(|m| m.content).unwrap_or_default();
            if content.trim().is_empty() {
                return Err(LlmError::EmptyContent);
            }

            tracing::debug!("LLM reply from {} ({} chars)", self.model, content.len());
            return Ok(content);
        }

        Err(last_error.unwrap_or(LlmError::EmptyContent))
    }
}
