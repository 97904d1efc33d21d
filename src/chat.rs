//! Chat backend client for free-form copilot replies.

use crate::error::LaunchError;
use crate::types::ChatMessage;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::instrument;

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    history: &'a [ChatMessage],
    message: &'a str,
}

/// Assistant reply; no schema beyond the response text.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatReply {
    pub response: String,
}

/// Thin client for the chat completion endpoint.
#[derive(Debug, Clone)]
pub struct ChatClient {
    http_client: Client,
    chat_url: String,
}

impl ChatClient {
    pub fn new(http_client: Client, chat_url: impl Into<String>) -> Self {
        Self {
            http_client,
            chat_url: chat_url.into(),
        }
    }

    /// Send the running history plus the new user message, returning the
    /// assistant's reply.
    #[instrument(skip(self, history))]
    pub async fn send(
        &self,
        history: &[ChatMessage],
        message: &str,
    ) -> Result<ChatReply, LaunchError> {
        let response = self
            .http_client
            .post(&self.chat_url)
            .json(&ChatRequest { history, message })
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LaunchError::Chat(format!("chat returned {}: {}", status, body)));
        }
        Ok(response.json().await?)
    }
}
