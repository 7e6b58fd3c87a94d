use serde::{Deserialize, Serialize};

use super::types::{ChatMessage, CompletionClient};
use super::CompletionError;
use crate::config::CompletionConfig;

pub const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Returned when the service answers without any text block.
pub const EMPTY_REPLY_FALLBACK: &str = "Sorry, I am not able to respond right now.";

/// Anthropic Messages API client.
pub struct AnthropicClient {
    base_url: String,
    api_key: Option<String>,
    model: String,
    max_tokens: u32,
    client: reqwest::blocking::Client,
    timeout_secs: u64,
}

impl AnthropicClient {
    pub fn new(config: &CompletionConfig) -> Result<Self, CompletionError> {
        let client = reqwest::blocking::Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| CompletionError::HttpClient(e.to_string()))?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            client,
            timeout_secs: config.request_timeout.as_secs(),
        })
    }

    /// Client configured from `ANAM_*` environment variables.
    pub fn from_env() -> Result<Self, CompletionError> {
        Self::new(&CompletionConfig::from_env())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    fn classify_send_error(&self, e: reqwest::Error) -> CompletionError {
        if e.is_timeout() {
            CompletionError::Timeout(self.timeout_secs)
        } else if e.is_connect() {
            CompletionError::NoNetwork(self.base_url.clone())
        } else {
            CompletionError::HttpClient(e.to_string())
        }
    }
}

/// Request body for POST /v1/messages
#[derive(Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<&'a str>,
    messages: &'a [ChatMessage],
}

/// Response body from POST /v1/messages (fields we use)
#[derive(Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    text: Option<String>,
}

impl MessagesResponse {
    fn first_text(self) -> Option<String> {
        self.content
            .into_iter()
            .find(|block| block.kind == "text")
            .and_then(|block| block.text)
    }
}

impl CompletionClient for AnthropicClient {
    fn complete(
        &self,
        system: Option<&str>,
        messages: &[ChatMessage],
    ) -> Result<String, CompletionError> {
        let api_key = self.api_key.as_deref().ok_or(CompletionError::MissingApiKey)?;
        let url = format!("{}/v1/messages", self.base_url);
        let body = MessagesRequest {
            model: &self.model,
            max_tokens: self.max_tokens,
            system,
            messages,
        };

        tracing::debug!(
            model = %self.model,
            messages = messages.len(),
            "Sending completion request"
        );

        let response = self
            .client
            .post(&url)
            .header("x-api-key", api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&body)
            .send()
            .map_err(|e| self.classify_send_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            tracing::warn!(status = status.as_u16(), "Completion request rejected");
            return Err(CompletionError::from_status(status.as_u16(), body));
        }

        let parsed: MessagesResponse = response
            .json()
            .map_err(|e| CompletionError::ResponseParsing(e.to_string()))?;

        Ok(parsed
            .first_text()
            .unwrap_or_else(|| EMPTY_REPLY_FALLBACK.to_string()))
    }
}
