use std::sync::Mutex;

use serde::{Deserialize, Serialize};

use super::CompletionError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One role-tagged turn in a completion request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
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

/// Text-completion abstraction (allows mocking).
pub trait CompletionClient {
    /// Generate a reply to `messages`, optionally steered by `system`.
    fn complete(
        &self,
        system: Option<&str>,
        messages: &[ChatMessage],
    ) -> Result<String, CompletionError>;

    /// Single user turn, no system prompt.
    fn send_message(&self, prompt: &str) -> Result<String, CompletionError> {
        self.complete(None, &[ChatMessage::user(prompt)])
    }
}

/// A recorded call to [`MockCompletionClient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    pub system: Option<String>,
    pub messages: Vec<ChatMessage>,
}

/// Mock completion client for testing. Returns a configurable result and
/// records every call.
pub struct MockCompletionClient {
    result: Result<String, CompletionError>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl MockCompletionClient {
    pub fn new(response: &str) -> Self {
        Self {
            result: Ok(response.to_string()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(error: CompletionError) -> Self {
        Self {
            result: Err(error),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().map(|c| c.len()).unwrap_or(0)
    }
}

impl CompletionClient for MockCompletionClient {
    fn complete(
        &self,
        system: Option<&str>,
        messages: &[ChatMessage],
    ) -> Result<String, CompletionError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(RecordedCall {
                system: system.map(str::to_string),
                messages: messages.to_vec(),
            });
        }
        self.result.clone()
    }
}
