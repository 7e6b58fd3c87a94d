//! Text-completion collaborator.
//!
//! The analysis core only ever needs `prompt -> text`. [`CompletionClient`]
//! is the seam; [`AnthropicClient`] talks to the Messages API over a
//! blocking HTTP client and [`MockCompletionClient`] stands in for tests.
//! No retries happen here: a failed call is classified and returned.

pub mod anthropic;
pub mod types;

pub use anthropic::*;
pub use types::*;

use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CompletionError {
    #[error("Cannot reach completion service at {0}")]
    NoNetwork(String),

    #[error("Completion API key is not configured")]
    MissingApiKey,

    #[error("Completion service rejected credentials (status {0})")]
    Authentication(u16),

    #[error("Request timed out after {0}s")]
    Timeout(u64),

    #[error("Completion service rate limit reached")]
    RateLimited,

    #[error("Completion service error (status {status}): {body}")]
    Server { status: u16, body: String },

    #[error("Unexpected completion response (status {status}): {body}")]
    UnexpectedStatus { status: u16, body: String },

    #[error("Response parsing error: {0}")]
    ResponseParsing(String),

    #[error("HTTP client error: {0}")]
    HttpClient(String),
}

/// Coarse failure class, for the message shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    NoNetwork,
    Authentication,
    Timeout,
    RateLimited,
    ServerError,
    Unknown,
}

impl FailureKind {
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::NoNetwork => "No internet connection. Please check your network.",
            Self::Authentication => "Authentication error. Please contact support.",
            Self::Timeout => "Request timed out. Please try again.",
            Self::RateLimited => "Too many requests. Please wait a moment.",
            Self::ServerError => "Server error. Please try again later.",
            Self::Unknown => "Connection error. Please try again.",
        }
    }
}

impl CompletionError {
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::NoNetwork(_) => FailureKind::NoNetwork,
            Self::MissingApiKey | Self::Authentication(_) => FailureKind::Authentication,
            Self::Timeout(_) => FailureKind::Timeout,
            Self::RateLimited => FailureKind::RateLimited,
            Self::Server { .. } => FailureKind::ServerError,
            Self::UnexpectedStatus { .. } | Self::ResponseParsing(_) | Self::HttpClient(_) => {
                FailureKind::Unknown
            }
        }
    }

    pub fn user_message(&self) -> &'static str {
        self.kind().user_message()
    }

    /// Map a non-success HTTP status to its error.
    pub fn from_status(status: u16, body: String) -> Self {
        match status {
            401 | 403 => Self::Authentication(status),
            429 => Self::RateLimited,
            500..=599 => Self::Server { status, body },
            _ => Self::UnexpectedStatus { status, body },
        }
    }
}
