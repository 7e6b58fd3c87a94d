use std::path::PathBuf;
use std::time::Duration;

/// Application-level constants
pub const APP_NAME: &str = "Anam";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default Anthropic endpoint for the assistant and insight explanations.
pub const DEFAULT_COMPLETION_BASE_URL: &str = "https://api.anthropic.com";
pub const DEFAULT_COMPLETION_MODEL: &str = "claude-sonnet-4-20250514";
pub const DEFAULT_MAX_TOKENS: u32 = 1024;

/// AI responses can take a while; reads get a longer budget than connects.
pub const CONNECT_TIMEOUT_SECS: u64 = 30;
pub const REQUEST_TIMEOUT_SECS: u64 = 60;

const ENV_API_KEY: &str = "ANAM_API_KEY";
const ENV_MODEL: &str = "ANAM_COMPLETION_MODEL";
const ENV_BASE_URL: &str = "ANAM_COMPLETION_BASE_URL";
const ENV_DATABASE_PATH: &str = "ANAM_DATABASE_PATH";

/// Get the application data directory
/// ~/Anam/ on all platforms. Falls back to the working directory when no
/// home directory can be determined (service accounts, containers).
pub fn app_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
}

/// Journal database location. `ANAM_DATABASE_PATH` overrides the default.
pub fn database_path() -> PathBuf {
    match std::env::var(ENV_DATABASE_PATH) {
        Ok(path) if !path.trim().is_empty() => PathBuf::from(path),
        _ => app_data_dir().join("anam.db"),
    }
}

/// Tracing filter used when `ANAM_LOG` / `RUST_LOG` are unset.
pub fn default_log_filter() -> &'static str {
    "anam_lib=info,anam=info"
}

/// Settings for the text-completion collaborator.
#[derive(Debug, Clone)]
pub struct CompletionConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub model: String,
    pub max_tokens: u32,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_COMPLETION_BASE_URL.to_string(),
            api_key: None,
            model: DEFAULT_COMPLETION_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            connect_timeout: Duration::from_secs(CONNECT_TIMEOUT_SECS),
            request_timeout: Duration::from_secs(REQUEST_TIMEOUT_SECS),
        }
    }
}

impl CompletionConfig {
    /// Build from environment, keeping defaults for anything unset.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(key) = non_empty_env(ENV_API_KEY) {
            config.api_key = Some(key);
        }
        if let Some(model) = non_empty_env(ENV_MODEL) {
            config.model = model;
        }
        if let Some(url) = non_empty_env(ENV_BASE_URL) {
            config.base_url = url;
        }
        config
    }
}

fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
