use clap::ValueEnum;
use serde::Deserialize;

use crate::utils::constants::DEFAULT_IAM_URL;

/// ================================
/// Coordinator configuration
/// ================================
///
/// One credential identity: an API key plus the token endpoint it is
/// exchanged against. Immutable once the coordinator is built.
#[derive(Clone, Deserialize)]
pub struct CoordinatorConfig {
    pub api_key: String,
    /// Token endpoint; the production endpoint is used when absent.
    pub iam_url: Option<String>,
}

impl CoordinatorConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            iam_url: None,
        }
    }

    pub fn with_iam_url(mut self, iam_url: impl Into<String>) -> Self {
        self.iam_url = Some(iam_url.into());
        self
    }

    pub fn resolved_iam_url(&self) -> &str {
        self.iam_url.as_deref().unwrap_or(DEFAULT_IAM_URL)
    }
}

// The API key never appears in logs or debug dumps.
impl std::fmt::Debug for CoordinatorConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CoordinatorConfig")
            .field("api_key", &"[redacted]")
            .field("iam_url", &self.iam_url)
            .finish()
    }
}

/// ================================
/// Logging
/// ================================
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub level: String, // allowed: trace, debug, info, warn, error
    pub format: LogFormat,
}

impl LoggingConfig {
    pub fn new(level: String, format: LogFormat) -> Self {
        Self { level, format }
    }
}

#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Json,
    Compact,
}

impl LogFormat {
    pub fn from_env() -> Self {
        match std::env::var("LOG_FORMAT")
            .unwrap_or_else(|_| "json".to_string())
            .to_lowercase()
            .as_str()
        {
            "compact" | "text" => LogFormat::Compact,
            _ => LogFormat::Json,
        }
    }
}
