/// Configuration schema and defaults for senti.
///
/// Sections: `[api]`, `[history]`, `[web]`, and `[logging]`. Every field has
/// a built-in default except the API key, which must be supplied by the user.
use serde::{Deserialize, Serialize};

/// Default sentiment-analysis endpoint.
pub const DEFAULT_API_URL: &str = "https://api.apiverve.com/v1/sentimentanalysis";

/// Default dashboard bind address.
pub const DEFAULT_WEB_ADDR: &str = "127.0.0.1:9747";

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Top-level senti configuration.
///
/// Maps directly to `~/.senti/config.toml` and `.senti.toml`. All sections
/// and fields are optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SentiConfig {
    pub api: ApiConfig,
    pub history: HistoryConfig,
    pub web: WebConfig,
    pub logging: LoggingConfig,
}

// ---------------------------------------------------------------------------
// [api]
// ---------------------------------------------------------------------------

/// Sentiment API endpoint and credential.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Analysis endpoint URL.
    pub url: String,
    /// API credential sent as `x-api-key`. Also `SENTI_API_KEY`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_API_URL.to_string(),
            api_key: None,
        }
    }
}

// ---------------------------------------------------------------------------
// [history]
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// History file path. Defaults to `~/.senti/history.json`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
}

// ---------------------------------------------------------------------------
// [web]
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WebConfig {
    /// Bind address for `senti web`.
    pub addr: String,
    /// Open the dashboard in the default browser on start.
    pub open_browser: bool,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            addr: DEFAULT_WEB_ADDR.to_string(),
            open_browser: true,
        }
    }
}

// ---------------------------------------------------------------------------
// [logging]
// ---------------------------------------------------------------------------

/// Diagnostic log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl std::fmt::Display for LogFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Json => write!(f, "json"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `tracing` filter directive, e.g. `warn` or `senti=debug`.
    pub level: String,
    /// `text` or `json`.
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            format: LogFormat::Text,
        }
    }
}

// ---------------------------------------------------------------------------
// Annotated default file
// ---------------------------------------------------------------------------

impl SentiConfig {
    /// The annotated config written by `senti config init`.
    pub fn default_toml() -> String {
        format!(
            r#"# senti configuration
#
# Configuration hierarchy (highest precedence wins):
#   1. Environment variables (SENTI_*)
#   2. Project config (.senti.toml in current directory)
#   3. User global config (~/.senti/config.toml)
#   4. Built-in defaults

[api]
url = "{DEFAULT_API_URL}"
# api_key = "your-api-key"   # Or set SENTI_API_KEY. Free keys: https://dashboard.apiverve.com

[history]
# file = "/path/to/history.json"   # Default: ~/.senti/history.json

[web]
addr = "{DEFAULT_WEB_ADDR}"
open_browser = true

[logging]
level = "warn"    # tracing filter, e.g. "info" or "senti=debug"
format = "text"   # text | json
"#
        )
    }

    /// The API key with all but the last four characters hidden.
    pub fn masked_api_key(&self) -> Option<String> {
        self.api.api_key.as_deref().map(mask_secret)
    }
}

/// Hide all but the last four characters of a secret.
pub fn mask_secret(secret: &str) -> String {
    let count = secret.chars().count();
    if count <= 4 {
        return "*".repeat(count);
    }
    let tail: String = secret.chars().skip(count - 4).collect();
    format!("{}{tail}", "*".repeat(count - 4))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
