//! Analysis error taxonomy
//!
//! Every failure of a single analysis is recovered at the dashboard
//! boundary and rendered as an inline message; none of them end the process.

use thiserror::Error;

/// Generic message shown when the API reports failure without a message.
pub const GENERIC_API_FAILURE: &str = "Failed to analyze sentiment";

/// Message shown for network and parse failures.
pub const TRANSPORT_FAILURE: &str = "API request failed. Check your API key.";

/// Errors a single analysis can end with.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalysisError {
    /// No API credential is configured; the request was never sent.
    #[error("{0}")]
    Config(String),

    /// The API answered with a non-"ok" status or without a data payload.
    #[error("{0}")]
    Api(String),

    /// The request could not be completed or its response could not be read.
    #[error("{0}")]
    Transport(String),

    /// Another analysis is still in flight.
    #[error("An analysis is already in progress")]
    Busy,
}

impl AnalysisError {
    /// The credential is missing.
    pub fn missing_credential() -> Self {
        Self::Config(
            "Add your API key: set SENTI_API_KEY or api.api_key in ~/.senti/config.toml"
                .to_string(),
        )
    }

    /// API failure using the server-provided message when it has one.
    pub fn from_server_message(message: Option<&str>) -> Self {
        match message.map(str::trim).filter(|m| !m.is_empty()) {
            Some(m) => Self::Api(m.to_string()),
            None => Self::Api(GENERIC_API_FAILURE.to_string()),
        }
    }

    /// Transport failure with the fixed user-facing message.
    pub fn transport() -> Self {
        Self::Transport(TRANSPORT_FAILURE.to_string())
    }

    /// Short machine-readable kind, used by the web API.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Config(_) => "config",
            Self::Api(_) => "api",
            Self::Transport(_) => "transport",
            Self::Busy => "busy",
        }
    }
}
