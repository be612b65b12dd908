/// Blocking HTTP client for the APIVerve sentiment-analysis endpoint.
///
/// Sends `POST {url}` with a JSON body `{"text": ...}` and an `x-api-key`
/// header using the synchronous `ureq` client. The response envelope is
/// `{"status": "ok", "data": {...}}` on success and
/// `{"status": "error", "error": "..."}` otherwise; the envelope is read even
/// when the HTTP status is not 2xx.
use serde::{Deserialize, Serialize};

use super::{SentimentApi, SentimentReading};
use crate::config::schema::ApiConfig;
use crate::error::AnalysisError;

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

/// Request body for the analysis endpoint.
#[derive(Debug, Serialize)]
struct AnalyzeRequest<'a> {
    text: &'a str,
}

/// Response envelope.
#[derive(Debug, Deserialize)]
pub struct AnalyzeResponse {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub data: Option<AnalyzeData>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Payload of a successful analysis.
#[derive(Debug, Default, Deserialize)]
pub struct AnalyzeData {
    #[serde(default, rename = "sentimentText")]
    pub sentiment_text: Option<String>,
    #[serde(default)]
    pub sentiment: Option<String>,
    #[serde(default)]
    pub comparative: Option<f64>,
}

impl AnalyzeResponse {
    /// Interpret a parsed JSON body. A body whose fields have the wrong
    /// types is an API error, keeping its `error` string when readable.
    pub fn interpret(body: &serde_json::Value) -> Result<SentimentReading, AnalysisError> {
        match AnalyzeResponse::deserialize(body) {
            Ok(envelope) => envelope.into_reading(),
            Err(e) => {
                tracing::debug!(error = %e, "analysis response has unexpected shape");
                let message = body.get("error").and_then(serde_json::Value::as_str);
                Err(AnalysisError::from_server_message(message))
            }
        }
    }

    /// Map the envelope to a reading or an API error.
    pub fn into_reading(self) -> Result<SentimentReading, AnalysisError> {
        match (self.status.as_deref(), self.data) {
            (Some("ok"), Some(data)) => Ok(data.into_reading()),
            _ => Err(AnalysisError::from_server_message(self.error.as_deref())),
        }
    }
}

impl AnalyzeData {
    fn into_reading(self) -> SentimentReading {
        let non_empty = |s: Option<String>| s.filter(|v| !v.is_empty());
        SentimentReading {
            label: non_empty(self.sentiment_text).or_else(|| non_empty(self.sentiment)),
            comparative: self.comparative.unwrap_or(0.0),
        }
    }
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// Synchronous sentiment API client.
#[derive(Debug, Clone)]
pub struct SentimentClient {
    url: String,
    api_key: Option<String>,
}

impl SentimentClient {
    pub fn new(url: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            url: url.into(),
            api_key: api_key.filter(|k| !k.trim().is_empty()),
        }
    }

    /// Build a client from the resolved `[api]` section.
    pub fn from_config(config: &ApiConfig) -> Self {
        Self::new(config.url.clone(), config.api_key.clone())
    }
}

impl SentimentApi for SentimentClient {
    fn analyze(&self, text: &str) -> Result<SentimentReading, AnalysisError> {
        let Some(api_key) = self.api_key.as_deref() else {
            return Err(AnalysisError::missing_credential());
        };

        tracing::debug!(url = %self.url, chars = text.chars().count(), "sending analysis request");

        let result = ureq::post(&self.url)
            .set("Content-Type", "application/json")
            .set("x-api-key", api_key)
            .send_json(AnalyzeRequest { text });

        let response = match result {
            Ok(resp) => resp,
            // Error statuses still carry the JSON envelope with the message.
            Err(ureq::Error::Status(code, resp)) => {
                tracing::debug!(status = code, "analysis endpoint returned error status");
                resp
            }
            Err(ureq::Error::Transport(e)) => {
                tracing::error!(error = %e, url = %self.url, "analysis request failed");
                return Err(AnalysisError::transport());
            }
        };

        let body: serde_json::Value = response.into_json().map_err(|e| {
            tracing::error!(error = %e, "failed to parse analysis response");
            AnalysisError::transport()
        })?;

        AnalyzeResponse::interpret(&body)
    }

    fn endpoint(&self) -> Option<&str> {
        Some(&self.url)
    }

    fn has_credential(&self) -> bool {
        self.api_key.is_some()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> AnalyzeResponse {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn ok_response_prefers_sentiment_text() {
        let reading = parse(
            r#"{"status":"ok","data":{"sentimentText":"Positive","sentiment":"pos","comparative":0.4}}"#,
        )
        .into_reading()
        .unwrap();
        assert_eq!(reading.label.as_deref(), Some("Positive"));
        assert_eq!(reading.comparative, 0.4);
    }

    #[test]
    fn ok_response_falls_back_to_sentiment_and_zero_score() {
        let reading = parse(r#"{"status":"ok","data":{"sentiment":"negative"}}"#)
            .into_reading()
            .unwrap();
        assert_eq!(reading.label.as_deref(), Some("negative"));
        assert_eq!(reading.comparative, 0.0);
    }

    #[test]
    fn empty_sentiment_text_falls_through() {
        let reading = parse(r#"{"status":"ok","data":{"sentimentText":"","sentiment":"neutral"}}"#)
            .into_reading()
            .unwrap();
        assert_eq!(reading.label.as_deref(), Some("neutral"));
    }

    #[test]
    fn error_status_surfaces_server_message() {
        let err = parse(r#"{"status":"error","error":"bad request"}"#)
            .into_reading()
            .unwrap_err();
        assert_eq!(err, AnalysisError::Api("bad request".to_string()));
    }

    #[test]
    fn ok_without_data_is_generic_api_error() {
        let err = parse(r#"{"status":"ok","data":null}"#)
            .into_reading()
            .unwrap_err();
        assert_eq!(err.to_string(), crate::error::GENERIC_API_FAILURE);
    }

    #[test]
    fn missing_status_is_api_error() {
        let err = parse(r#"{}"#).into_reading().unwrap_err();
        assert!(matches!(err, AnalysisError::Api(_)));
    }

    #[test]
    fn mistyped_fields_are_api_errors() {
        let err = AnalyzeResponse::interpret(&serde_json::json!({ "status": 1 })).unwrap_err();
        assert_eq!(err, AnalysisError::Api(crate::error::GENERIC_API_FAILURE.to_string()));

        let err = AnalyzeResponse::interpret(&serde_json::json!({
            "status": "ok",
            "data": "x",
            "error": "unexpected payload",
        }))
        .unwrap_err();
        assert_eq!(err, AnalysisError::Api("unexpected payload".to_string()));
    }

    #[test]
    fn interpret_accepts_well_formed_body() {
        let body = serde_json::json!({
            "status": "ok",
            "data": { "sentimentText": "Neutral", "comparative": 0.0 },
        });
        let reading = AnalyzeResponse::interpret(&body).unwrap();
        assert_eq!(reading.label.as_deref(), Some("Neutral"));
    }

    #[test]
    fn client_without_key_fails_before_any_request() {
        // Port 9 (discard) would fail as transport if a request were sent.
        let client = SentimentClient::new("http://127.0.0.1:9/analyze", None);
        assert!(!client.has_credential());
        assert!(matches!(
            client.analyze("hello"),
            Err(AnalysisError::Config(_))
        ));
    }

    #[test]
    fn blank_key_counts_as_missing() {
        let client = SentimentClient::new("http://example.invalid", Some("  ".to_string()));
        assert!(!client.has_credential());
    }
}
