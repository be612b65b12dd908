//! JSON API handlers for the web dashboard.
//!
//! Each handler corresponds to an API endpoint and returns a
//! `Response<Cursor<Vec<u8>>>` with JSON content. Analysis failures are
//! answered with an `{"error", "kind"}` body so the page can show the message
//! inline; they never reach the server's 500 path.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tiny_http::{Response, StatusCode};

use super::{HttpResponse, content_type_json, error_response};
use crate::analytics::Summary;
use crate::api::SentimentApi;
use crate::dashboard::Dashboard;
use crate::error::AnalysisError;
use crate::history::{AnalysisResult, HistoryStore};

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// `POST /api/analyze` request body.
#[derive(Deserialize)]
struct AnalyzeRequest {
    #[serde(default)]
    text: String,
}

/// `POST /api/analyze` success body. `result` is null for blank input.
#[derive(Serialize)]
struct AnalyzeResponse {
    result: Option<AnalysisResult>,
}

#[derive(Serialize)]
struct HistoryResponse {
    entries: Vec<AnalysisResult>,
}

#[derive(Serialize)]
struct HealthResponse {
    credential_configured: bool,
    endpoint: Option<String>,
    history_location: Option<String>,
    history_entries: usize,
    busy: bool,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Build a JSON success response.
fn json_response<T: Serialize>(data: &T) -> Result<HttpResponse> {
    let body = serde_json::to_string(data).context("failed to serialize JSON response")?;
    Ok(Response::from_data(body.into_bytes())
        .with_header(content_type_json())
        .with_status_code(StatusCode(200)))
}

/// HTTP status used for each analysis failure.
fn status_for(err: &AnalysisError) -> u16 {
    match err {
        AnalysisError::Config(_) => 400,
        AnalysisError::Api(_) | AnalysisError::Transport(_) => 502,
        AnalysisError::Busy => 409,
    }
}

// ---------------------------------------------------------------------------
// API Handlers
// ---------------------------------------------------------------------------

/// `POST /api/analyze`: analyze text and record the result.
pub fn post_analyze<A, S>(dashboard: &Dashboard<A, S>, body: &str) -> Result<HttpResponse>
where
    A: SentimentApi,
    S: HistoryStore,
{
    let req: AnalyzeRequest = match serde_json::from_str(body) {
        Ok(req) => req,
        Err(e) => {
            tracing::debug!(error = %e, "rejecting malformed analyze request");
            return Ok(error_response(400, "invalid JSON in analyze request", None));
        }
    };

    match dashboard.analyze(&req.text) {
        Ok(result) => json_response(&AnalyzeResponse { result }),
        Err(err) => Ok(error_response(
            status_for(&err),
            &err.to_string(),
            Some(err.kind()),
        )),
    }
}

/// `GET /api/history`: all entries, newest first.
pub fn get_history<A, S>(dashboard: &Dashboard<A, S>) -> Result<HttpResponse>
where
    A: SentimentApi,
    S: HistoryStore,
{
    json_response(&HistoryResponse {
        entries: dashboard.entries(),
    })
}

/// `DELETE /api/history`: clear all entries.
pub fn delete_history<A, S>(dashboard: &Dashboard<A, S>) -> Result<HttpResponse>
where
    A: SentimentApi,
    S: HistoryStore,
{
    dashboard.clear().context("failed to clear history")?;
    json_response(&serde_json::json!({ "success": true }))
}

/// `GET /api/stats`: counts, percentages, and chart series.
pub fn get_stats<A, S>(dashboard: &Dashboard<A, S>) -> Result<HttpResponse>
where
    A: SentimentApi,
    S: HistoryStore,
{
    let summary: Summary = dashboard.summary();
    json_response(&summary)
}

/// `GET /api/health`: credential and history status.
pub fn get_health<A, S>(dashboard: &Dashboard<A, S>) -> Result<HttpResponse>
where
    A: SentimentApi,
    S: HistoryStore,
{
    let api = dashboard.api();
    let resp = HealthResponse {
        credential_configured: api.has_credential(),
        endpoint: api.endpoint().map(str::to_string),
        history_location: dashboard.store().location(),
        history_entries: dashboard.len(),
        busy: dashboard.is_busy(),
    };
    json_response(&resp)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
