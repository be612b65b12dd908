//! Embedded web dashboard for senti.
//!
//! Provides a lightweight HTTP server (sync, via `tiny_http`) that serves:
//! - A single-page sentiment dashboard (input, chart, counters, history)
//! - JSON API endpoints the page calls for analysis, history, and stats
//!
//! Launched via `senti web` (default: `http://127.0.0.1:9747`).

mod api;
mod frontend;

use std::io::{Cursor, Read};

use anyhow::{Context, Result};
use tiny_http::{Header, Method, Response, Server, StatusCode};

use crate::api::SentimentApi;
use crate::dashboard::Dashboard;
use crate::history::HistoryStore;

pub(crate) type HttpResponse = Response<Cursor<Vec<u8>>>;

// ---------------------------------------------------------------------------
// Server entry point
// ---------------------------------------------------------------------------

/// Start the web dashboard server on the given address.
///
/// Blocks the current thread. Requests are handled sequentially; a failing
/// request gets a JSON error response and the server keeps running.
pub fn serve<A, S>(addr: &str, dashboard: &Dashboard<A, S>, open: bool) -> Result<()>
where
    A: SentimentApi,
    S: HistoryStore,
{
    let server = Server::http(addr)
        .map_err(|e| anyhow::anyhow!("failed to start HTTP server on {addr}: {e}"))?;

    println!("senti dashboard running at http://{addr}");
    println!("Press Ctrl+C to stop.\n");
    tracing::info!(%addr, "dashboard server started");

    if open {
        let url = format!("http://{addr}");
        if let Err(e) = open_browser(&url) {
            tracing::debug!(error = %e, "could not open browser");
        }
    }

    for mut request in server.incoming_requests() {
        let method = request.method().clone();
        let url = request.url().to_string();

        let body = if matches!(method, Method::Put | Method::Post | Method::Patch) {
            let mut buf = String::new();
            if let Err(e) = request.as_reader().read_to_string(&mut buf) {
                tracing::warn!(error = %e, "failed to read request body");
            }
            Some(buf)
        } else {
            None
        };

        let resp = match dispatch(dashboard, &method, &url, body.as_deref()) {
            Ok(resp) => resp,
            Err(e) => {
                tracing::error!(error = %format!("{e:#}"), %method, %url, "request failed");
                error_response(500, &e.to_string(), None)
            }
        };

        let status = resp.status_code().0;
        if let Err(e) = request.respond(resp) {
            tracing::debug!(error = %e, "failed to send response");
        }

        // Brief access log
        println!(
            "{} {} {} {}",
            method,
            url,
            status,
            chrono::Local::now().format("%H:%M:%S")
        );
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

/// Dispatch an incoming request to the appropriate handler.
pub(crate) fn dispatch<A, S>(
    dashboard: &Dashboard<A, S>,
    method: &Method,
    url: &str,
    body: Option<&str>,
) -> Result<HttpResponse>
where
    A: SentimentApi,
    S: HistoryStore,
{
    // Strip query string for path matching
    let path = url.split('?').next().unwrap_or(url);

    match (method, path) {
        // Frontend
        (&Method::Get, "/") | (&Method::Get, "/index.html") => Ok(serve_frontend()),

        // API
        (&Method::Post, "/api/analyze") => api::post_analyze(dashboard, body.unwrap_or("{}")),
        (&Method::Get, "/api/history") => api::get_history(dashboard),
        (&Method::Delete, "/api/history") => api::delete_history(dashboard),
        (&Method::Get, "/api/stats") => api::get_stats(dashboard),
        (&Method::Get, "/api/health") => api::get_health(dashboard),

        // 404
        _ => Ok(not_found()),
    }
}

// ---------------------------------------------------------------------------
// Response helpers
// ---------------------------------------------------------------------------

/// Serve the embedded single-page frontend.
fn serve_frontend() -> HttpResponse {
    Response::from_data(frontend::INDEX_HTML.as_bytes().to_vec())
        .with_header(content_type_html())
        .with_status_code(StatusCode(200))
}

/// 404 response.
fn not_found() -> HttpResponse {
    error_response(404, "not found", None)
}

/// JSON error body `{"error": ..., "kind": ...}` with the given status.
pub(crate) fn error_response(status: u16, message: &str, kind: Option<&str>) -> HttpResponse {
    let body = match kind {
        Some(kind) => serde_json::json!({ "error": message, "kind": kind }),
        None => serde_json::json!({ "error": message }),
    };
    Response::from_data(body.to_string().into_bytes())
        .with_header(content_type_json())
        .with_status_code(StatusCode(status))
}

/// JSON content type header.
pub(crate) fn content_type_json() -> Header {
    header("Content-Type", "application/json; charset=utf-8")
}

/// HTML content type header.
fn content_type_html() -> Header {
    header("Content-Type", "text/html; charset=utf-8")
}

fn header(name: &str, value: &str) -> Header {
    Header::from_bytes(name.as_bytes(), value.as_bytes()).unwrap()
}

/// Attempt to open a URL in the system default browser.
fn open_browser(url: &str) -> Result<()> {
    #[cfg(target_os = "windows")]
    {
        std::process::Command::new("cmd")
            .args(["/C", "start", url])
            .spawn()
            .context("failed to open browser")?;
    }

    #[cfg(target_os = "macos")]
    {
        std::process::Command::new("open")
            .arg(url)
            .spawn()
            .context("failed to open browser")?;
    }

    #[cfg(target_os = "linux")]
    {
        std::process::Command::new("xdg-open")
            .arg(url)
            .spawn()
            .context("failed to open browser")?;
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::SentimentReading;
    use crate::error::AnalysisError;
    use crate::history::MemoryStore;

    pub(super) struct StaticApi(pub Result<SentimentReading, AnalysisError>);

    impl SentimentApi for StaticApi {
        fn analyze(&self, _text: &str) -> Result<SentimentReading, AnalysisError> {
            self.0.clone()
        }
    }

    pub(super) fn positive_dashboard() -> Dashboard<StaticApi, MemoryStore> {
        Dashboard::new(
            StaticApi(Ok(SentimentReading {
                label: Some("positive".to_string()),
                comparative: 0.5,
            })),
            MemoryStore::new(),
        )
    }

    pub(super) fn body_of(resp: HttpResponse) -> String {
        let mut out = String::new();
        resp.into_reader().read_to_string(&mut out).unwrap();
        out
    }

    #[test]
    fn root_serves_html() {
        let dash = positive_dashboard();
        let resp = dispatch(&dash, &Method::Get, "/", None).unwrap();
        assert_eq!(resp.status_code(), StatusCode(200));
        assert!(body_of(resp).contains("<!DOCTYPE html>"));
    }

    #[test]
    fn unknown_route_is_404() {
        let dash = positive_dashboard();
        let resp = dispatch(&dash, &Method::Get, "/nope", None).unwrap();
        assert_eq!(resp.status_code(), StatusCode(404));
        assert!(body_of(resp).contains("not found"));
    }

    #[test]
    fn query_string_is_ignored_for_routing() {
        let dash = positive_dashboard();
        let resp = dispatch(&dash, &Method::Get, "/api/stats?x=1", None).unwrap();
        assert_eq!(resp.status_code(), StatusCode(200));
    }

    #[test]
    fn error_response_includes_kind() {
        let body = body_of(error_response(409, "busy", Some("busy")));
        assert!(body.contains("\"kind\":\"busy\""));
    }
}
