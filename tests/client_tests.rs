/// Integration tests for the outbound sentiment client.
///
/// Each test starts a throwaway `tiny_http` server on an ephemeral port,
/// answers exactly the requests it expects, and reports what it received
/// back over a channel.
use std::io::Read;
use std::sync::mpsc;
use std::thread;

use senti::api::{SentimentApi, SentimentClient};
use senti::dashboard::Dashboard;
use senti::error::{AnalysisError, GENERIC_API_FAILURE, TRANSPORT_FAILURE};
use senti::history::MemoryStore;
use senti::sentiment::Sentiment;
use tiny_http::{Header, Response, Server};

/// What the mock server saw for one request.
#[derive(Debug)]
struct Received {
    method: String,
    api_key: Option<String>,
    content_type: Option<String>,
    body: String,
}

/// Start a server that answers the next `replies.len()` requests in order.
fn mock_server(replies: Vec<(u16, &'static str)>) -> (String, mpsc::Receiver<Received>) {
    let server = Server::http("127.0.0.1:0").unwrap();
    let port = server.server_addr().to_ip().unwrap().port();
    let (tx, rx) = mpsc::channel();

    thread::spawn(move || {
        for (status, body) in replies {
            let Ok(mut request) = server.recv() else {
                return;
            };
            let header = |name: &'static str| {
                request
                    .headers()
                    .iter()
                    .find(|h| h.field.equiv(name))
                    .map(|h| h.value.as_str().to_string())
            };
            let api_key = header("x-api-key");
            let content_type = header("Content-Type");
            let mut buf = String::new();
            request.as_reader().read_to_string(&mut buf).unwrap();
            let _ = tx.send(Received {
                method: request.method().to_string(),
                api_key,
                content_type,
                body: buf,
            });

            let response = Response::from_string(body)
                .with_status_code(status)
                .with_header(Header::from_bytes("Content-Type", "application/json").unwrap());
            let _ = request.respond(response);
        }
    });

    (format!("http://127.0.0.1:{port}/v1/sentimentanalysis"), rx)
}

fn client(url: &str) -> SentimentClient {
    SentimentClient::new(url, Some("test-key".to_string()))
}

#[test]
fn successful_analysis_sends_key_and_text() {
    let (url, rx) = mock_server(vec![(
        200,
        r#"{"status":"ok","error":null,"data":{"sentimentText":"Positive","sentiment":"positive","comparative":0.75}}"#,
    )]);

    let reading = client(&url).analyze("I love this").unwrap();
    assert_eq!(reading.label.as_deref(), Some("Positive"));
    assert_eq!(reading.comparative, 0.75);

    let received = rx.recv().unwrap();
    assert_eq!(received.method, "POST");
    assert_eq!(received.api_key.as_deref(), Some("test-key"));
    assert_eq!(received.content_type.as_deref(), Some("application/json"));
    let body: serde_json::Value = serde_json::from_str(&received.body).unwrap();
    assert_eq!(body, serde_json::json!({ "text": "I love this" }));
}

#[test]
fn error_envelope_surfaces_server_message() {
    let (url, _rx) = mock_server(vec![(200, r#"{"status":"error","error":"bad request"}"#)]);
    let err = client(&url).analyze("hi").unwrap_err();
    assert_eq!(err, AnalysisError::Api("bad request".to_string()));
}

#[test]
fn error_status_with_envelope_is_api_error() {
    let (url, _rx) = mock_server(vec![(
        401,
        r#"{"status":"error","error":"Invalid API key"}"#,
    )]);
    let err = client(&url).analyze("hi").unwrap_err();
    assert_eq!(err.to_string(), "Invalid API key");
    assert_eq!(err.kind(), "api");
}

#[test]
fn error_envelope_without_message_uses_generic_text() {
    let (url, _rx) = mock_server(vec![(200, r#"{"status":"error"}"#)]);
    let err = client(&url).analyze("hi").unwrap_err();
    assert_eq!(err.to_string(), GENERIC_API_FAILURE);
}

#[test]
fn mistyped_envelope_is_api_error() {
    let (url, _rx) = mock_server(vec![(200, r#"{"status":1,"data":"x"}"#)]);
    let err = client(&url).analyze("hi").unwrap_err();
    assert_eq!(err, AnalysisError::Api(GENERIC_API_FAILURE.to_string()));
}

#[test]
fn non_json_body_is_transport_error() {
    let (url, _rx) = mock_server(vec![(502, "<html>Bad Gateway</html>")]);
    let err = client(&url).analyze("hi").unwrap_err();
    assert_eq!(err, AnalysisError::Transport(TRANSPORT_FAILURE.to_string()));
}

#[test]
fn unreachable_endpoint_is_transport_error() {
    // Bind then drop to get a port nothing is listening on.
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let url = format!("http://127.0.0.1:{port}/");
    let err = client(&url).analyze("hi").unwrap_err();
    assert_eq!(err.kind(), "transport");
    assert_eq!(err.to_string(), TRANSPORT_FAILURE);
}

#[test]
fn dashboard_records_classified_result_from_endpoint() {
    let (url, rx) = mock_server(vec![(
        200,
        r#"{"status":"ok","data":{"sentimentText":"Very Negative","comparative":-1.2}}"#,
    )]);
    let dash = Dashboard::new(client(&url), MemoryStore::new());

    let entry = dash.analyze("terrible service").unwrap().unwrap();
    assert_eq!(entry.class(), Sentiment::Negative);
    assert_eq!(entry.score, -1.2);
    assert_eq!(dash.counts().negative, 1);
    assert_eq!(rx.recv().unwrap().api_key.as_deref(), Some("test-key"));
}

#[test]
fn dashboard_skips_network_for_blank_input() {
    let (url, rx) = mock_server(vec![(200, r#"{"status":"ok","data":{}}"#)]);
    let dash = Dashboard::new(client(&url), MemoryStore::new());

    assert!(dash.analyze("   \n\t").unwrap().is_none());
    assert!(dash.is_empty());
    assert!(rx.try_recv().is_err());
}

#[test]
fn dashboard_api_failure_leaves_history_untouched() {
    let (url, _rx) = mock_server(vec![(
        200,
        r#"{"status":"ok","data":{"sentimentText":"Positive","comparative":1.0}}"#,
    ), (
        500,
        r#"{"status":"error","error":"quota exceeded"}"#,
    )]);
    let dash = Dashboard::new(client(&url), MemoryStore::new());

    dash.analyze("first").unwrap();
    let err = dash.analyze("second").unwrap_err();
    assert_eq!(err.to_string(), "quota exceeded");
    assert_eq!(dash.len(), 1);
    assert_eq!(dash.entries()[0].text, "first");
    assert_eq!(dash.store().write_count(), 1);
}
