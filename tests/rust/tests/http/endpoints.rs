//! Health, message delivery, and the direct JSON-RPC endpoint.

use pretty_assertions::assert_eq;
use reqwest::StatusCode;
use serde_json::{json, Value};
use tests::TestServer;

#[tokio::test]
async fn health_reports_ok() {
    let server = TestServer::spawn().await;
    let body: Value = reqwest::get(server.url("/health"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["status"], "ok");
    assert!(body["version"].is_string());
}

#[tokio::test]
async fn mcp_endpoint_answers_requests_inline() {
    let server = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let response = client
        .post(server.url("/mcp"))
        .json(&json!({
            "jsonrpc": "2.0",
            "method": "tools/call",
            "params": {"name": "echo", "arguments": {"message": "over http"}},
            "id": 42
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["id"], 42);
    assert_eq!(body["result"]["content"][0]["text"], "Echo: over http");
}

#[tokio::test]
async fn mcp_endpoint_accepts_notifications_with_202() {
    let server = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let response = client
        .post(server.url("/mcp"))
        .json(&json!({
            "jsonrpc": "2.0",
            "method": "notifications/initialized"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::ACCEPTED);
}

#[tokio::test]
async fn message_without_target_header_is_rejected() {
    let server = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let response = client
        .post(server.url("/message"))
        .body("{}")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn message_for_unknown_session_is_404_and_creates_nothing() {
    let server = TestServer::spawn().await;
    let client = reqwest::Client::new();

    for _ in 0..2 {
        let response = client
            .post(server.url("/message"))
            .header("X-Connection-Id", "ghost-session")
            .body("{}")
            .send()
            .await
            .unwrap();
        // Still 404 on the second try: the first rejection created nothing
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}

#[tokio::test]
async fn malformed_message_body_is_400() {
    let server = TestServer::spawn().await;
    let client = reqwest::Client::new();

    // Open a stream so the session exists
    let stream = client.get(server.url("/sse")).send().await.unwrap();
    let id = stream
        .headers()
        .get("x-connection-id")
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();

    let response = client
        .post(server.url("/message"))
        .header("X-Connection-Id", &id)
        .body("definitely not json")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
