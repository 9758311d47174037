//! SSE streaming: greeting, delivery, resumption, and keepalives.

use std::time::Duration;

use pretty_assertions::assert_eq;
use reqwest::StatusCode;
use serde_json::{json, Value};
use tests::{sse, TestServer};

use everything_gateway::GatewayConfig;

/// Gateway with keepalives effectively disabled, so frame-order
/// assertions never race a ping sweep.
async fn quiet_server() -> TestServer {
    TestServer::spawn_with(GatewayConfig {
        ping_period: Duration::from_secs(600),
        ..GatewayConfig::default()
    })
    .await
}

fn connection_id(response: &reqwest::Response) -> String {
    response
        .headers()
        .get("x-connection-id")
        .expect("stream exposes its session id")
        .to_str()
        .unwrap()
        .to_string()
}

#[tokio::test]
async fn stream_opens_with_a_connection_frame() {
    let server = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let response = client.get(server.url("/sse")).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response
        .headers()
        .get("content-type")
        .unwrap()
        .to_str()
        .unwrap()
        .starts_with("text/event-stream"));

    let id = connection_id(&response);
    let frames = sse::collect_frames(response, 1, Duration::from_secs(2)).await;
    assert_eq!(frames[0]["type"], "connection");
    assert_eq!(frames[0]["connectionId"], Value::String(id.clone()));
    assert!(frames[0]["message"].as_str().unwrap().contains(&id));
    assert!(frames[0]["timestamp"].is_string());
}

#[tokio::test]
async fn posted_message_arrives_on_the_stream() {
    let server = quiet_server().await;
    let client = reqwest::Client::new();

    let response = client.get(server.url("/sse")).send().await.unwrap();
    let id = connection_id(&response);

    let post = client
        .post(server.url("/message"))
        .header("X-Connection-Id", &id)
        .json(&json!({"jsonrpc": "2.0", "method": "ping", "id": 7}))
        .send()
        .await
        .unwrap();
    assert_eq!(post.status(), StatusCode::OK);

    let frames = sse::collect_frames(response, 2, Duration::from_secs(2)).await;
    assert_eq!(frames[1]["type"], "response");
    assert_eq!(frames[1]["data"]["method"], "ping");
}

#[tokio::test]
async fn resumed_session_replays_frames_missed_while_away() {
    let server = quiet_server().await;
    let client = reqwest::Client::new();

    let first = client.get(server.url("/sse")).send().await.unwrap();
    let id = connection_id(&first);
    let _ = sse::collect_frames(first, 1, Duration::from_secs(2)).await;
    // Dropping the response closed the stream; give the server a moment
    // to notice the detach
    tokio::time::sleep(Duration::from_millis(100)).await;

    for n in 1..=3 {
        let post = client
            .post(server.url("/message"))
            .header("X-Connection-Id", &id)
            .json(&json!({"seq": n}))
            .send()
            .await
            .unwrap();
        assert_eq!(post.status(), StatusCode::OK);
    }

    let second = client
        .get(server.url(&format!("/sse?session={id}")))
        .send()
        .await
        .unwrap();
    assert_eq!(connection_id(&second), id);

    let frames = sse::collect_frames(second, 4, Duration::from_secs(2)).await;
    assert_eq!(frames[0]["type"], "connection");
    for (i, frame) in frames[1..4].iter().enumerate() {
        assert_eq!(frame["type"], "response");
        assert_eq!(frame["data"]["seq"], (i + 1) as i64);
    }
}

#[tokio::test]
async fn non_header_safe_resume_id_is_rejected() {
    let server = TestServer::spawn().await;
    let client = reqwest::Client::new();

    // Percent-encoded newline survives query decoding but can never be
    // echoed back as a header value
    let response = client
        .get(server.url("/sse?session=bad%0Aid"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn second_stream_on_the_same_session_conflicts() {
    let server = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let first = client.get(server.url("/sse")).send().await.unwrap();
    let id = connection_id(&first);

    let second = client
        .get(server.url(&format!("/sse?session={id}")))
        .send()
        .await
        .unwrap();
    assert_eq!(second.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn keepalive_pings_count_up() {
    let server = TestServer::spawn_with(GatewayConfig {
        ping_period: Duration::from_millis(100),
        ..GatewayConfig::default()
    })
    .await;
    let client = reqwest::Client::new();

    let response = client.get(server.url("/sse")).send().await.unwrap();
    let frames = sse::collect_frames(response, 3, Duration::from_secs(3)).await;

    let pings: Vec<&Value> = frames
        .iter()
        .filter(|frame| frame["type"] == "ping")
        .collect();
    assert!(pings.len() >= 2, "expected pings, got {frames:?}");
    assert_eq!(pings[0]["count"], 1);
    assert_eq!(pings[1]["count"], 2);
}
