//! Out-of-band message routing into sessions.

use std::time::Duration;

use everything_core::{SessionId, StreamError};
use pretty_assertions::assert_eq;
use serde_json::json;

use crate::{response_data, setup};

#[tokio::test]
async fn posted_message_reaches_the_live_stream() {
    let (registry, adapter, router) = setup();
    let session = registry.get_or_create(None);

    let mut attachment = adapter.attach(session.id()).unwrap();
    let _greeting = attachment.try_next_frame().unwrap();

    router
        .route(session.id(), br#"{"jsonrpc":"2.0","method":"ping","id":1}"#)
        .unwrap();

    let frame = tokio::time::timeout(Duration::from_secs(1), attachment.next_frame())
        .await
        .expect("routed frame within timeout")
        .expect("stream open");
    assert_eq!(
        response_data(&frame),
        &json!({"jsonrpc": "2.0", "method": "ping", "id": 1})
    );
}

#[tokio::test]
async fn posted_message_buffers_while_detached() {
    let (registry, adapter, router) = setup();
    let session = registry.get_or_create(None);

    router.route(session.id(), br#"{"n": 1}"#).unwrap();
    router.route(session.id(), br#"{"n": 2}"#).unwrap();
    assert_eq!(session.buffered(), 2);

    let mut attachment = adapter.attach(session.id()).unwrap();
    let _greeting = attachment.try_next_frame().unwrap();
    assert_eq!(response_data(&attachment.try_next_frame().unwrap())["n"], 1);
    assert_eq!(response_data(&attachment.try_next_frame().unwrap())["n"], 2);
}

#[tokio::test]
async fn rejections_leave_no_trace() {
    let (registry, _adapter, router) = setup();
    let session = registry.get_or_create(None);

    let ghost = SessionId::from("never-created");
    assert!(matches!(
        router.route(&ghost, b"{}").unwrap_err(),
        StreamError::UnknownTarget(_)
    ));
    assert!(registry.get(&ghost).is_none());

    assert!(matches!(
        router.route(session.id(), b"{broken").unwrap_err(),
        StreamError::InvalidPayload(_)
    ));
    assert_eq!(session.buffered(), 0);
}
