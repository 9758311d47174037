//! Buffered delivery: FIFO order and the drop-oldest bound.

use std::time::Duration;

use everything_core::Frame;
use pretty_assertions::assert_eq;
use serde_json::json;

use crate::{response_data, setup};

#[tokio::test]
async fn overflow_keeps_the_newest_hundred() {
    let (registry, adapter, _router) = setup();
    let session = registry.get_or_create(None);

    for i in 0..105 {
        session.enqueue(Frame::response(json!(i)));
    }
    assert_eq!(session.buffered(), 100);

    let mut attachment = adapter.attach(session.id()).unwrap();
    assert!(matches!(
        attachment.try_next_frame().unwrap(),
        Frame::Connection { .. }
    ));

    // The five oldest frames were evicted; 5..=104 survive, in order
    let mut expected = 5;
    while let Some(frame) = attachment.try_next_frame() {
        assert_eq!(response_data(&frame), &json!(expected));
        expected += 1;
    }
    assert_eq!(expected, 105);
}

#[tokio::test]
async fn mixed_frame_kinds_drain_in_arrival_order() {
    let (registry, adapter, _router) = setup();
    let session = registry.get_or_create(None);

    session.enqueue(Frame::response(json!("first")));
    session.enqueue_ping();
    session.enqueue(Frame::response(json!("second")));

    let mut attachment = adapter.attach(session.id()).unwrap();
    let _greeting = attachment.try_next_frame().unwrap();
    assert_eq!(response_data(&attachment.try_next_frame().unwrap()), "first");
    assert!(matches!(
        attachment.try_next_frame().unwrap(),
        Frame::Ping { count: 1, .. }
    ));
    assert_eq!(
        response_data(&attachment.try_next_frame().unwrap()),
        "second"
    );
}

#[tokio::test]
async fn frames_enqueued_while_attached_skip_the_buffer() {
    let (registry, adapter, _router) = setup();
    let session = registry.get_or_create(None);

    let mut attachment = adapter.attach(session.id()).unwrap();
    let _greeting = attachment.try_next_frame().unwrap();

    session.enqueue(Frame::response(json!("live")));
    assert_eq!(session.buffered(), 0);

    let frame = tokio::time::timeout(Duration::from_secs(1), attachment.next_frame())
        .await
        .expect("live frame within timeout")
        .expect("stream open");
    assert_eq!(response_data(&frame), "live");
}
