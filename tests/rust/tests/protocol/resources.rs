//! Resource listing, pagination, reading, and subscriptions.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use pretty_assertions::assert_eq;
use serde_json::json;

use crate::{call, server};

#[test]
fn first_page_is_ten_resources_with_a_cursor() {
    let (server, _bus) = server();
    let page = call(&server, "resources/list", None, 1);
    let resources = page["resources"].as_array().unwrap();
    assert_eq!(resources.len(), 10);
    assert_eq!(resources[0]["uri"], "test://static/resource/1");
    assert!(page["nextCursor"].is_string());
}

#[test]
fn cursor_walk_covers_all_hundred_resources() {
    let (server, _bus) = server();
    let mut uris = Vec::new();
    let mut cursor: Option<String> = None;
    let mut id = 1;

    loop {
        let params = cursor.as_ref().map(|c| json!({"cursor": c}));
        let page = call(&server, "resources/list", params, id);
        id += 1;
        for resource in page["resources"].as_array().unwrap() {
            uris.push(resource["uri"].as_str().unwrap().to_string());
        }
        match page["nextCursor"].as_str() {
            Some(next) => cursor = Some(next.to_string()),
            None => break,
        }
    }

    assert_eq!(uris.len(), 100);
    assert_eq!(uris[99], "test://static/resource/100");
    // No duplicates across pages
    let mut deduped = uris.clone();
    deduped.sort();
    deduped.dedup();
    assert_eq!(deduped.len(), 100);
}

#[test]
fn read_alternates_text_and_blob() {
    let (server, _bus) = server();

    let odd = call(
        &server,
        "resources/read",
        Some(json!({"uri": "test://static/resource/3"})),
        1,
    );
    assert_eq!(odd["contents"][0]["mimeType"], "text/plain");
    assert_eq!(
        odd["contents"][0]["text"],
        "Resource 3: This is a plaintext resource"
    );

    let even = call(
        &server,
        "resources/read",
        Some(json!({"uri": "test://static/resource/4"})),
        2,
    );
    assert_eq!(even["contents"][0]["mimeType"], "application/octet-stream");
    let blob = even["contents"][0]["blob"].as_str().unwrap();
    let decoded = STANDARD.decode(blob).unwrap();
    assert_eq!(decoded, b"Resource 4: This is a base64 blob");
}

#[test]
fn unknown_uri_read_fails() {
    let (server, _bus) = server();
    let req = everything_mcp::JsonRpcRequest::new(
        "resources/read",
        Some(json!({"uri": "test://static/resource/999"})),
        1,
    );
    let resp = server.handle(&req).unwrap();
    assert_eq!(resp.error.expect("error response").code, -32602);
}

#[test]
fn templates_expose_the_id_slot() {
    let (server, _bus) = server();
    let result = call(&server, "resources/templates/list", None, 1);
    assert_eq!(
        result["resourceTemplates"][0]["uriTemplate"],
        "test://static/resource/{id}"
    );
}

#[test]
fn subscribe_emits_a_sampling_request() {
    let (server, bus) = server();
    let mut rx = bus.subscribe();

    let _ = call(
        &server,
        "resources/subscribe",
        Some(json!({"uri": "test://static/resource/7"})),
        1,
    );
    assert_eq!(server.subscriptions(), vec!["test://static/resource/7"]);

    let emitted = rx.try_recv().expect("sampling request on bus");
    assert_eq!(emitted["method"], "sampling/createMessage");
    assert_eq!(emitted["params"]["includeContext"], "thisServer");

    let _ = call(
        &server,
        "resources/unsubscribe",
        Some(json!({"uri": "test://static/resource/7"})),
        2,
    );
    assert!(server.subscriptions().is_empty());
}
