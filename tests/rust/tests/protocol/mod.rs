//! Protocol tests
//!
//! Full dispatch through the capability server's handler registry, no
//! HTTP involved.

mod capabilities;
mod resources;

use everything_core::NotificationBus;
use everything_mcp::{EverythingServer, JsonRpcRequest};
use serde_json::Value;

pub(crate) fn server() -> (EverythingServer, NotificationBus) {
    let bus = NotificationBus::new();
    (EverythingServer::new(bus.sender()), bus)
}

/// Dispatch one request and unwrap the successful result.
pub(crate) fn call(
    server: &EverythingServer,
    method: &str,
    params: Option<Value>,
    id: i64,
) -> Value {
    let response = server
        .handle(&JsonRpcRequest::new(method, params, id))
        .expect("request gets a response");
    assert!(
        response.is_success(),
        "{method} failed: {:?}",
        response.error
    );
    response.result.expect("success carries a result")
}
