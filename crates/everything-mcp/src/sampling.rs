//! Sampling requests from server to client.
//!
//! The reference server asks the client to run an LLM completion when a
//! resource subscription starts. Over the demo transports the request is
//! emitted on the notification bus with a unique id and not awaited; the
//! reply would arrive out-of-band as an inbound message. At-most-once,
//! consistent with the transport's delivery contract.

use std::sync::atomic::{AtomicI64, Ordering};

use serde_json::json;

use crate::jsonrpc::JsonRpcRequest;

/// Method name for a server-initiated sampling request.
pub const CREATE_MESSAGE: &str = "sampling/createMessage";

const DEFAULT_MAX_TOKENS: u32 = 100;

static NEXT_REQUEST_ID: AtomicI64 = AtomicI64::new(1);

/// Build a `sampling/createMessage` request asking the client to summarize
/// some resource context, with a fresh request id.
pub fn create_message_request(context: &str, uri: &str, max_tokens: Option<u32>) -> JsonRpcRequest {
    let id = NEXT_REQUEST_ID.fetch_add(1, Ordering::Relaxed);
    JsonRpcRequest::new(
        CREATE_MESSAGE,
        Some(json!({
            "messages": [
                {
                    "role": "user",
                    "content": {
                        "type": "text",
                        "text": format!("Resource {uri} context: {context}"),
                    },
                }
            ],
            "systemPrompt": "You are a helpful test server.",
            "maxTokens": max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
            "temperature": 0.7,
            "includeContext": "thisServer",
        })),
        id,
    )
}
