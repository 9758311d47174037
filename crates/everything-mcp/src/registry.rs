//! Method dispatch registry.
//!
//! The Rust rendition of the reference server's `setRequestHandler` table:
//! a method-name keyed map of handlers, each taking optional params and
//! returning a result value or a protocol error. No concurrency or
//! lifetime concerns live here; handlers must be `Send + Sync` only so the
//! registry can be shared across request contexts.

use std::collections::HashMap;

use serde_json::Value;
use tracing::{debug, warn};

use crate::error::McpError;
use crate::jsonrpc::{JsonRpcRequest, JsonRpcResponse, JSONRPC_VERSION};

type Handler = Box<dyn Fn(Option<Value>) -> Result<Value, McpError> + Send + Sync>;

/// Lookup table from method name to handler.
#[derive(Default)]
pub struct HandlerRegistry {
    handlers: HashMap<String, Handler>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler for a method, replacing any previous one.
    pub fn register<F>(&mut self, method: impl Into<String>, handler: F)
    where
        F: Fn(Option<Value>) -> Result<Value, McpError> + Send + Sync + 'static,
    {
        self.handlers.insert(method.into(), Box::new(handler));
    }

    pub fn contains(&self, method: &str) -> bool {
        self.handlers.contains_key(method)
    }

    /// Registered method names, sorted for stable output.
    pub fn methods(&self) -> Vec<&str> {
        let mut methods: Vec<&str> = self.handlers.keys().map(String::as_str).collect();
        methods.sort_unstable();
        methods
    }

    /// Dispatch one request.
    ///
    /// Returns `None` for notifications (no id): the handler still runs, but
    /// failures are only logged since there is nowhere to send them.
    pub fn dispatch(&self, request: &JsonRpcRequest) -> Option<JsonRpcResponse> {
        let outcome = if request.jsonrpc != JSONRPC_VERSION {
            Err(McpError::invalid_request(format!(
                "unsupported jsonrpc version: {}",
                request.jsonrpc
            )))
        } else {
            match self.handlers.get(&request.method) {
                Some(handler) => handler(request.params.clone()),
                None => Err(McpError::method_not_found(&request.method)),
            }
        };

        match (&request.id, outcome) {
            (Some(id), Ok(result)) => {
                debug!(method = %request.method, "[Registry] Request handled");
                Some(JsonRpcResponse::success(id.clone(), result))
            }
            (Some(id), Err(err)) => {
                debug!(method = %request.method, code = err.code, "[Registry] Request failed");
                Some(JsonRpcResponse::failure(id.clone(), err))
            }
            (None, Ok(_)) => None,
            (None, Err(err)) => {
                warn!(method = %request.method, %err, "[Registry] Notification handler failed");
                None
            }
        }
    }
}
