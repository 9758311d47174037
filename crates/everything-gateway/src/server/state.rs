//! Shared application state for the HTTP handlers.

use std::sync::Arc;

use everything_mcp::EverythingServer;

use crate::stream::{InboundRouter, SessionRegistry, StreamAdapter};

/// State handed to every handler. All members are cheap clones over shared
/// internals; the session registry is the only mutable part and guards
/// itself.
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<SessionRegistry>,
    pub adapter: StreamAdapter,
    pub inbound: InboundRouter,
    pub mcp: Arc<EverythingServer>,
}

impl AppState {
    pub fn new(registry: Arc<SessionRegistry>, mcp: Arc<EverythingServer>) -> Self {
        Self {
            adapter: StreamAdapter::new(registry.clone()),
            inbound: InboundRouter::new(registry.clone()),
            registry,
            mcp,
        }
    }
}
