//! Inbound message router: out-of-band POSTs into session buffers.

use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use everything_core::{Frame, SessionId, StreamError};

use super::registry::SessionRegistry;

/// Routes messages posted independently of the stream to the addressed
/// session.
///
/// Policy: unknown targets are rejected, never auto-created. Opening a
/// stream is the only way to create a session; accepting arbitrary ids
/// from unauthenticated POSTs would allow unbounded session growth.
#[derive(Clone)]
pub struct InboundRouter {
    registry: Arc<SessionRegistry>,
}

impl InboundRouter {
    pub fn new(registry: Arc<SessionRegistry>) -> Self {
        Self { registry }
    }

    /// Relay one raw message body to the target session.
    ///
    /// The body must parse as JSON (`InvalidPayload` otherwise — nothing is
    /// buffered for a malformed message) and the target must exist
    /// (`UnknownTarget` otherwise). On success the payload is wrapped in a
    /// response frame and enqueued via the session's delivery path. A
    /// routed message is client-driven activity and resets the session's
    /// idle clock.
    pub fn route(&self, target: &SessionId, body: &[u8]) -> Result<(), StreamError> {
        let payload: Value = serde_json::from_slice(body)
            .map_err(|e| StreamError::InvalidPayload(e.to_string()))?;

        let session = self
            .registry
            .get(target)
            .ok_or_else(|| StreamError::UnknownTarget(target.clone()))?;

        session.enqueue(Frame::response(payload));
        session.touch();
        debug!(session = %target, "[Router] Message routed");
        Ok(())
    }
}
