//! Stream adapter: binds a live output channel to a session.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::debug;

use everything_core::{Frame, SessionId, StreamError};

use super::registry::{SessionHandle, SessionRegistry};

/// Attaches live sinks to sessions and hands out detach-on-drop handles.
#[derive(Clone)]
pub struct StreamAdapter {
    registry: Arc<SessionRegistry>,
}

impl StreamAdapter {
    pub fn new(registry: Arc<SessionRegistry>) -> Self {
        Self { registry }
    }

    /// Attach a live sink to the session.
    ///
    /// Rejects with `AlreadyAttached` when the session already has one (the
    /// first stream wins), and `UnknownTarget` when the session does not
    /// exist. On success the returned attachment yields, in order: the
    /// connection frame, the buffered backlog, then live frames until
    /// detach.
    pub fn attach(&self, id: &SessionId) -> Result<Attachment, StreamError> {
        let session = self
            .registry
            .get(id)
            .ok_or_else(|| StreamError::UnknownTarget(id.clone()))?;
        let frames = session.attach_sink()?;
        debug!(session = %id, "[Adapter] Stream attached");
        Ok(Attachment { session, frames })
    }
}

/// One live stream attachment. Owned by a single connection attempt.
///
/// Dropping it detaches the session: the sink is released (never reused)
/// and the buffer resumes accumulating. Producers are unaffected either
/// way.
#[derive(Debug)]
pub struct Attachment {
    session: SessionHandle,
    frames: mpsc::UnboundedReceiver<Frame>,
}

impl Attachment {
    pub fn session_id(&self) -> &SessionId {
        self.session.id()
    }

    /// Next frame to emit, or `None` once the session is torn down.
    pub async fn next_frame(&mut self) -> Option<Frame> {
        self.frames.recv().await
    }

    /// Non-blocking receive, mainly for tests.
    pub fn try_next_frame(&mut self) -> Option<Frame> {
        self.frames.try_recv().ok()
    }
}

impl Drop for Attachment {
    fn drop(&mut self) {
        self.session.detach();
    }
}
