//! Session registry: identity map plus per-session state.
//!
//! The registry is the only process-wide mutable map. Each session's state
//! sits behind its own mutex so enqueue, drain, attach, and detach are
//! single atomic steps from the perspective of other operations on the
//! same session. Registry operations never hold a session lock while
//! touching the map from inside a session, so lock order is always
//! map -> session.

use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use parking_lot::Mutex;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use everything_core::{Frame, SessionId, SessionState, StreamError};

use super::buffer::FrameBuffer;

pub(crate) type FrameSink = mpsc::UnboundedSender<Frame>;

#[derive(Debug)]
struct SessionInner {
    state: SessionState,
    buffer: FrameBuffer,
    /// Live sink while attached. Exactly one per session, never reused.
    sink: Option<FrameSink>,
    ping_count: u64,
    created_at: Instant,
    /// Last client-driven activity. Server-side enqueues (keepalive pings,
    /// bus fanout) never refresh this; only lookups, attaches, detaches,
    /// and routed inbound messages do, so an abandoned session still ages
    /// out while pings keep flowing into its buffer.
    last_activity: Instant,
}

impl SessionInner {
    fn touch(&mut self) {
        self.last_activity = Instant::now();
    }

    /// Deliver a frame: straight to the live sink when attached, otherwise
    /// into the buffer. A failed sink write means the consumer is gone;
    /// that is an implicit detach, never an error for the producer.
    fn deliver(&mut self, frame: Frame) {
        if let Some(sink) = &self.sink {
            match sink.send(frame) {
                Ok(()) => return,
                Err(mpsc::error::SendError(frame)) => {
                    debug!("[Session] Sink gone, detaching and buffering");
                    self.sink = None;
                    self.state = SessionState::Detached;
                    if self.buffer.push(frame).is_some() {
                        debug!("[Session] Buffer full, dropped oldest frame");
                    }
                    return;
                }
            }
        }
        if self.buffer.push(frame).is_some() {
            debug!("[Session] Buffer full, dropped oldest frame");
        }
    }
}

/// Shared handle to one session. Cheap to clone.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    id: SessionId,
    inner: Arc<Mutex<SessionInner>>,
}

impl SessionHandle {
    fn new(id: SessionId, buffer_capacity: usize) -> Self {
        let now = Instant::now();
        Self {
            id,
            inner: Arc::new(Mutex::new(SessionInner {
                state: SessionState::Pending,
                buffer: FrameBuffer::new(buffer_capacity),
                sink: None,
                ping_count: 0,
                created_at: now,
                last_activity: now,
            })),
        }
    }

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    pub fn state(&self) -> SessionState {
        self.inner.lock().state
    }

    /// Number of frames currently buffered (zero while attached, normally).
    pub fn buffered(&self) -> usize {
        self.inner.lock().buffer.len()
    }

    pub fn age(&self) -> Duration {
        self.inner.lock().created_at.elapsed()
    }

    pub(crate) fn touch(&self) {
        self.inner.lock().touch();
    }

    /// Enqueue a frame for this session (live delivery or buffered).
    pub fn enqueue(&self, frame: Frame) {
        self.inner.lock().deliver(frame);
    }

    /// Enqueue a liveness ping with the next per-session sequence number.
    pub fn enqueue_ping(&self) {
        let mut inner = self.inner.lock();
        inner.ping_count += 1;
        let frame = Frame::ping(inner.ping_count);
        inner.deliver(frame);
    }

    /// Atomically bind a fresh sink: greeting frame first, then the
    /// buffered backlog in FIFO order, then the state flip to `Attached`.
    ///
    /// Everything happens under the session lock, so a concurrent enqueue
    /// either lands in the buffer before the drain or goes straight to the
    /// sink after it; no frame is lost or duplicated across the boundary.
    pub(crate) fn attach_sink(&self) -> Result<mpsc::UnboundedReceiver<Frame>, StreamError> {
        let mut inner = self.inner.lock();
        if inner.state == SessionState::Attached {
            return Err(StreamError::AlreadyAttached(self.id.clone()));
        }

        let (tx, rx) = mpsc::unbounded_channel();
        // The receiver is alive for the whole scope, so these cannot fail.
        let _ = tx.send(Frame::connection(self.id.clone()));
        for frame in inner.buffer.drain_all() {
            let _ = tx.send(frame);
        }
        inner.sink = Some(tx);
        inner.state = SessionState::Attached;
        inner.touch();
        Ok(rx)
    }

    /// Release the live sink, if any. Idempotent; the session and its
    /// buffer survive and keep accumulating for the next attach.
    pub fn detach(&self) {
        let mut inner = self.inner.lock();
        if inner.sink.take().is_some() || inner.state == SessionState::Attached {
            inner.state = SessionState::Detached;
            inner.touch();
            debug!(session = %self.id, "[Session] Detached");
        }
    }

    fn expired(&self, ttl: Duration) -> bool {
        let inner = self.inner.lock();
        inner.state != SessionState::Attached && inner.last_activity.elapsed() > ttl
    }
}

/// Mapping from connection identity to session state.
pub struct SessionRegistry {
    sessions: DashMap<SessionId, SessionHandle>,
    buffer_capacity: usize,
}

impl SessionRegistry {
    pub fn new(buffer_capacity: usize) -> Self {
        Self {
            sessions: DashMap::new(),
            buffer_capacity,
        }
    }

    /// Look up a session by id, creating it when needed.
    ///
    /// A known id reuses the existing session (resumption token); an
    /// unknown id creates a session under that id; no id mints a fresh
    /// unique one. All three paths update `last_activity`.
    pub fn get_or_create(&self, id: Option<SessionId>) -> SessionHandle {
        let id = id.unwrap_or_else(SessionId::generate);
        let handle = self
            .sessions
            .entry(id.clone())
            .or_insert_with(|| {
                info!(session = %id, "[Registry] Session created");
                SessionHandle::new(id.clone(), self.buffer_capacity)
            })
            .clone();
        handle.touch();
        handle
    }

    pub fn get(&self, id: &SessionId) -> Option<SessionHandle> {
        self.sessions.get(id).map(|entry| entry.clone())
    }

    /// Delete a session and its buffer.
    pub fn remove(&self, id: &SessionId) -> bool {
        let removed = self.sessions.remove(id).is_some();
        if removed {
            info!(session = %id, "[Registry] Session removed");
        }
        removed
    }

    /// Snapshot of known session ids. Producers iterate this instead of
    /// holding any registry lock across a sweep.
    pub fn session_ids(&self) -> Vec<SessionId> {
        self.sessions.iter().map(|entry| entry.key().clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Drop detached sessions idle for longer than `ttl`.
    ///
    /// Attached sessions are never swept; detaching only releases the
    /// sink, expiry is what destroys the session.
    pub fn sweep_expired(&self, ttl: Duration) -> usize {
        let before = self.sessions.len();
        self.sessions.retain(|_, handle| !handle.expired(ttl));
        let swept = before - self.sessions.len();
        if swept > 0 {
            info!(swept, "[Registry] Expired sessions removed");
        }
        swept
    }
}

/// Periodic expiry sweep over the registry.
///
/// Owned by the server lifecycle; without teardown the timer would keep
/// the process alive.
pub struct ExpirySweeper {
    token: CancellationToken,
}

impl ExpirySweeper {
    pub fn start(registry: Arc<SessionRegistry>, ttl: Duration, period: Duration) -> Self {
        let token = CancellationToken::new();
        let task_token = token.clone();

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            loop {
                tokio::select! {
                    _ = task_token.cancelled() => {
                        debug!("[Sweeper] Stopped");
                        break;
                    }
                    _ = interval.tick() => {
                        registry.sweep_expired(ttl);
                    }
                }
            }
        });

        Self { token }
    }

    /// Stop the sweep task. Idempotent.
    pub fn shutdown(&self) {
        self.token.cancel();
    }
}
