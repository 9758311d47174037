//! Connection-scoped streaming session manager.
//!
//! Components, leaves first:
//! - `buffer` - per-session bounded FIFO of pending outbound frames
//! - `registry` - session identity map plus the expiry sweeper
//! - `adapter` - binds a live SSE sink to a session (drain, forward, detach)
//! - `keepalive` - periodic ping producer over all known sessions
//! - `router` - out-of-band inbound messages into session buffers

mod adapter;
mod buffer;
mod keepalive;
mod registry;
mod router;

pub use adapter::{Attachment, StreamAdapter};
pub use buffer::FrameBuffer;
pub use keepalive::PingScheduler;
pub use registry::{ExpirySweeper, SessionHandle, SessionRegistry};
pub use router::InboundRouter;

/// Default bound on buffered frames per session.
pub const DEFAULT_BUFFER_CAPACITY: usize = 100;
