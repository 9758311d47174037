//! Streaming transport error taxonomy.

use crate::domain::SessionId;

/// Errors produced by the session manager and inbound router.
///
/// `SinkClosed` is recovered internally (implicit detach) and never reaches
/// producers; the other variants are user-visible and map onto HTTP status
/// codes at the gateway boundary.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StreamError {
    /// Inbound message addressed to a session that does not exist.
    #[error("unknown target session: {0}")]
    UnknownTarget(SessionId),

    /// A second concurrent stream attempted to attach to an attached session.
    #[error("session {0} already has a live stream attached")]
    AlreadyAttached(SessionId),

    /// Inbound body was not well-formed structured data.
    #[error("invalid payload: {0}")]
    InvalidPayload(String),

    /// The live sink's consumer is gone.
    #[error("sink closed: consumer disconnected")]
    SinkClosed,
}
