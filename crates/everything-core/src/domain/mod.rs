//! Core domain entities for the streaming transport.

mod frame;
mod session;

pub use frame::Frame;
pub use session::{SessionId, SessionState};
