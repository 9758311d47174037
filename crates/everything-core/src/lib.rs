//! # Everything Core Library
//!
//! Domain types shared by the Everything demo server crates.
//!
//! ## Modules
//!
//! - `domain` - Core entities (SessionId, SessionState, Frame)
//! - `cursor` - Opaque pagination cursor codec
//! - `error` - Streaming error taxonomy
//! - `bus` - Notification distribution channel (server -> transports)

pub mod bus;
pub mod cursor;
pub mod domain;
pub mod error;

// Re-export commonly used types
pub use bus::{NotificationBus, NotificationReceiver, NotificationSender};
pub use domain::{Frame, SessionId, SessionState};
pub use error::StreamError;
