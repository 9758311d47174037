//! Everything Gateway
//!
//! HTTP server exposing the Everything demo capabilities over:
//! - a direct JSON-RPC request/response endpoint (`POST /mcp`)
//! - an SSE streaming transport with out-of-band message delivery
//!   (`GET /sse` + `POST /message`)
//!
//! The streaming side is the load-bearing part: a connection-scoped session
//! manager that buffers frames while no stream is attached, replays them in
//! FIFO order on attach, and garbage-collects abandoned sessions.

pub mod notifier;
pub mod server;
pub mod stream;

pub use notifier::BusForwarder;
pub use server::{AppState, GatewayConfig, GatewayServer, CONNECTION_ID_HEADER};
pub use stream::{
    Attachment, FrameBuffer, InboundRouter, PingScheduler, SessionHandle, SessionRegistry,
    StreamAdapter,
};
