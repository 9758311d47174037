//! # Everything MCP Library
//!
//! MCP protocol implementation for the Everything demo server:
//! JSON-RPC message types, the method dispatch registry, and the demo
//! capability handlers (tools, resources, prompts, completion, logging,
//! sampling). Dispatch is a pure lookup-and-validate layer; all streaming
//! concerns live in the gateway crate.

pub mod completion;
pub mod error;
pub mod jsonrpc;
pub mod prompts;
pub mod registry;
pub mod resources;
pub mod sampling;
pub mod server;
pub mod tools;
pub mod types;

pub use error::McpError;
pub use jsonrpc::{JsonRpcError, JsonRpcRequest, JsonRpcResponse, RequestId};
pub use registry::HandlerRegistry;
pub use server::{EverythingServer, UpdateNotifier, RESOURCE_UPDATE_PERIOD};
pub use types::LoggingLevel;

/// Server name advertised during initialization.
pub const SERVER_NAME: &str = "example-servers/everything";

/// Protocol revision this server speaks.
pub const PROTOCOL_VERSION: &str = "2024-11-05";
