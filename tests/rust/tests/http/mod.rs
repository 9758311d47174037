//! HTTP transport integration tests
//!
//! Runs the full gateway on an ephemeral port and talks to it with a
//! real HTTP client, covering both the direct endpoint and the SSE
//! streaming transport.

mod endpoints;
mod streaming;
