//! Session identity and lifecycle state.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Opaque session identifier.
///
/// Server-generated via UUID v4 (cryptographically strong RNG), so two
/// concurrent mints can never collide in practice. Clients may present a
/// previously issued id as a resumption token; the registry decides whether
/// it maps to a live session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    /// Mint a fresh unique id.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for SessionId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for SessionId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Lifecycle state of a session.
///
/// A session starts `Pending` (created, never streamed), becomes `Attached`
/// while exactly one live sink is bound to it, and falls back to `Detached`
/// when that sink goes away. Only detached sessions are eligible for the
/// expiry sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Pending,
    Attached,
    Detached,
}
