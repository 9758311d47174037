//! Wire frames for the SSE streaming transport.
//!
//! Each frame serializes to a single-line JSON object tagged by `type` and
//! is emitted on the stream as `data: <json>\n\n`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::SessionId;

/// One discrete unit of the stream's wire format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Frame {
    /// Sent once at attach, before any buffered backlog.
    Connection {
        #[serde(rename = "connectionId")]
        connection_id: SessionId,
        message: String,
        timestamp: DateTime<Utc>,
    },
    /// Periodic liveness frame with a per-session monotonic counter.
    Ping {
        count: u64,
        timestamp: DateTime<Utc>,
    },
    /// An out-of-band inbound message relayed back to the stream.
    Response {
        data: Value,
        timestamp: DateTime<Utc>,
    },
}

impl Frame {
    pub fn connection(id: SessionId) -> Self {
        Frame::Connection {
            message: format!("Connected with ID {}", id),
            connection_id: id,
            timestamp: Utc::now(),
        }
    }

    pub fn ping(count: u64) -> Self {
        Frame::Ping {
            count,
            timestamp: Utc::now(),
        }
    }

    pub fn response(data: Value) -> Self {
        Frame::Response {
            data,
            timestamp: Utc::now(),
        }
    }

    /// Serialize to the single-line JSON payload carried in one SSE frame.
    pub fn to_wire(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }
}
