//! Notification bus - distribution channel for server-initiated messages
//!
//! The capability layer (subscription updates, log messages, sampling
//! requests) produces JSON messages without knowing which transports are
//! listening; transport-side consumers subscribe and relay them to their
//! clients. Delivery is best-effort: a lagging consumer skips messages
//! rather than blocking producers.

use serde_json::Value;
use tokio::sync::broadcast;
use tracing::{debug, warn};

/// Default channel capacity for the notification bus
const DEFAULT_CAPACITY: usize = 256;

/// Central hub for server-initiated message distribution.
///
/// Backed by a broadcast channel so every consumer receives its own copy of
/// each message emitted after it subscribed.
#[derive(Clone)]
pub struct NotificationBus {
    sender: broadcast::Sender<Value>,
}

impl NotificationBus {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Get a sender for emitting messages.
    pub fn sender(&self) -> NotificationSender {
        NotificationSender {
            sender: self.sender.clone(),
        }
    }

    /// Subscribe to receive messages emitted after this call.
    pub fn subscribe(&self) -> NotificationReceiver {
        NotificationReceiver {
            receiver: self.sender.subscribe(),
        }
    }

    /// Number of active subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for NotificationBus {
    fn default() -> Self {
        Self::new()
    }
}

/// Producer handle. Cheaply cloneable and thread-safe.
#[derive(Clone)]
pub struct NotificationSender {
    sender: broadcast::Sender<Value>,
}

impl NotificationSender {
    /// Emit a message, returning the number of consumers that received it.
    ///
    /// Zero subscribers is not an error; the message is simply dropped.
    pub fn emit(&self, message: Value) -> usize {
        match self.sender.send(message) {
            Ok(count) => count,
            Err(_) => {
                debug!("[Bus] No receivers for message");
                0
            }
        }
    }
}

/// Consumer handle. Each receiver sees every message emitted after it
/// subscribed, minus anything skipped while lagging.
pub struct NotificationReceiver {
    receiver: broadcast::Receiver<Value>,
}

impl NotificationReceiver {
    /// Receive the next message, or `None` once the channel is closed.
    ///
    /// Lag is logged and skipped over rather than surfaced.
    pub async fn recv(&mut self) -> Option<Value> {
        loop {
            match self.receiver.recv().await {
                Ok(message) => return Some(message),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(skipped, "[Bus] Receiver lagged, messages skipped");
                }
                Err(broadcast::error::RecvError::Closed) => {
                    debug!("[Bus] Channel closed");
                    return None;
                }
            }
        }
    }

    /// Non-blocking receive.
    pub fn try_recv(&mut self) -> Option<Value> {
        match self.receiver.try_recv() {
            Ok(message) => Some(message),
            Err(broadcast::error::TryRecvError::Lagged(skipped)) => {
                warn!(skipped, "[Bus] Receiver lagged on try_recv");
                self.receiver.try_recv().ok()
            }
            Err(_) => None,
        }
    }
}
