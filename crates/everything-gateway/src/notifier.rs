//! Bus consumer: relays server-initiated messages to streaming sessions.
//!
//! The capability layer emits notifications (resource updates, log
//! messages, sampling requests) on the notification bus without knowing
//! who is connected. This consumer fans each message out to every known
//! session as a response frame. A session with a dead consumer just
//! buffers; per-session trouble never aborts the sweep over the others.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

use everything_core::{Frame, NotificationReceiver};

use crate::stream::SessionRegistry;

/// Forwards bus messages to all sessions until shut down.
pub struct BusForwarder {
    token: CancellationToken,
}

impl BusForwarder {
    pub fn start(registry: Arc<SessionRegistry>, mut receiver: NotificationReceiver) -> Self {
        let token = CancellationToken::new();
        let task_token = token.clone();

        tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = task_token.cancelled() => {
                        debug!("[Notifier] Stopped");
                        break;
                    }
                    message = receiver.recv() => {
                        let Some(message) = message else {
                            debug!("[Notifier] Bus closed");
                            break;
                        };
                        let ids = registry.session_ids();
                        trace!(sessions = ids.len(), "[Notifier] Fanning out message");
                        for id in ids {
                            if let Some(session) = registry.get(&id) {
                                session.enqueue(Frame::response(message.clone()));
                            }
                        }
                    }
                }
            }
        });

        Self { token }
    }

    /// Stop forwarding. Idempotent.
    pub fn shutdown(&self) {
        self.token.cancel();
    }
}
