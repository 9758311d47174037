//! Periodic liveness pings into every known session.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

use super::registry::SessionRegistry;

/// Cancellable recurring task that enqueues a ping frame into each
/// session's delivery path on a fixed period.
///
/// Each sweep iterates a snapshot of session ids, so no registry lock is
/// held while sessions are pinged and a concurrent attach/detach is never
/// blocked. A dead consumer on one session never affects the rest: the
/// enqueue path recovers it as an implicit detach.
pub struct PingScheduler {
    token: CancellationToken,
}

impl PingScheduler {
    pub fn start(registry: Arc<SessionRegistry>, period: Duration) -> Self {
        let token = CancellationToken::new();
        let task_token = token.clone();

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            // The first tick fires immediately; skip it so sessions get
            // their first ping one full period after startup.
            interval.tick().await;
            loop {
                tokio::select! {
                    _ = task_token.cancelled() => {
                        debug!("[Keepalive] Scheduler stopped");
                        break;
                    }
                    _ = interval.tick() => {
                        let ids = registry.session_ids();
                        trace!(sessions = ids.len(), "[Keepalive] Ping sweep");
                        for id in ids {
                            if let Some(session) = registry.get(&id) {
                                session.enqueue_ping();
                            }
                        }
                    }
                }
            }
        });

        Self { token }
    }

    /// Stop the scheduler. Safe to call any number of times.
    pub fn shutdown(&self) {
        self.token.cancel();
    }
}
