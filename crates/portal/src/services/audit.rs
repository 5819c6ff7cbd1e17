//! Fire-and-forget audit logging.
//!
//! Callers hand events to a bounded channel and move on; a background task
//! drains the channel into the [`AuditStore`] gateway. Nothing here can fail
//! or block a caller: a full channel drops the event, a failing store write
//! is swallowed, and both are visible only on the tracing diagnostic channel.

use std::sync::Arc;

use tokio::sync::mpsc;

use galleria_core::Uid;

use crate::gateway::AuditStore;
use crate::models::audit::AuditEvent;

/// Capacity of the audit event channel.
const AUDIT_CHANNEL_CAPACITY: usize = 256;

/// Handle for recording audit events.
///
/// Cheap to clone; every clone feeds the same drain task.
#[derive(Clone)]
pub struct AuditLog {
    tx: mpsc::Sender<AuditEvent>,
}

impl AuditLog {
    /// Spawn the drain task and return the recording handle.
    #[must_use]
    pub fn spawn(store: Arc<dyn AuditStore>) -> Self {
        let (tx, rx) = mpsc::channel(AUDIT_CHANNEL_CAPACITY);
        tokio::spawn(drain(rx, store));
        Self { tx }
    }

    /// Record an action. Never blocks and never fails the caller.
    pub fn record(&self, uid: Option<Uid>, action: &str, meta: serde_json::Value) {
        let event = AuditEvent {
            uid,
            action: action.to_owned(),
            meta,
        };

        if let Err(err) = self.tx.try_send(event) {
            tracing::debug!(action, error = %err, "audit event dropped");
        }
    }
}

/// Drain events into the store until every sender is gone.
async fn drain(mut rx: mpsc::Receiver<AuditEvent>, store: Arc<dyn AuditStore>) {
    while let Some(event) = rx.recv().await {
        if let Err(err) = store.record(event).await {
            tracing::warn!(error = %err, "audit write failed");
        }
    }
}
