//! Audit log types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use galleria_core::Uid;

/// An action event, as emitted by the services.
///
/// Carries no timestamp: the audit store stamps the entry when it lands,
/// like every other backend-assigned field.
#[derive(Debug, Clone)]
pub struct AuditEvent {
    /// Acting account, when one is known.
    pub uid: Option<Uid>,
    /// Action name, e.g. `loginSuccess` or `createShop`.
    pub action: String,
    /// Free-form context for the log viewer.
    pub meta: serde_json::Value,
}

/// A stored audit log entry.
///
/// Append-only; read back only by the operational log viewer, newest first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    /// Acting account, when one was known.
    pub uid: Option<Uid>,
    /// Action name.
    pub action: String,
    /// Free-form context.
    pub meta: serde_json::Value,
    /// Store-assigned timestamp.
    pub ts: DateTime<Utc>,
}
