//! Port for durable chat exchange records.
//!
//! Defines the [`ChatLog`] trait for recording completed exchanges
//! (user message + assistant reply) to an external transcript store.
//!
//! This is separate from `tracing`-based operation logs: tracing handles
//! human-readable diagnostics, while this port captures the exchange in a
//! machine-readable form the rest of the application can persist.

use chrono::{DateTime, Utc};

/// A completed exchange ready to be persisted.
pub struct ChatRecord {
    pub user_id: String,
    pub message: String,
    pub response: String,
    pub timestamp: DateTime<Utc>,
}

impl ChatRecord {
    /// Create a record stamped with the current UTC time.
    pub fn new(
        user_id: impl Into<String>,
        message: impl Into<String>,
        response: impl Into<String>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            message: message.into(),
            response: response.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Port for saving chat records.
///
/// `save` is intentionally synchronous and non-fallible: persistence
/// problems must never break the conversation flow, so implementations
/// swallow their own errors.
pub trait ChatLog: Send + Sync {
    /// Persist one exchange.
    fn save(&self, record: ChatRecord);
}

/// No-op implementation for tests and when transcript persistence is
/// disabled.
pub struct NoChatLog;

impl ChatLog for NoChatLog {
    fn save(&self, _record: ChatRecord) {}
}
