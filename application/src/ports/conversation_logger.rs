//! Port for structured transcript logging.
//!
//! Defines the [`ConversationLogger`] trait for recording oracle exchanges
//! and completed rounds to a machine-readable log (JSONL).
//!
//! This is separate from `tracing`-based operation logs: tracing carries
//! human-readable diagnostics, this port carries the full transcript.

use serde_json::Value;

/// A structured transcript event.
pub struct ConversationEvent {
    /// Event type identifier (`oracle_exchange`, `round_completed`, `session_completed`).
    pub event_type: &'static str,
    pub payload: Value,
}

impl ConversationEvent {
    pub fn new(event_type: &'static str, payload: Value) -> Self {
        Self {
            event_type,
            payload,
        }
    }
}

/// Port for logging transcript events.
///
/// `log` is synchronous and infallible; a failing sink must never disturb
/// the session.
pub trait ConversationLogger: Send + Sync {
    fn log(&self, event: ConversationEvent);
}

/// No-op implementation for tests and when logging is disabled.
pub struct NoConversationLogger;

impl ConversationLogger for NoConversationLogger {
    fn log(&self, _event: ConversationEvent) {}
}
