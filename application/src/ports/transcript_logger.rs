//! Port for structured session transcript logging.
//!
//! This is separate from `tracing`-based operation logs: tracing
//! handles human-readable diagnostics, while this port captures the
//! session's lifecycle (questions, submissions, verdicts, completion)
//! in a machine-readable format (JSONL).

use serde_json::Value;

/// A structured transcript event.
pub struct TranscriptEvent {
    /// Event type identifier (e.g., "answer_submitted", "answer_judged").
    pub event_type: &'static str,
    /// JSON payload with event-specific data.
    pub payload: Value,
}

impl TranscriptEvent {
    pub fn new(event_type: &'static str, payload: Value) -> Self {
        Self {
            event_type,
            payload,
        }
    }
}

/// Port for recording transcript events.
///
/// The `log` method is intentionally synchronous and non-fallible so
/// logging can never disrupt the session flow — write failures are the
/// adapter's problem to swallow.
pub trait TranscriptLogger: Send + Sync {
    fn log(&self, event: TranscriptEvent);
}

/// No-op implementation for tests and when logging is disabled.
pub struct NoTranscriptLogger;

impl TranscriptLogger for NoTranscriptLogger {
    fn log(&self, _event: TranscriptEvent) {}
}
