//! Player-facing notifications.
//!
//! The engine never talks to a UI. It appends toast-style messages to an
//! outbox that the presentation layer drains after each tick or command.

use serde::Serialize;

/// How long a regular toast stays up.
pub const DEFAULT_DURATION_MS: u32 = 4000;

/// How long an event announcement stays up.
pub const EVENT_DURATION_MS: u32 = 6000;

/// A toast message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub message: String,
    pub is_error: bool,
    pub duration_ms: u32,
}

/// Pending notifications, oldest first.
#[derive(Debug, Clone, Default)]
pub struct Outbox {
    pending: Vec<Notification>,
}

impl Outbox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.push(message.into(), false, DEFAULT_DURATION_MS);
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.push(message.into(), true, DEFAULT_DURATION_MS);
    }

    pub fn push(&mut self, message: String, is_error: bool, duration_ms: u32) {
        self.pending.push(Notification {
            message,
            is_error,
            duration_ms,
        });
    }

    /// Take everything queued so far.
    pub fn drain(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.pending)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drain_empties_outbox() {
        let mut outbox = Outbox::new();
        outbox.info("hello");
        outbox.error("oops");
        assert_eq!(outbox.len(), 2);

        let drained = outbox.drain();
        assert_eq!(drained.len(), 2);
        assert!(!drained[0].is_error);
        assert!(drained[1].is_error);
        assert_eq!(drained[1].duration_ms, DEFAULT_DURATION_MS);
        assert!(outbox.is_empty());
    }
}
