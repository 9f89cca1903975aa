//! Event reporting seam shared by the use cases.

use std::sync::Mutex;

/// Receives one human-readable line per pipeline event.
///
/// Implementations must never fail the caller: an event that cannot be
/// recorded is dropped.
pub trait EventSink {
    fn record(&self, message: &str);
}

/// Keeps events in memory, for tests and callers that inspect the trail.
#[derive(Debug, Default)]
pub struct MemorySink {
    events: Mutex<Vec<String>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of all recorded events (oldest first).
    pub fn events(&self) -> Vec<String> {
        self.events.lock().expect("lock poisoned").clone()
    }
}

impl EventSink for MemorySink {
    fn record(&self, message: &str) {
        self.events
            .lock()
            .expect("lock poisoned")
            .push(message.to_string());
    }
}
