//! In-memory sink for testing.

use crate::application::ports::Sink;
use std::io;
use std::sync::{Arc, Mutex};

/// Sink that keeps every written line in memory.
///
/// Clones share the same buffer.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    lines: Arc<Mutex<Vec<String>>>,
}

impl MemorySink {
    /// Create an empty memory sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get all lines written so far.
    pub fn lines(&self) -> Vec<String> {
        self.lines
            .lock()
            .expect("MemorySink mutex poisoned - a test thread panicked while holding the lock")
            .clone()
    }

    /// Clear all captured lines.
    pub fn clear(&self) {
        self.lines
            .lock()
            .expect("MemorySink mutex poisoned - a test thread panicked while holding the lock")
            .clear();
    }
}

impl Sink for MemorySink {
    fn write(&self, buf: &[u8]) -> io::Result<()> {
        self.lines
            .lock()
            .expect("MemorySink mutex poisoned - a test thread panicked while holding the lock")
            .push(String::from_utf8_lossy(buf).into_owned());
        Ok(())
    }
}
