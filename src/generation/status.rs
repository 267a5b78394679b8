//! Human-readable per-task status lines.
//!
//! Concurrent tasks report through a shared [`StatusSink`]. Each call writes
//! one whole line under a lock, so lines from different tasks never mix.

use std::io::Write;
use std::sync::{Mutex, PoisonError};

pub trait StatusSink: Send + Sync {
    fn line(&self, line: &str);
}

/// Writes to stdout.
#[derive(Debug, Default)]
pub struct ConsoleSink {
    lock: Mutex<()>,
}

impl ConsoleSink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StatusSink for ConsoleSink {
    fn line(&self, line: &str) {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        let stdout = std::io::stdout();
        let mut handle = stdout.lock();
        let _ = writeln!(handle, "{}", line);
        let _ = handle.flush();
    }
}

/// Discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl StatusSink for NullSink {
    fn line(&self, _line: &str) {}
}
