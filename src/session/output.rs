//! Output Buffer
//!
//! Append-only line buffer shared by the two stream readers of a session and
//! the single consumer that reads and clears it. Every operation takes the
//! same lock, so a read-and-clear never loses an append and never hands the
//! same line out twice.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Instant;

use crate::platform::Platform;

/// Marker prepended to lines arriving on the diagnostic stream
pub const ERROR_MARKER: &str = "ERROR: ";

/// Which child stream a line came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamKind {
    /// Standard output
    Output,
    /// Standard error
    Error,
}

#[derive(Debug, Default)]
struct BufferState {
    lines: Vec<String>,
    last_append: Option<Instant>,
    appended: u64,
}

/// Thread-safe, append-only text buffer with atomic read-and-clear
#[derive(Debug, Clone, Default)]
pub struct OutputBuffer {
    inner: Arc<Mutex<BufferState>>,
}

impl OutputBuffer {
    /// Create an empty buffer
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, BufferState> {
        // A reader task that panicked mid-append leaves complete lines behind
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Append one complete line from the given stream
    pub fn append(&self, stream: StreamKind, line: &str) {
        let line = match stream {
            StreamKind::Output => line.to_string(),
            StreamKind::Error => format!("{}{}", ERROR_MARKER, line),
        };

        let mut state = self.lock();
        state.lines.push(line);
        state.last_append = Some(Instant::now());
        state.appended += 1;
    }

    /// Atomically take every buffered line, leaving the buffer empty
    pub fn take_lines(&self) -> Vec<String> {
        std::mem::take(&mut self.lock().lines)
    }

    /// Atomically take the buffered text, each line followed by the host terminator
    pub fn take_text(&self) -> String {
        let lines = self.take_lines();
        let terminator = Platform::line_terminator();
        let mut text = String::with_capacity(lines.iter().map(|l| l.len() + 2).sum());
        for line in lines {
            text.push_str(&line);
            text.push_str(terminator);
        }
        text
    }

    /// Number of lines currently buffered
    pub fn len(&self) -> usize {
        self.lock().lines.len()
    }

    /// Whether nothing is buffered
    pub fn is_empty(&self) -> bool {
        self.lock().lines.is_empty()
    }

    /// When the most recent line arrived
    pub fn last_activity(&self) -> Option<Instant> {
        self.lock().last_append
    }

    /// Total lines appended over the buffer's life, including cleared ones
    pub fn appended_total(&self) -> u64 {
        self.lock().appended
    }

    /// Drop everything buffered without returning it
    pub fn clear(&self) {
        self.lock().lines.clear();
    }
}
