// SPDX-License-Identifier: MIT OR Apache-2.0

//! # In-Memory Sink
//!
//! A [`Sink`] that keeps every published record in a queue instead of writing it
//! anywhere. It exists for tests and for environments where stderr is not
//! visible: install it on a [`LogEngine`](super::LogEngine), run the code under
//! test, then inspect the records with [`poll`](InMemorySink::poll) or
//! [`drain_records`](InMemorySink::drain_records).
//!
//! Records are kept whole, so a test can check the resolved message, the
//! parameters, the cause and the marker, not just the rendered text.
//!
//! ```rust
//! use logshim::engine::{InMemorySink, LogEngine};
//! use logshim::LoggerFactory;
//! use std::sync::Arc;
//!
//! let sink = Arc::new(InMemorySink::new());
//! let engine = LogEngine::new();
//! engine.set_sinks(vec![sink.clone()]);
//! let factory = LoggerFactory::new(Arc::new(engine));
//!
//! factory.get_logger("app").info("started");
//!
//! let record = sink.poll().unwrap();
//! assert_eq!(record.message(), "started");
//! assert!(sink.is_empty());
//! ```

use super::Sink;
use crate::log_record::LogRecord;
use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Stores published records in FIFO order.
///
/// Thread-safe; share it with `Arc`.
#[derive(Debug, Default)]
pub struct InMemorySink {
    records: Mutex<VecDeque<LogRecord>>,
}

// ============================================================================
// BOILERPLATE TRAIT IMPLEMENTATIONS
// ============================================================================
//
// - Debug: derived, required by Sink
// - Default: empty queue
// - Clone: NOT implemented; a clone would silently split captured output
// - PartialEq/Eq/Hash: NOT implemented; no useful notion of equal sinks

impl InMemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    // A panic while holding the lock leaves the queue intact, so keep using it.
    fn records(&self) -> MutexGuard<'_, VecDeque<LogRecord>> {
        self.records.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Removes and returns the oldest record.
    pub fn poll(&self) -> Option<LogRecord> {
        self.records().pop_front()
    }

    /// Removes and returns every record, oldest first.
    pub fn drain_records(&self) -> Vec<LogRecord> {
        self.records().drain(..).collect()
    }

    /// Drains all records rendered one per line, clearing the buffer.
    pub fn drain_logs(&self) -> String {
        self.drain_records()
            .iter()
            .map(super::render_line)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Writes all records to the console and clears the buffer.
    ///
    /// - On native platforms: `eprintln!`
    /// - On wasm32: `console.log`
    pub fn drain_to_console(&self) {
        for record in self.drain_records() {
            let line = super::render_line(&record);
            #[cfg(target_arch = "wasm32")]
            web_sys::console::log_1(&line.into());
            #[cfg(not(target_arch = "wasm32"))]
            eprintln!("{}", line);
        }
    }

    pub fn len(&self) -> usize {
        self.records().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records().is_empty()
    }

    pub fn clear(&self) {
        self.records().clear();
    }
}

impl Sink for InMemorySink {
    fn finish_log_record(&self, record: LogRecord) {
        self.records().push_back(record);
    }

    fn prepare_to_die(&self) {
        // nothing buffered outside memory
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Level;

    #[test]
    fn test_fifo_order() {
        let sink = InMemorySink::new();
        sink.finish_log_record(LogRecord::new("a", Level::Info, "first"));
        sink.finish_log_record(LogRecord::new("a", Level::Info, "second"));
        assert_eq!(sink.len(), 2);
        assert_eq!(sink.poll().unwrap().message(), "first");
        assert_eq!(sink.poll().unwrap().message(), "second");
        assert!(sink.poll().is_none());
    }

    #[test]
    fn test_drain_logs() {
        let sink = InMemorySink::new();
        sink.finish_log_record(LogRecord::new("a", Level::Info, "First message"));
        sink.finish_log_record(LogRecord::new("a", Level::Warn, "Second message"));

        let logs = sink.drain_logs();
        assert!(logs.contains("First message"));
        assert!(logs.contains("Second message"));
        assert_eq!(logs.lines().count(), 2);

        assert_eq!(sink.drain_logs(), "");
    }

    #[test]
    fn test_clear() {
        let sink = InMemorySink::new();
        sink.finish_log_record(LogRecord::new("a", Level::Info, "x"));
        sink.clear();
        assert!(sink.is_empty());
    }
}
