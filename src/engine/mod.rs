// SPDX-License-Identifier: MIT OR Apache-2.0

//! The boundary between the facade and the logging engine behind it.
//!
//! The facade never filters, formats for output, or writes anything. It asks the
//! engine three kinds of question, one trait each:
//!
//! - [`Engine`]: create or fetch the engine logger for a name, and expose the
//!   engine's diagnostic-context store.
//! - [`EngineLogger`]: is a level enabled for this logger, and publish a record.
//! - [`ContextStore`]: the per-thread key/value map records are stamped with.
//!
//! Any backend that implements these can sit behind a
//! [`LoggerFactory`](crate::LoggerFactory). The crate ships [`LogEngine`], a small
//! reference engine with hierarchical level thresholds and pluggable [`Sink`]s.

mod context_store;
mod inmemory_sink;
mod log_engine;
mod stderror_sink;

pub use context_store::ThreadLocalContextStore;
pub use inmemory_sink::InMemorySink;
pub use log_engine::LogEngine;
pub use stderror_sink::StdErrorSink;

use crate::log_record::LogRecord;
use crate::{Level, LevelFilter};
use std::collections::BTreeMap;
use std::fmt::Debug;
use std::sync::Arc;

pub trait Engine: Debug + Send + Sync {
    /// Returns the engine logger for `name`, creating it if needed.
    ///
    /// Repeated calls with the same name should return the same logger. The
    /// factory calls this without holding its own locks, so an implementation may
    /// log through the facade here, and racing lookups may call it more than once
    /// for one name.
    fn logger(&self, name: &str) -> Arc<dyn EngineLogger>;

    /// The engine's native diagnostic-context store.
    fn context(&self) -> &dyn ContextStore;

    /**
    The application may imminently exit.  Ensure all buffers are flushed and up to date.
    */
    fn prepare_to_die(&self);

    /// The most verbose threshold any logger has. Used to pre-filter at call sites
    /// that support it, such as the `log` crate's max level.
    fn max_level(&self) -> LevelFilter {
        LevelFilter::Trace
    }
}

pub trait EngineLogger: Debug + Send + Sync {
    fn name(&self) -> &str;

    fn is_enabled(&self, level: Level) -> bool;

    /// Delivers the record. Filtering, formatting and I/O failures are the
    /// engine's business; the caller does not learn about them.
    fn publish(&self, record: LogRecord);
}

/// A per-thread string map owned by the engine.
///
/// Values are strings only; wider types are narrowed by [`Mdc`](crate::Mdc)
/// before they reach the store.
pub trait ContextStore: Debug + Send + Sync {
    /// Returns the previous value.
    fn put(&self, key: &str, value: String) -> Option<String>;
    fn get(&self, key: &str) -> Option<String>;
    fn remove(&self, key: &str) -> Option<String>;
    fn clear(&self);
    /// A copy of the calling thread's map.
    fn snapshot(&self) -> BTreeMap<String, String>;
    /// Replaces the calling thread's map.
    fn replace(&self, map: BTreeMap<String, String>);
}

/// An output for records published through [`LogEngine`].
pub trait Sink: Debug + Send + Sync {
    /**
        Submits the log record for output.
    */
    fn finish_log_record(&self, record: LogRecord);

    /**
    The application may imminently exit.  Ensure all buffers are flushed and up to date.
    */
    fn prepare_to_die(&self);
}

/// One line of text for `record`:
/// `<millis> <LEVEL> [<thread>] <logger> <marker> - <message> {k=v, ...}: <cause>`.
pub fn render_line(record: &LogRecord) -> String {
    use std::fmt::Write;
    let mut line = String::with_capacity(record.message().len() + 64);
    let _ = write!(
        line,
        "{} {:<5} [{}] {}",
        crate::sys::millis_since_epoch(record.timestamp()),
        record.level(),
        record.thread_name().unwrap_or("-"),
        record.logger_name(),
    );
    if let Some(marker) = record.marker() {
        let _ = write!(line, " {marker}");
    }
    line.push_str(" - ");
    line.push_str(record.message());
    if !record.context().is_empty() {
        line.push_str(" {");
        for (i, (k, v)) in record.context().iter().enumerate() {
            if i > 0 {
                line.push_str(", ");
            }
            let _ = write!(line, "{k}={v}");
        }
        line.push('}');
    }
    if let Some(cause) = record.cause() {
        let _ = write!(line, ": {}", cause.chain_message());
    }
    line
}
