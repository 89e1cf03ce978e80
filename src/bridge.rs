// SPDX-License-Identifier: MIT OR Apache-2.0

//! Routes the `log` crate through the facade.
//!
//! Libraries that log with `log::info!` and friends can share the application's
//! engine: install a [`LogBridge`] and every `log` record is published through the
//! facade logger named after the record's target.
//!
//! `log` formats its own messages, so bridged records arrive already rendered.
//! They are published verbatim as [`FormatStyle::NoFormat`](crate::FormatStyle)
//! with no parameters; a `{}` inside the rendered text is left alone.
//!
//! ```rust
//! use logshim::engine::{InMemorySink, LogEngine};
//! use logshim::{LogBridge, LoggerFactory};
//! use std::sync::Arc;
//!
//! let sink = Arc::new(InMemorySink::new());
//! let engine = LogEngine::new();
//! engine.set_sinks(vec![sink.clone()]);
//! let bridge = LogBridge::new(Arc::new(LoggerFactory::new(Arc::new(engine))));
//!
//! log::Log::log(
//!     &bridge,
//!     &log::Record::builder()
//!         .level(log::Level::Warn)
//!         .target("dep::io")
//!         .args(format_args!("retrying {}", 3))
//!         .build(),
//! );
//!
//! let record = sink.poll().unwrap();
//! assert_eq!(record.logger_name(), "dep::io");
//! assert_eq!(record.message(), "retrying 3");
//! ```

use crate::error::Error;
use crate::factory::LoggerFactory;
use crate::log_record::Location;
use crate::translate::LogCall;
use crate::{Level, LevelFilter};
use std::sync::Arc;

impl From<log::Level> for Level {
    fn from(level: log::Level) -> Self {
        match level {
            log::Level::Error => Level::Error,
            log::Level::Warn => Level::Warn,
            log::Level::Info => Level::Info,
            log::Level::Debug => Level::Debug,
            log::Level::Trace => Level::Trace,
        }
    }
}

impl From<LevelFilter> for log::LevelFilter {
    fn from(filter: LevelFilter) -> Self {
        match filter {
            LevelFilter::Trace => log::LevelFilter::Trace,
            LevelFilter::Debug => log::LevelFilter::Debug,
            LevelFilter::Info => log::LevelFilter::Info,
            LevelFilter::Warn => log::LevelFilter::Warn,
            LevelFilter::Error => log::LevelFilter::Error,
            LevelFilter::Off => log::LevelFilter::Off,
        }
    }
}

/// A `log::Log` implementation backed by a [`LoggerFactory`].
#[derive(Debug)]
pub struct LogBridge {
    factory: Arc<LoggerFactory>,
}

impl LogBridge {
    pub fn new(factory: Arc<LoggerFactory>) -> Self {
        LogBridge { factory }
    }

    pub fn factory(&self) -> &Arc<LoggerFactory> {
        &self.factory
    }

    /**
    Installs a bridge as the process-wide `log` logger.

    `log`'s max level is set from the engine's most verbose threshold at the time
    of the call.  Thresholds lowered afterwards are still honored by the engine, but
    `log` will have filtered the more verbose records before they arrive.

    # Errors

    [`Error::AlreadyInstalled`] if `log` already has a logger.
    */
    pub fn install(factory: Arc<LoggerFactory>) -> Result<(), Error> {
        let max_level = factory.engine().max_level();
        log::set_boxed_logger(Box::new(LogBridge::new(factory)))?;
        log::set_max_level(max_level.into());
        Ok(())
    }
}

impl log::Log for LogBridge {
    fn enabled(&self, metadata: &log::Metadata<'_>) -> bool {
        self.factory
            .get_logger(metadata.target())
            .is_enabled(metadata.level().into())
    }

    fn log(&self, record: &log::Record<'_>) {
        let level = Level::from(record.level());
        let logger = self.factory.get_logger(record.target());
        if !logger.is_enabled(level) {
            return;
        }
        let message = record.args().to_string();
        let location = Location {
            file: record.file_static().unwrap_or("<unknown>"),
            line: record.line().unwrap_or(0),
            column: 0,
        };
        logger.log_call(level, LogCall::new(&message, &[]).location(location));
    }

    fn flush(&self) {
        self.factory.engine().prepare_to_die();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FormatStyle;
    use crate::engine::{InMemorySink, LogEngine};
    use log::Log;

    fn bridge() -> (LogBridge, Arc<LogEngine>, Arc<InMemorySink>) {
        let sink = Arc::new(InMemorySink::new());
        let engine = Arc::new(LogEngine::new());
        engine.set_sinks(vec![sink.clone()]);
        let bridge = LogBridge::new(Arc::new(LoggerFactory::new(engine.clone())));
        (bridge, engine, sink)
    }

    #[test]
    fn test_level_mapping() {
        assert_eq!(Level::from(log::Level::Warn), Level::Warn);
        assert_eq!(Level::from(log::Level::Trace), Level::Trace);
        assert_eq!(log::LevelFilter::from(LevelFilter::Off), log::LevelFilter::Off);
        assert_eq!(log::LevelFilter::from(LevelFilter::Debug), log::LevelFilter::Debug);
    }

    #[test]
    fn test_enabled_follows_engine() {
        let (bridge, engine, _sink) = bridge();
        engine.set_level("dep", LevelFilter::Debug);
        fn metadata(level: log::Level, target: &str) -> log::Metadata<'_> {
            log::Metadata::builder().level(level).target(target).build()
        }
        assert!(bridge.enabled(&metadata(log::Level::Debug, "dep::net")));
        assert!(!bridge.enabled(&metadata(log::Level::Debug, "app")));
        assert!(bridge.enabled(&metadata(log::Level::Info, "app")));
    }

    #[test]
    fn test_rendered_message_is_verbatim() {
        let (bridge, _engine, sink) = bridge();
        bridge.log(
            &log::Record::builder()
                .level(log::Level::Error)
                .target("dep")
                .file_static(Some("dep/src/lib.rs"))
                .line(Some(12))
                .args(format_args!("literal {{}} and {}", 5))
                .build(),
        );
        let record = sink.poll().unwrap();
        assert_eq!(record.message(), "literal {} and 5");
        assert_eq!(record.format_style(), FormatStyle::NoFormat);
        assert!(record.parameters().is_none());
        let location = record.location().unwrap();
        assert_eq!((location.file, location.line), ("dep/src/lib.rs", 12));
    }

    #[test]
    fn test_disabled_records_dropped() {
        let (bridge, _engine, sink) = bridge();
        bridge.log(
            &log::Record::builder()
                .level(log::Level::Debug)
                .target("dep")
                .args(format_args!("quiet"))
                .build(),
        );
        assert!(sink.is_empty());
        bridge.flush();
    }
}
