// SPDX-License-Identifier: MIT OR Apache-2.0

//! Logging macros.
//!
//! The macros are sugar over [`Logger::log_call`](crate::Logger::log_call). They
//! take the logger first, then an optional marker, then a `{}` template and its
//! arguments. Each argument is converted with [`Param::from`](crate::Param), but
//! only after the level gate has passed, so a disabled call costs one
//! `is_enabled` check:
//!
//! ```rust
//! use logshim::engine::{InMemorySink, LogEngine};
//! use logshim::{Cause, LoggerFactory, MarkerFactory};
//! use std::sync::Arc;
//!
//! let sink = Arc::new(InMemorySink::new());
//! let engine = LogEngine::new();
//! engine.set_sinks(vec![sink.clone()]);
//! let factory = LoggerFactory::new(Arc::new(engine));
//! let logger = factory.get_logger("app");
//! let markers = MarkerFactory::new();
//!
//! logshim::info!(logger, "served {} in {}ms", "/index", 12);
//! logshim::warn!(logger, marker: &markers.marker("SLOW"), "slow request");
//! logshim::error!(logger, "write to {} failed", "disk", Cause::new(std::io::Error::other("full")));
//! logshim::debug!(logger, "below the threshold: {}", 0);
//!
//! let records = sink.drain_records();
//! assert_eq!(records.len(), 3);
//! assert_eq!(records[0].message(), "served /index in 12ms");
//! assert_eq!(records[1].marker().unwrap().name(), "SLOW");
//! assert!(records[2].cause().is_some());
//! ```

/// Logs at a level chosen at runtime.
///
/// `log!(logger, level, "template {}", args...)`, or with a marker,
/// `log!(logger, level, marker: &marker, "template {}", args...)`.
#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr, marker: $marker:expr, $template:expr $(, $arg:expr)* $(,)?) => {{
        let logger = &$logger;
        let level: $crate::Level = $level;
        if logger.is_enabled(level) {
            let args: &[$crate::Param] = &[$($crate::Param::from($arg)),*];
            logger.log_call(
                level,
                $crate::translate::LogCall::new($template, args).marker(::std::option::Option::Some($marker)),
            );
        }
    }};
    ($logger:expr, $level:expr, $template:expr $(, $arg:expr)* $(,)?) => {{
        let logger = &$logger;
        let level: $crate::Level = $level;
        if logger.is_enabled(level) {
            let args: &[$crate::Param] = &[$($crate::Param::from($arg)),*];
            logger.log_call(level, $crate::translate::LogCall::new($template, args));
        }
    }};
}

/// Logs at `trace`. See [`log!`](crate::log!) for the argument forms.
#[macro_export]
macro_rules! trace {
    ($logger:expr, $($rest:tt)+) => {
        $crate::log!($logger, $crate::Level::Trace, $($rest)+)
    };
}

/// Logs at `debug`.
#[macro_export]
macro_rules! debug {
    ($logger:expr, $($rest:tt)+) => {
        $crate::log!($logger, $crate::Level::Debug, $($rest)+)
    };
}

/// Logs at `info`.
#[macro_export]
macro_rules! info {
    ($logger:expr, $($rest:tt)+) => {
        $crate::log!($logger, $crate::Level::Info, $($rest)+)
    };
}

/// Logs at `warn`.
#[macro_export]
macro_rules! warn {
    ($logger:expr, $($rest:tt)+) => {
        $crate::log!($logger, $crate::Level::Warn, $($rest)+)
    };
}

/// Logs at `error`.
#[macro_export]
macro_rules! error {
    ($logger:expr, $($rest:tt)+) => {
        $crate::log!($logger, $crate::Level::Error, $($rest)+)
    };
}

#[cfg(test)]
mod tests {
    use crate::engine::{InMemorySink, LogEngine};
    use crate::{FormatStyle, Level, LevelFilter, LoggerFactory, Marker};
    use std::cell::Cell;
    use std::sync::Arc;

    fn setup() -> (LoggerFactory, Arc<LogEngine>, Arc<InMemorySink>) {
        let sink = Arc::new(InMemorySink::new());
        let engine = Arc::new(LogEngine::new());
        engine.set_sinks(vec![sink.clone()]);
        engine.set_level("", LevelFilter::Trace);
        (LoggerFactory::new(engine.clone()), engine, sink)
    }

    #[test]
    fn test_level_macros() {
        let (factory, _engine, sink) = setup();
        let logger = factory.get_logger("macros");
        trace!(logger, "t");
        debug!(logger, "d {}", 1);
        info!(logger, "i {} {}", "a", 'b');
        warn!(logger, "w {}", true,);
        error!(logger, "e {}", 2.5);
        let messages: Vec<String> = sink
            .drain_records()
            .iter()
            .map(|r| format!("{} {}", r.level(), r.message()))
            .collect();
        assert_eq!(messages, ["TRACE t", "DEBUG d 1", "INFO i a b", "WARN w true", "ERROR e 2.5"]);
    }

    #[test]
    fn test_runtime_level_and_marker() {
        let (factory, _engine, sink) = setup();
        let logger = factory.get_logger("macros");
        let marker = Marker::new("M");
        log!(logger, Level::Warn, marker: &marker, "marked");
        let record = sink.poll().unwrap();
        assert_eq!(record.level(), Level::Warn);
        assert!(record.marker().unwrap().ptr_eq(&marker));
        assert_eq!(record.format_style(), FormatStyle::NoFormat);
    }

    #[test]
    fn test_args_not_evaluated_when_disabled() {
        let (factory, engine, sink) = setup();
        engine.set_level("quiet", LevelFilter::Error);
        let logger = factory.get_logger("quiet");
        let evaluated = Cell::new(0);
        let touch = || {
            evaluated.set(evaluated.get() + 1);
            "x"
        };
        info!(logger, "value {}", touch());
        assert_eq!(evaluated.get(), 0);
        error!(logger, "value {}", touch());
        assert_eq!(evaluated.get(), 1);
        assert_eq!(sink.len(), 1);
    }

    #[test]
    fn test_location_points_at_macro_call() {
        let (factory, _engine, sink) = setup();
        let logger = factory.get_logger("macros");
        info!(logger, "where");
        let location = sink.poll().unwrap().location().unwrap();
        assert!(location.file.ends_with("macros.rs"), "{location}");
    }
}
