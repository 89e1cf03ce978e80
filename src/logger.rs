// SPDX-License-Identifier: MIT OR Apache-2.0

//! The facade logger.
//!
//! A [`Logger`] is a name bound to exactly one engine logger. Every way of logging
//! through it, the per-level methods, the generic [`log`](Logger::log) and the
//! macros, ends up in [`Logger::log_call`], which asks the engine whether the
//! level is enabled and, only if it is, translates the call and publishes one
//! record.
//!
//! ```rust
//! use logshim::engine::{InMemorySink, LogEngine};
//! use logshim::{Cause, LoggerFactory, Param};
//! use std::sync::Arc;
//!
//! let sink = Arc::new(InMemorySink::new());
//! let engine = LogEngine::new();
//! engine.set_sinks(vec![sink.clone()]);
//! let factory = LoggerFactory::new(Arc::new(engine));
//! let logger = factory.get_logger("app::db");
//!
//! let err = Cause::new(std::io::Error::other("refused"));
//! logger.warn_with("connect to {} failed", &[Param::from("db-1"), Param::from(err)]);
//!
//! let record = sink.poll().unwrap();
//! assert_eq!(record.message(), "connect to db-1 failed");
//! assert!(record.cause().is_some());
//! ```

use crate::Level;
use crate::engine::EngineLogger;
use crate::log_record::Location;
use crate::marker::Marker;
use crate::param::{Cause, Param};
use crate::translate::{LogCall, translate};
use std::sync::Arc;

/// A named facade logger.
///
/// Obtained from [`LoggerFactory::get_logger`](crate::LoggerFactory::get_logger),
/// which hands out the same `Arc<Logger>` for the same name.
#[derive(Debug)]
pub struct Logger {
    name: String,
    engine_logger: Arc<dyn EngineLogger>,
}

/*
Boilerplate notes.

Clone: no, share the Arc the factory hands out.
PartialEq/Eq/Hash: a logger's identity is its Arc, compare those with Arc::ptr_eq.
Default: there is no engine to bind to.
Display: the name would be the obvious candidate, but name() is clearer at call sites.
*/

macro_rules! level_methods {
    ($($level:ident => $plain:ident, $cause:ident, $with:ident, $marked:ident, $marked_cause:ident, $enabled:ident;)*) => {
        $(
            #[doc = concat!("Logs `msg` verbatim at `", stringify!($plain), "`.")]
            #[track_caller]
            pub fn $plain(&self, msg: &str) {
                self.log_call(Level::$level, LogCall::new(msg, &[]));
            }

            #[doc = concat!("Logs `msg` verbatim at `", stringify!($plain), "` with an explicit cause.")]
            #[track_caller]
            pub fn $cause(&self, msg: &str, cause: Cause) {
                self.log_call(Level::$level, LogCall::new(msg, &[]).cause(Some(cause)));
            }

            #[doc = concat!("Logs a `{}` template at `", stringify!($plain), "`. A trailing [`Cause`] beyond the placeholders becomes the record's cause.")]
            #[track_caller]
            pub fn $with(&self, template: &str, args: &[Param]) {
                self.log_call(Level::$level, LogCall::new(template, args));
            }

            #[track_caller]
            pub fn $marked(&self, marker: &Marker, template: &str, args: &[Param]) {
                self.log_call(Level::$level, LogCall::new(template, args).marker(Some(marker)));
            }

            #[track_caller]
            pub fn $marked_cause(&self, marker: &Marker, msg: &str, cause: Cause) {
                self.log_call(
                    Level::$level,
                    LogCall::new(msg, &[]).marker(Some(marker)).cause(Some(cause)),
                );
            }

            pub fn $enabled(&self) -> bool {
                self.is_enabled(Level::$level)
            }
        )*
    };
}

impl Logger {
    pub(crate) fn new(name: String, engine_logger: Arc<dyn EngineLogger>) -> Self {
        Logger {
            name,
            engine_logger,
        }
    }

    /// The logger's name. The root logger's name is empty.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The engine logger every call is published through.
    pub fn engine_logger(&self) -> &Arc<dyn EngineLogger> {
        &self.engine_logger
    }

    pub fn is_enabled(&self, level: Level) -> bool {
        self.engine_logger.is_enabled(level)
    }

    /// Markers do not take part in filtering, so this answers the same as
    /// [`is_enabled`](Logger::is_enabled).
    pub fn is_enabled_marked(&self, level: Level, _marker: &Marker) -> bool {
        self.is_enabled(level)
    }

    /// The single entry point behind every other logging method and macro.
    ///
    /// Does nothing when `level` is disabled. Otherwise publishes exactly one
    /// record. A call without a location gets the caller's.
    #[track_caller]
    pub fn log_call(&self, level: Level, call: LogCall<'_>) {
        if !self.engine_logger.is_enabled(level) {
            return;
        }
        let call = match call.location {
            Some(_) => call,
            None => call.location(Location::caller()),
        };
        self.engine_logger.publish(translate(&self.name, level, call));
    }

    #[track_caller]
    pub fn log(&self, level: Level, marker: Option<&Marker>, template: &str, args: &[Param]) {
        self.log_call(level, LogCall::new(template, args).marker(marker));
    }

    /// Logs `msg` verbatim with an explicit cause. No trailing-cause rules apply.
    #[track_caller]
    pub fn log_cause(&self, level: Level, marker: Option<&Marker>, msg: &str, cause: Cause) {
        self.log_call(level, LogCall::new(msg, &[]).marker(marker).cause(Some(cause)));
    }

    level_methods! {
        Trace => trace, trace_cause, trace_with, trace_marked, trace_marked_cause, is_trace_enabled;
        Debug => debug, debug_cause, debug_with, debug_marked, debug_marked_cause, is_debug_enabled;
        Info => info, info_cause, info_with, info_marked, info_marked_cause, is_info_enabled;
        Warn => warn, warn_cause, warn_with, warn_marked, warn_marked_cause, is_warn_enabled;
        Error => error, error_cause, error_with, error_marked, error_marked_cause, is_error_enabled;
    }
}
