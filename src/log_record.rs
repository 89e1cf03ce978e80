// SPDX-License-Identifier: MIT OR Apache-2.0

//! The record handed to the engine.
//!
//! A [`LogRecord`] is the fully resolved form of one facade call: the substituted
//! message, the explicit parameter list, the cause, the marker and a
//! [`FormatStyle`] saying whether substitution happened at all. The engine fills
//! in the diagnostic-context snapshot when it publishes the record.
//!
//! # Parameters: `None` vs `Some(vec![])`
//!
//! `parameters()` is `None` when the call carried no arguments at all, which lets
//! a consumer tell a plain message from a templated call whose only argument was
//! extracted as the cause (`Some(vec![])`).
//!
//! ```rust
//! use logshim::{FormatStyle, Level, LogRecord};
//!
//! let record = LogRecord::new("app", Level::Info, "ready");
//! assert_eq!(record.message(), "ready");
//! assert_eq!(record.format_style(), FormatStyle::NoFormat);
//! assert!(record.parameters().is_none());
//! ```

use crate::Level;
use crate::marker::Marker;
use crate::param::{Cause, Param};
use crate::sys::SystemTime;
use std::collections::BTreeMap;
use std::fmt::Display;

/// Whether the record's message went through placeholder substitution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormatStyle {
    /// The template contained placeholders and they were substituted.
    Formatted,
    /// The message is the template verbatim, arguments or not.
    NoFormat,
}

/// Source position of the call that produced a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Location {
    pub file: &'static str,
    pub line: u32,
    pub column: u32,
}

impl Location {
    #[track_caller]
    pub fn caller() -> Location {
        let caller = std::panic::Location::caller();
        Location {
            file: caller.file(),
            line: caller.line(),
            column: caller.column(),
        }
    }
}

impl Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}:{}", self.file, self.line, self.column)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LogRecord {
    logger_name: String,
    level: Level,
    template: String,
    message: String,
    parameters: Option<Vec<Param>>,
    cause: Option<Cause>,
    marker: Option<Marker>,
    format_style: FormatStyle,
    location: Option<Location>,
    timestamp: SystemTime,
    thread_name: Option<String>,
    context: BTreeMap<String, String>,
}

impl LogRecord {
    /// A plain, unformatted record stamped with the current time and thread.
    pub fn new(logger_name: impl Into<String>, level: Level, message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            logger_name: logger_name.into(),
            level,
            template: message.clone(),
            message,
            parameters: None,
            cause: None,
            marker: None,
            format_style: FormatStyle::NoFormat,
            location: None,
            timestamp: SystemTime::now(),
            thread_name: std::thread::current().name().map(str::to_string),
            context: BTreeMap::new(),
        }
    }

    pub fn logger_name(&self) -> &str {
        &self.logger_name
    }

    pub fn level(&self) -> Level {
        self.level
    }

    /// The template as the caller wrote it.
    pub fn template(&self) -> &str {
        &self.template
    }

    /// The final message, after substitution when [`FormatStyle::Formatted`].
    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn parameters(&self) -> Option<&[Param]> {
        self.parameters.as_deref()
    }

    pub fn cause(&self) -> Option<&Cause> {
        self.cause.as_ref()
    }

    pub fn marker(&self) -> Option<&Marker> {
        self.marker.as_ref()
    }

    pub fn format_style(&self) -> FormatStyle {
        self.format_style
    }

    pub fn location(&self) -> Option<Location> {
        self.location
    }

    pub fn timestamp(&self) -> SystemTime {
        self.timestamp
    }

    pub fn thread_name(&self) -> Option<&str> {
        self.thread_name.as_deref()
    }

    /// Diagnostic context captured when the engine published the record.
    pub fn context(&self) -> &BTreeMap<String, String> {
        &self.context
    }

    pub(crate) fn set_formatted(&mut self, message: String) {
        self.message = message;
        self.format_style = FormatStyle::Formatted;
    }

    pub(crate) fn set_parameters(&mut self, parameters: Option<Vec<Param>>) {
        self.parameters = parameters;
    }

    pub fn set_cause(&mut self, cause: Option<Cause>) {
        self.cause = cause;
    }

    pub fn set_marker(&mut self, marker: Option<Marker>) {
        self.marker = marker;
    }

    pub fn set_location(&mut self, location: Option<Location>) {
        self.location = location;
    }

    /// Engines call this at publish time.
    pub fn set_context(&mut self, context: BTreeMap<String, String>) {
        self.context = context;
    }
}

/// The resolved message, followed by the cause chain if there is one.
impl Display for LogRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)?;
        if let Some(cause) = &self.cause {
            write!(f, ": {}", cause.chain_message())?;
        }
        Ok(())
    }
}

/*
Boilerplate notes for LogRecord:

- Clone: sinks may keep records, and an engine with several sinks hands each its own
- PartialEq: content equality; markers and causes inside compare by identity
- Eq/Hash: not implemented, Param may hold an f64
- Default: no sensible logger name or level
*/
