// SPDX-License-Identifier: MIT OR Apache-2.0

//! Severity levels and level thresholds.

use crate::error::Error;
use std::fmt::Display;
use std::str::FromStr;

/// Severity of a log record, least severe first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Level {
    /// Very fine-grained diagnostics
    Trace,
    /// Diagnostics useful while debugging
    Debug,
    /// Normal operation
    Info,
    /// Suspicious condition
    Warn,
    /// Runtime error
    Error,
}

/// A threshold a [`Level`] must meet to pass.
///
/// `Off` rejects every level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum LevelFilter {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
    Off,
}

impl Level {
    pub const ALL: [Level; 5] = [
        Level::Trace,
        Level::Debug,
        Level::Info,
        Level::Warn,
        Level::Error,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Trace => "TRACE",
            Level::Debug => "DEBUG",
            Level::Info => "INFO",
            Level::Warn => "WARN",
            Level::Error => "ERROR",
        }
    }
}

impl LevelFilter {
    /// Whether `level` is at least as severe as this threshold.
    #[inline]
    pub fn allows(&self, level: Level) -> bool {
        (level as u8) >= (*self as u8)
    }
}

impl From<Level> for LevelFilter {
    fn from(level: Level) -> Self {
        match level {
            Level::Trace => LevelFilter::Trace,
            Level::Debug => LevelFilter::Debug,
            Level::Info => LevelFilter::Info,
            Level::Warn => LevelFilter::Warn,
            Level::Error => LevelFilter::Error,
        }
    }
}

impl Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

impl Display for LevelFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LevelFilter::Off => f.write_str("OFF"),
            LevelFilter::Trace => f.write_str("TRACE"),
            LevelFilter::Debug => f.write_str("DEBUG"),
            LevelFilter::Info => f.write_str("INFO"),
            LevelFilter::Warn => f.write_str("WARN"),
            LevelFilter::Error => f.write_str("ERROR"),
        }
    }
}

impl FromStr for Level {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "trace" => Ok(Level::Trace),
            "debug" => Ok(Level::Debug),
            "info" => Ok(Level::Info),
            "warn" | "warning" => Ok(Level::Warn),
            "error" => Ok(Level::Error),
            _ => Err(Error::InvalidLevel(s.to_string())),
        }
    }
}

impl FromStr for LevelFilter {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("off") {
            return Ok(LevelFilter::Off);
        }
        s.parse::<Level>().map(LevelFilter::from)
    }
}

/*
Boilerplate notes.

Level and LevelFilter are plain enums; Copy, Ord and Hash all make sense.
Default is only on LevelFilter; a record always has an explicit level.
*/
