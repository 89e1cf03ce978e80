// SPDX-License-Identifier: MIT OR Apache-2.0

//! Errors surfaced to callers.
//!
//! Formatting problems (placeholder/argument mismatches, stray braces) are never
//! errors; they degrade to literal text. Only configuration and context typing
//! problems reach the caller.

use thiserror::Error;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// No engine was supplied when building a [`LoggerFactory`](crate::LoggerFactory).
    #[error("no logging provider configured: supply an engine before requesting loggers")]
    NoProvider,

    /// A context value cannot be represented by the engine's string store.
    #[error("context value for key `{key}` has type {found}, which cannot be stored as a string")]
    TypeMismatch { key: String, found: &'static str },

    #[error("context keys must not be empty")]
    EmptyContextKey,

    #[error("unknown log level `{0}`")]
    InvalidLevel(String),

    #[error("invalid level directive `{0}`")]
    InvalidDirective(String),

    /// The `log` crate already has a global logger.
    #[error("a global `log` logger is already installed")]
    AlreadyInstalled(#[from] log::SetLoggerError),
}
