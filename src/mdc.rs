// SPDX-License-Identifier: MIT OR Apache-2.0

//! The mapped diagnostic context (MDC) facade.
//!
//! [`Mdc`] is a thin handle on the engine's own [`ContextStore`]. It keeps no map
//! of its own, so a value put through the facade is exactly what the engine
//! reads, and a value the engine writes is exactly what the facade reads back.
//! Entries are per thread.
//!
//! ```rust
//! use logshim::LoggerFactory;
//! use logshim::engine::{Engine, LogEngine};
//! use std::sync::Arc;
//!
//! let engine = Arc::new(LogEngine::new());
//! let factory = LoggerFactory::new(engine.clone());
//! let mdc = factory.mdc();
//!
//! mdc.put("request", "r-17").unwrap();
//! assert_eq!(mdc.get("request").as_deref(), Some("r-17"));
//! assert_eq!(engine.context().get("request").as_deref(), Some("r-17"));
//! ```
//!
//! # Value types
//!
//! The engine stores strings. [`put`](Mdc::put) accepts any [`ContextValue`] and
//! narrows it at the boundary: integers, floats and booleans become their usual
//! text, bytes must be UTF-8, floats must be finite. A value that cannot be
//! represented faithfully is rejected with [`Error::TypeMismatch`] and nothing is
//! written.

use crate::engine::{ContextStore, Engine};
use crate::error::Error;
use std::collections::BTreeMap;
use std::sync::Arc;

/// A value offered to the diagnostic context.
#[derive(Debug, Clone, PartialEq)]
pub enum ContextValue {
    Text(String),
    Integer(i64),
    Unsigned(u64),
    Float(f64),
    Bool(bool),
    Bytes(Vec<u8>),
}

impl ContextValue {
    pub fn type_name(&self) -> &'static str {
        match self {
            ContextValue::Text(_) => "text",
            ContextValue::Integer(_) => "integer",
            ContextValue::Unsigned(_) => "unsigned",
            ContextValue::Float(_) => "float",
            ContextValue::Bool(_) => "bool",
            ContextValue::Bytes(_) => "bytes",
        }
    }

    /// The string the engine will store, if there is a faithful one.
    fn narrow(self) -> Result<String, ContextValue> {
        match self {
            ContextValue::Text(s) => Ok(s),
            ContextValue::Integer(v) => Ok(v.to_string()),
            ContextValue::Unsigned(v) => Ok(v.to_string()),
            ContextValue::Float(v) if v.is_finite() => Ok(v.to_string()),
            ContextValue::Bool(v) => Ok(v.to_string()),
            ContextValue::Bytes(bytes) => {
                String::from_utf8(bytes).map_err(|e| ContextValue::Bytes(e.into_bytes()))
            }
            other => Err(other),
        }
    }
}

impl From<&str> for ContextValue {
    fn from(value: &str) -> Self {
        ContextValue::Text(value.to_string())
    }
}

impl From<String> for ContextValue {
    fn from(value: String) -> Self {
        ContextValue::Text(value)
    }
}

impl From<&String> for ContextValue {
    fn from(value: &String) -> Self {
        ContextValue::Text(value.clone())
    }
}

impl From<i32> for ContextValue {
    fn from(value: i32) -> Self {
        ContextValue::Integer(value.into())
    }
}

impl From<i64> for ContextValue {
    fn from(value: i64) -> Self {
        ContextValue::Integer(value)
    }
}

impl From<u32> for ContextValue {
    fn from(value: u32) -> Self {
        ContextValue::Unsigned(value.into())
    }
}

impl From<u64> for ContextValue {
    fn from(value: u64) -> Self {
        ContextValue::Unsigned(value)
    }
}

impl From<usize> for ContextValue {
    fn from(value: usize) -> Self {
        ContextValue::Unsigned(value as u64)
    }
}

impl From<f64> for ContextValue {
    fn from(value: f64) -> Self {
        ContextValue::Float(value)
    }
}

impl From<bool> for ContextValue {
    fn from(value: bool) -> Self {
        ContextValue::Bool(value)
    }
}

impl From<Vec<u8>> for ContextValue {
    fn from(value: Vec<u8>) -> Self {
        ContextValue::Bytes(value)
    }
}

impl From<&[u8]> for ContextValue {
    fn from(value: &[u8]) -> Self {
        ContextValue::Bytes(value.to_vec())
    }
}

/// Facade handle on an engine's diagnostic context.
///
/// Cheap to clone; every clone talks to the same engine store.
#[derive(Debug, Clone)]
pub struct Mdc {
    engine: Arc<dyn Engine>,
}

impl Mdc {
    pub fn new(engine: Arc<dyn Engine>) -> Self {
        Mdc { engine }
    }

    fn store(&self) -> &dyn ContextStore {
        self.engine.context()
    }

    /// Puts `value` under `key` for the calling thread.
    ///
    /// # Errors
    ///
    /// [`Error::EmptyContextKey`] for an empty key, [`Error::TypeMismatch`] when the
    /// value has no faithful string form. Neither writes anything.
    pub fn put(&self, key: &str, value: impl Into<ContextValue>) -> Result<(), Error> {
        if key.is_empty() {
            return Err(Error::EmptyContextKey);
        }
        let value = value.into().narrow().map_err(|rejected| Error::TypeMismatch {
            key: key.to_string(),
            found: rejected.type_name(),
        })?;
        self.store().put(key, value);
        Ok(())
    }

    /// Like [`put`](Mdc::put), but the entry is removed when the guard drops.
    ///
    /// ```rust
    /// # use logshim::LoggerFactory;
    /// # use logshim::engine::LogEngine;
    /// # use std::sync::Arc;
    /// # let mdc = LoggerFactory::new(Arc::new(LogEngine::new())).mdc();
    /// {
    ///     let _scope = mdc.put_scoped("job", 42).unwrap();
    ///     assert_eq!(mdc.get("job").as_deref(), Some("42"));
    /// }
    /// assert_eq!(mdc.get("job"), None);
    /// ```
    pub fn put_scoped(&self, key: &str, value: impl Into<ContextValue>) -> Result<MdcGuard, Error> {
        self.put(key, value)?;
        Ok(MdcGuard {
            mdc: self.clone(),
            key: key.to_string(),
        })
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.store().get(key)
    }

    pub fn remove(&self, key: &str) {
        self.store().remove(key);
    }

    pub fn clear(&self) {
        self.store().clear();
    }

    pub fn copy_of_context_map(&self) -> BTreeMap<String, String> {
        self.store().snapshot()
    }

    /// Replaces the calling thread's whole context with `map`.
    pub fn set_context_map(&self, map: BTreeMap<String, String>) {
        self.store().replace(map);
    }
}

/// Removes its key from the diagnostic context when dropped.
#[must_use = "the entry is removed as soon as the guard is dropped"]
#[derive(Debug)]
pub struct MdcGuard {
    mdc: Mdc,
    key: String,
}

impl Drop for MdcGuard {
    fn drop(&mut self) {
        self.mdc.remove(&self.key);
    }
}
