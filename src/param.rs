// SPDX-License-Identifier: MIT OR Apache-2.0

//! Positional arguments for templated log calls.
//!
//! A facade call carries its arguments as a slice of [`Param`]. Each value keeps a
//! runtime type tag because the facade has one rule that depends on it: if the
//! *last* argument is a [`Cause`] and the template has fewer placeholders than
//! there are arguments, that argument is the record's cause rather than a
//! substitution value. [`Param::is_cause`] is that check.
//!
//! ```rust
//! use logshim::{Cause, Param};
//!
//! let err = std::io::Error::other("disk full");
//! let args = [Param::from("backup"), Param::from(Cause::new(err))];
//! assert!(!args[0].is_cause());
//! assert!(args[1].is_cause());
//! assert_eq!(args[0].to_string(), "backup");
//! ```

use std::error::Error as StdError;
use std::fmt::{Debug, Display};
use std::sync::Arc;

/// An error attached to a log record.
///
/// Causes compare by identity: two `Cause`s are equal when they share the same
/// allocation, so the cause read back from a record is provably the one the
/// caller passed in.
#[derive(Clone)]
pub struct Cause(Arc<dyn StdError + Send + Sync>);

impl Cause {
    pub fn new<E>(error: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Cause(Arc::new(error))
    }

    /// Wraps an error that is already shared.
    pub fn from_arc(error: Arc<dyn StdError + Send + Sync>) -> Self {
        Cause(error)
    }

    pub fn error(&self) -> &(dyn StdError + Send + Sync + 'static) {
        &*self.0
    }

    /// Whether both causes refer to the same error instance.
    pub fn ptr_eq(&self, other: &Cause) -> bool {
        std::ptr::addr_eq(Arc::as_ptr(&self.0), Arc::as_ptr(&other.0))
    }

    /// The error followed by its `source()` chain, separated by `: `.
    pub fn chain_message(&self) -> String {
        let mut message = self.0.to_string();
        let mut source = self.0.source();
        while let Some(err) = source {
            message.push_str(": ");
            message.push_str(&err.to_string());
            source = err.source();
        }
        message
    }
}

impl PartialEq for Cause {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for Cause {}

impl Debug for Cause {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Cause").field(&self.0).finish()
    }
}

impl Display for Cause {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl AsRef<dyn StdError + Send + Sync> for Cause {
    fn as_ref(&self) -> &(dyn StdError + Send + Sync + 'static) {
        &*self.0
    }
}

/// One positional argument of a log call.
#[derive(Clone)]
pub enum Param {
    Str(String),
    Int(i64),
    UInt(u64),
    Float(f64),
    Bool(bool),
    Char(char),
    /// Rendered as `[a, b, c]`.
    List(Vec<Param>),
    /// Any other displayable value, rendered lazily.
    Display(Arc<dyn Display + Send + Sync>),
    Cause(Cause),
    /// Absent value, rendered as `null`.
    Null,
}

impl Param {
    /// Wraps an arbitrary displayable value.
    pub fn display<T>(value: T) -> Self
    where
        T: Display + Send + Sync + 'static,
    {
        Param::Display(Arc::new(value))
    }

    pub fn list<I, T>(values: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Param>,
    {
        Param::List(values.into_iter().map(Into::into).collect())
    }

    /// The runtime type check behind trailing-cause detection.
    #[inline]
    pub fn is_cause(&self) -> bool {
        matches!(self, Param::Cause(_))
    }

    pub fn as_cause(&self) -> Option<&Cause> {
        match self {
            Param::Cause(cause) => Some(cause),
            _ => None,
        }
    }

    /// Name of the variant, for diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            Param::Str(_) => "string",
            Param::Int(_) => "int",
            Param::UInt(_) => "uint",
            Param::Float(_) => "float",
            Param::Bool(_) => "bool",
            Param::Char(_) => "char",
            Param::List(_) => "list",
            Param::Display(_) => "display",
            Param::Cause(_) => "cause",
            Param::Null => "null",
        }
    }
}

impl Display for Param {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Param::Str(s) => f.write_str(s),
            Param::Int(v) => write!(f, "{v}"),
            Param::UInt(v) => write!(f, "{v}"),
            Param::Float(v) => write!(f, "{v}"),
            Param::Bool(v) => write!(f, "{v}"),
            Param::Char(v) => write!(f, "{v}"),
            Param::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    Display::fmt(item, f)?;
                }
                f.write_str("]")
            }
            Param::Display(v) => write!(f, "{v}"),
            Param::Cause(c) => Display::fmt(c, f),
            Param::Null => f.write_str("null"),
        }
    }
}

impl Debug for Param {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Param::Str(v) => f.debug_tuple("Str").field(v).finish(),
            Param::Int(v) => f.debug_tuple("Int").field(v).finish(),
            Param::UInt(v) => f.debug_tuple("UInt").field(v).finish(),
            Param::Float(v) => f.debug_tuple("Float").field(v).finish(),
            Param::Bool(v) => f.debug_tuple("Bool").field(v).finish(),
            Param::Char(v) => f.debug_tuple("Char").field(v).finish(),
            Param::List(v) => f.debug_tuple("List").field(v).finish(),
            Param::Display(v) => f.debug_tuple("Display").field(&v.to_string()).finish(),
            Param::Cause(v) => f.debug_tuple("Cause").field(v).finish(),
            Param::Null => f.write_str("Null"),
        }
    }
}

/// Values compare by content; `Display` and `Cause` compare by identity.
impl PartialEq for Param {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Param::Str(a), Param::Str(b)) => a == b,
            (Param::Int(a), Param::Int(b)) => a == b,
            (Param::UInt(a), Param::UInt(b)) => a == b,
            (Param::Float(a), Param::Float(b)) => a == b,
            (Param::Bool(a), Param::Bool(b)) => a == b,
            (Param::Char(a), Param::Char(b)) => a == b,
            (Param::List(a), Param::List(b)) => a == b,
            (Param::Display(a), Param::Display(b)) => {
                std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
            }
            (Param::Cause(a), Param::Cause(b)) => a == b,
            (Param::Null, Param::Null) => true,
            _ => false,
        }
    }
}

impl From<&str> for Param {
    fn from(value: &str) -> Self {
        Param::Str(value.to_string())
    }
}

impl From<String> for Param {
    fn from(value: String) -> Self {
        Param::Str(value)
    }
}

impl From<&String> for Param {
    fn from(value: &String) -> Self {
        Param::Str(value.clone())
    }
}

impl From<std::borrow::Cow<'_, str>> for Param {
    fn from(value: std::borrow::Cow<'_, str>) -> Self {
        Param::Str(value.into_owned())
    }
}

macro_rules! from_signed {
    ($($t:ty),*) => {
        $(impl From<$t> for Param {
            fn from(value: $t) -> Self {
                Param::Int(value as i64)
            }
        })*
    };
}

macro_rules! from_unsigned {
    ($($t:ty),*) => {
        $(impl From<$t> for Param {
            fn from(value: $t) -> Self {
                Param::UInt(value as u64)
            }
        })*
    };
}

from_signed!(i8, i16, i32, i64, isize);
from_unsigned!(u8, u16, u32, u64, usize);

impl From<f32> for Param {
    fn from(value: f32) -> Self {
        // widen through the shortest f32 text, so 0.1f32 renders as 0.1
        Param::Float(value.to_string().parse().unwrap_or(f64::from(value)))
    }
}

impl From<f64> for Param {
    fn from(value: f64) -> Self {
        Param::Float(value)
    }
}

impl From<bool> for Param {
    fn from(value: bool) -> Self {
        Param::Bool(value)
    }
}

impl From<char> for Param {
    fn from(value: char) -> Self {
        Param::Char(value)
    }
}

impl From<Cause> for Param {
    fn from(value: Cause) -> Self {
        Param::Cause(value)
    }
}

impl<T: Into<Param>> From<Option<T>> for Param {
    fn from(value: Option<T>) -> Self {
        value.map_or(Param::Null, Into::into)
    }
}

impl<T: Into<Param>> From<Vec<T>> for Param {
    fn from(value: Vec<T>) -> Self {
        Param::list(value)
    }
}
