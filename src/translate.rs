// SPDX-License-Identifier: MIT OR Apache-2.0

//! Turns a facade call into a [`LogRecord`].
//!
//! # Placeholders
//!
//! The placeholder token is `{}`. Each one is replaced, left to right, by the
//! string form of the next argument. Surplus placeholders stay as a literal `{}`;
//! surplus arguments stay in the record's parameter list but do not appear in the
//! message. A lone `{` or `}` is ordinary text.
//!
//! A backslash escapes a placeholder: `\{}` renders as `{}` and does not consume
//! an argument. A doubled backslash escapes the backslash instead: `\\{}` renders
//! as `\` followed by the substituted argument. Escapes are part of substitution:
//! a template with no real placeholder is not substituted, so its backslashes stay
//! as written (see below).
//!
//! # Trailing cause
//!
//! When the last argument is a [`Cause`](crate::Cause) and the template has fewer
//! placeholders than there are arguments, that argument becomes the record's cause
//! and is dropped from the parameter list. When the counts are equal the cause is
//! an ordinary argument and is substituted like any other.
//!
//! # No placeholders
//!
//! A template without placeholders is never substituted: the message is the
//! template verbatim and the record is [`FormatStyle::NoFormat`](crate::FormatStyle),
//! even if arguments were passed. The same holds for a call that passed no
//! arguments at all, so a plain message containing `{}` or a backslash is logged
//! exactly as written.
//!
//! ```rust
//! use logshim::translate::{translate, LogCall};
//! use logshim::{Cause, FormatStyle, Level, Param};
//!
//! let err = Cause::new(std::io::Error::other("refused"));
//! let args = [Param::from("db-1"), Param::from(err.clone())];
//! let record = translate("app", Level::Warn, LogCall::new("connect to {} failed", &args));
//!
//! assert_eq!(record.message(), "connect to db-1 failed");
//! assert_eq!(record.format_style(), FormatStyle::Formatted);
//! assert_eq!(record.cause(), Some(&err));
//! assert_eq!(record.parameters(), Some(&[Param::from("db-1")][..]));
//! ```

use crate::Level;
use crate::log_record::{Location, LogRecord};
use crate::marker::Marker;
use crate::param::{Cause, Param};
use std::fmt::Write;

const ESCAPE: u8 = b'\\';

/// One facade invocation, before translation.
#[derive(Debug, Clone)]
pub struct LogCall<'a> {
    pub marker: Option<&'a Marker>,
    pub template: &'a str,
    pub args: &'a [Param],
    /// A cause passed explicitly rather than as a trailing argument.
    pub cause: Option<Cause>,
    pub location: Option<Location>,
}

impl<'a> LogCall<'a> {
    pub fn new(template: &'a str, args: &'a [Param]) -> Self {
        LogCall {
            marker: None,
            template,
            args,
            cause: None,
            location: None,
        }
    }

    pub fn marker(mut self, marker: Option<&'a Marker>) -> Self {
        self.marker = marker;
        self
    }

    pub fn cause(mut self, cause: Option<Cause>) -> Self {
        self.cause = cause;
        self
    }

    pub fn location(mut self, location: Location) -> Self {
        self.location = Some(location);
        self
    }
}

enum Piece<'t> {
    Text(&'t str),
    Placeholder,
}

/// Splits a template into literal text and placeholders, applying the escape rules.
fn pieces(template: &str) -> impl Iterator<Item = Piece<'_>> {
    let bytes = template.as_bytes();
    let mut pos = 0;
    let mut pending: Option<Piece<'_>> = None;
    std::iter::from_fn(move || {
        if let Some(piece) = pending.take() {
            return Some(piece);
        }
        if pos > template.len() {
            return None;
        }
        let Some(found) = template[pos..].find("{}") else {
            let rest = &template[pos..];
            pos = template.len() + 1;
            return Some(Piece::Text(rest));
        };
        let at = pos + found;
        let escaped = at > pos && bytes[at - 1] == ESCAPE;
        let double_escaped = escaped && at > pos + 1 && bytes[at - 2] == ESCAPE;
        let start = pos;
        if double_escaped {
            // keep one of the two backslashes, then substitute
            pos = at + 2;
            pending = Some(Piece::Placeholder);
            Some(Piece::Text(&template[start..at - 1]))
        } else if escaped {
            // drop the backslash, emit `{`, and let `}` flow on as text
            pos = at + 1;
            pending = Some(Piece::Text("{"));
            Some(Piece::Text(&template[start..at - 1]))
        } else {
            pos = at + 2;
            pending = Some(Piece::Placeholder);
            Some(Piece::Text(&template[start..at]))
        }
    })
}

/// Number of placeholders that would consume an argument.
pub fn count_placeholders(template: &str) -> usize {
    pieces(template)
        .filter(|p| matches!(p, Piece::Placeholder))
        .count()
}

/// Substitutes `args` into `template`.
pub fn format_message(template: &str, args: &[Param]) -> String {
    let mut out = String::with_capacity(template.len() + args.len() * 8);
    let mut args = args.iter();
    for piece in pieces(template) {
        match piece {
            Piece::Text(text) => out.push_str(text),
            Piece::Placeholder => match args.next() {
                Some(arg) => {
                    // writing into a String cannot fail
                    let _ = write!(out, "{arg}");
                }
                None => out.push_str("{}"),
            },
        }
    }
    out
}

/// Splits a trailing cause off `args` when the facade rules say it is one.
///
/// Returns the remaining arguments and the extracted cause.
pub fn extract_cause(placeholders: usize, args: &[Param]) -> (&[Param], Option<Cause>) {
    match args.split_last() {
        Some((last, rest)) if placeholders < args.len() => match last.as_cause() {
            Some(cause) => (rest, Some(cause.clone())),
            None => (args, None),
        },
        _ => (args, None),
    }
}

/// Builds the record for one call. Never fails.
pub fn translate(logger_name: &str, level: Level, call: LogCall<'_>) -> LogRecord {
    let placeholders = count_placeholders(call.template);

    let (args, cause) = match call.cause {
        Some(explicit) => (call.args, Some(explicit)),
        None => extract_cause(placeholders, call.args),
    };

    let mut record = LogRecord::new(logger_name, level, call.template);
    if placeholders > 0 && !call.args.is_empty() {
        record.set_formatted(format_message(call.template, args));
    }
    record.set_parameters(if call.args.is_empty() {
        None
    } else {
        Some(args.to_vec())
    });
    record.set_cause(cause);
    record.set_marker(call.marker.cloned());
    record.set_location(call.location);
    record
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FormatStyle;

    fn cause() -> Cause {
        Cause::new(std::io::Error::other("Test exception"))
    }

    #[test]
    fn test_plain_message() {
        let record = translate("t", Level::Info, LogCall::new("This is a test message", &[]));
        assert_eq!(record.message(), "This is a test message");
        assert_eq!(record.format_style(), FormatStyle::NoFormat);
        assert!(record.parameters().is_none());
        assert!(record.cause().is_none());
    }

    #[test]
    fn test_formatted_message() {
        let args = [Param::from("{message}")];
        let record = translate(
            "t",
            Level::Info,
            LogCall::new("This is a test formatted {}", &args),
        );
        assert_eq!(record.message(), "This is a test formatted {message}");
        assert_eq!(record.template(), "This is a test formatted {}");
        assert_eq!(record.format_style(), FormatStyle::Formatted);
        assert_eq!(record.parameters(), Some(&args[..]));
    }

    #[test]
    fn test_trailing_cause_extracted() {
        let e = cause();
        let args = [Param::from("{message}"), Param::from(e.clone())];
        let record = translate(
            "t",
            Level::Info,
            LogCall::new("This is a test formatted {}", &args),
        );
        assert_eq!(record.message(), "This is a test formatted {message}");
        assert_eq!(record.cause(), Some(&e));
        assert_eq!(record.parameters(), Some(&args[..1]));
    }

    #[test]
    fn test_trailing_cause_boundary() {
        // as many placeholders as args: the cause is substituted, not extracted
        let e = cause();
        let args = [Param::from("a"), Param::from(e.clone())];
        let record = translate("t", Level::Info, LogCall::new("{} then {}", &args));
        assert_eq!(record.message(), "a then Test exception");
        assert!(record.cause().is_none());
        assert_eq!(record.parameters().map(<[Param]>::len), Some(2));

        // one fewer placeholder: extracted
        let record = translate("t", Level::Info, LogCall::new("{} only", &args));
        assert_eq!(record.message(), "a only");
        assert_eq!(record.cause(), Some(&e));
    }

    #[test]
    fn test_cause_not_last_is_ordinary() {
        let args = [Param::from(cause()), Param::from("x")];
        let record = translate("t", Level::Info, LogCall::new("{}", &args));
        assert!(record.cause().is_none());
        assert_eq!(record.message(), "Test exception");
        assert_eq!(record.parameters().map(<[Param]>::len), Some(2));
    }

    #[test]
    fn test_message_with_only_cause() {
        let e = cause();
        let args = [Param::from(e.clone())];
        let record = translate("t", Level::Info, LogCall::new("This is a test message", &args));
        assert_eq!(record.message(), "This is a test message");
        assert_eq!(record.format_style(), FormatStyle::NoFormat);
        assert_eq!(record.cause(), Some(&e));
        assert_eq!(record.parameters(), Some(&[][..]));
    }

    #[test]
    fn test_explicit_cause_keeps_args() {
        let e = cause();
        let other = cause();
        let args = [Param::from(other.clone())];
        let record = translate(
            "t",
            Level::Error,
            LogCall::new("no placeholders", &args).cause(Some(e.clone())),
        );
        assert_eq!(record.cause(), Some(&e));
        assert_eq!(record.parameters(), Some(&args[..]));
    }

    #[test]
    fn test_no_placeholders_ignores_args() {
        let args = [Param::from(1), Param::from(2)];
        let record = translate("t", Level::Info, LogCall::new("log message {foo}", &args));
        assert_eq!(record.message(), "log message {foo}");
        assert_eq!(record.format_style(), FormatStyle::NoFormat);
        assert_eq!(record.parameters(), Some(&args[..]));
    }

    #[test]
    fn test_no_args_is_verbatim() {
        let record = translate("t", Level::Info, LogCall::new(r"100% {} \{} done", &[]));
        assert_eq!(record.message(), r"100% {} \{} done");
        assert_eq!(record.format_style(), FormatStyle::NoFormat);
        assert!(record.parameters().is_none());
    }

    #[test]
    fn test_excess_placeholders_stay_literal() {
        let args = [Param::from(1)];
        assert_eq!(format_message("{} {} {}", &args), "1 {} {}");
    }

    #[test]
    fn test_excess_args_kept_but_unused() {
        let args = [Param::from(1), Param::from(2), Param::from(3)];
        let record = translate("t", Level::Info, LogCall::new("first={}", &args));
        assert_eq!(record.message(), "first=1");
        assert_eq!(record.parameters(), Some(&args[..]));
    }

    #[test]
    fn test_malformed_braces_are_text() {
        let args = [Param::from("v")];
        assert_eq!(format_message("{ } {x} } { {}", &args), "{ } {x} } { v");
        assert_eq!(count_placeholders("{ } {x} } {"), 0);
        assert_eq!(format_message("{{}}", &args), "{v}");
    }

    #[test]
    fn test_float_argument_keeps_its_text() {
        let args = [Param::from(0.1f32)];
        let record = translate("t", Level::Info, LogCall::new("ratio {}", &args));
        assert_eq!(record.message(), "ratio 0.1");
    }

    #[test]
    fn test_escape_only_template_is_verbatim() {
        // no placeholder, so no substitution and no escape processing
        let args = [Param::from("x")];
        let record = translate("t", Level::Info, LogCall::new(r"a \{} b", &args));
        assert_eq!(record.message(), r"a \{} b");
        assert_eq!(record.format_style(), FormatStyle::NoFormat);

        let record = translate("t", Level::Info, LogCall::new(r"a \{} b {}", &args));
        assert_eq!(record.message(), "a {} b x");
        assert_eq!(record.format_style(), FormatStyle::Formatted);
    }

    #[test]
    fn test_escapes() {
        let args = [Param::from("v")];
        assert_eq!(count_placeholders(r"a \{} b"), 0);
        assert_eq!(format_message(r"a \{} b {}", &args), "a {} b v");
        assert_eq!(count_placeholders(r"a \\{} b"), 1);
        assert_eq!(format_message(r"a \\{} b", &args), r"a \v b");
        assert_eq!(format_message(r"\{}{}", &args), "{}v");
    }

    #[test]
    fn test_multibyte_text() {
        let args = [Param::from("ü"), Param::from(3)];
        assert_eq!(format_message("größe {} → {}€", &args), "größe ü → 3€");
    }

    #[test]
    fn test_marker_and_location_attached() {
        let marker = Marker::new("test");
        let location = Location::caller();
        let record = translate(
            "t",
            Level::Info,
            LogCall::new("log message", &[])
                .marker(Some(&marker))
                .location(location),
        );
        assert!(record.marker().is_some_and(|m| m.ptr_eq(&marker)));
        assert_eq!(record.location(), Some(location));
        assert_eq!(record.format_style(), FormatStyle::NoFormat);
    }
}
