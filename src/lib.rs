// SPDX-License-Identifier: MIT OR Apache-2.0
/*!
# logshim

logshim is a logging facade that forwards to a separate logging engine.

# The problem

A facade gives libraries one stable API to log with: five levels, `{}` templates,
markers and a per-thread diagnostic context.  An engine decides what is kept,
how it is rendered and where it goes.  Gluing the two together is where the
details get lost: a template gets formatted twice, the error passed as the last
argument ends up stringified into the message instead of attached as a cause,
or the diagnostic context lives in two maps that drift apart.

logshim is that glue, with the details written down and tested.

# The API

```rust
use logshim::engine::{InMemorySink, LogEngine};
use logshim::{Cause, LoggerFactory, Param};
use std::sync::Arc;

let sink = Arc::new(InMemorySink::new());
let engine = LogEngine::new();
engine.set_sinks(vec![sink.clone()]);
let factory = LoggerFactory::new(Arc::new(engine));

let logger = factory.get_logger("app::jobs");
logshim::info!(logger, "job {} finished in {}ms", 23, 340);

let err = Cause::new(std::io::Error::other("disk full"));
logger.error_with("could not save job {}", &[Param::from(23), Param::from(err)]);

let records = sink.drain_records();
assert_eq!(records[0].message(), "job 23 finished in 340ms");
assert_eq!(records[1].message(), "could not save job 23");
assert_eq!(records[1].cause().unwrap().to_string(), "disk full");
```

# Formatting rules

* `{}` is replaced by the next argument.  Missing arguments leave `{}` in place;
  surplus arguments are kept on the record but not rendered.
* In a template that is substituted, `\{}` is a literal `{}` and `\\{}` is a
  backslash followed by a substitution.
* When the last argument is a [`Cause`] and there are fewer placeholders than
  arguments, it becomes the record's cause instead of an argument.
* A template without placeholders, or a call without arguments, is logged exactly
  as written and marked [`FormatStyle::NoFormat`].

See [`translate`] for the details.

# Engines

The facade never filters or writes anything itself.  It talks to an engine through
the traits in [`engine`]; the crate ships [`LogEngine`](engine::LogEngine), which
has hierarchical level thresholds and pluggable sinks, and logs to stderr by
default.  Thresholds can come from the `LOGSHIM_LOG` environment variable:

```rust
use logshim::{Config, LoggerFactory};

let factory = LoggerFactory::builder()
    .config(Config::parse("warn,app::db=debug").unwrap())
    .build()
    .unwrap();
assert!(factory.get_logger("app::db::pool").is_debug_enabled());
assert!(!factory.get_logger("app::http").is_info_enabled());
```

# Diagnostic context

[`Mdc`] puts key/value pairs in the engine's own per-thread store, which stamps
them onto every record published from that thread.

# The `log` crate

[`LogBridge::install`] routes `log::info!` and friends from other crates into the
same engine.
*/

mod bridge;
pub mod config;
pub mod engine;
mod error;
mod factory;
mod level;
mod log_record;
mod logger;
mod macros;
mod marker;
mod mdc;
mod param;
mod spinlock;
mod sys;
pub mod translate;

pub use bridge::LogBridge;
pub use config::Config;
pub use error::Error;
pub use factory::{FactoryBuilder, LoggerFactory, ROOT_LOGGER_NAME};
pub use level::{Level, LevelFilter};
pub use log_record::{FormatStyle, Location, LogRecord};
pub use logger::Logger;
pub use marker::{Marker, MarkerFactory};
pub use mdc::{ContextValue, Mdc, MdcGuard};
pub use param::{Cause, Param};
