// SPDX-License-Identifier: MIT OR Apache-2.0

//! The reference engine.
//!
//! [`LogEngine`] keeps one engine logger per name, a table of level thresholds,
//! a list of [`Sink`]s and a [`ThreadLocalContextStore`]. Every published record
//! is stamped with the publishing thread's context and handed to every sink.
//!
//! # Level inheritance
//!
//! Logger names form a hierarchy separated by `::` (or `.`). A logger without its
//! own threshold uses the nearest ancestor's, and finally the root threshold:
//!
//! ```rust
//! use logshim::engine::LogEngine;
//! use logshim::LevelFilter;
//!
//! let engine = LogEngine::new();
//! engine.set_level("app", LevelFilter::Debug);
//! engine.set_level("app::db::pool", LevelFilter::Off);
//!
//! assert_eq!(engine.effective_level("app::db"), LevelFilter::Debug);
//! assert_eq!(engine.effective_level("app::db::pool::conn"), LevelFilter::Off);
//! assert_eq!(engine.effective_level("other"), LevelFilter::Info);
//! ```
//!
//! # Sinks
//!
//! A new engine writes to stderr. Sinks are reference-counted, so replacing them
//! while another thread is publishing lets the in-flight record finish on the old
//! set.

use super::context_store::ThreadLocalContextStore;
use super::stderror_sink::StdErrorSink;
use super::{ContextStore, Engine, EngineLogger, Sink};
use crate::config::Config;
use crate::log_record::LogRecord;
use crate::spinlock::Spinlock;
use crate::{Level, LevelFilter};
use std::collections::HashMap;
use std::sync::{Arc, Weak};

#[derive(Debug, Default)]
struct Levels {
    root: LevelFilter,
    overrides: HashMap<String, LevelFilter>,
}

impl Levels {
    fn effective(&self, name: &str) -> LevelFilter {
        let mut current = name;
        loop {
            if let Some(filter) = self.overrides.get(current) {
                return *filter;
            }
            match parent_name(current) {
                Some(parent) => current = parent,
                None => return self.root,
            }
        }
    }

    fn most_verbose(&self) -> LevelFilter {
        self.overrides
            .values()
            .copied()
            .chain(std::iter::once(self.root))
            .min()
            .unwrap_or(self.root)
    }
}

/// `a::b::c` -> `a::b` -> `a` -> `` -> None.
fn parent_name(name: &str) -> Option<&str> {
    if name.is_empty() {
        return None;
    }
    let cut = [name.rfind("::"), name.rfind('.')]
        .into_iter()
        .flatten()
        .max();
    Some(cut.map_or("", |at| &name[..at]))
}

#[derive(Debug)]
struct Shared {
    levels: Spinlock<Levels>,
    sinks: Spinlock<Vec<Arc<dyn Sink>>>,
    context: ThreadLocalContextStore,
}

#[derive(Debug)]
struct NamedLogger {
    name: String,
    // weak, or the engine's logger map would keep itself alive
    shared: Weak<Shared>,
}

impl EngineLogger for NamedLogger {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_enabled(&self, level: Level) -> bool {
        self.shared
            .upgrade()
            .is_some_and(|shared| shared.levels.with(|l| l.effective(&self.name)).allows(level))
    }

    fn publish(&self, mut record: LogRecord) {
        let Some(shared) = self.shared.upgrade() else {
            return;
        };
        record.set_context(shared.context.snapshot());
        let sinks = shared.sinks.with(|sinks| sinks.clone());
        for sink in sinks {
            sink.finish_log_record(record.clone());
        }
    }
}

#[derive(Debug)]
pub struct LogEngine {
    shared: Arc<Shared>,
    loggers: Spinlock<HashMap<String, Arc<NamedLogger>>>,
}

impl Default for LogEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl LogEngine {
    /// An engine at `info` for everything, writing to stderr.
    pub fn new() -> Self {
        Self::with_config(&Config::default())
    }

    pub fn with_config(config: &Config) -> Self {
        let engine = LogEngine {
            shared: Arc::new(Shared {
                levels: Spinlock::new(Levels::default()),
                sinks: Spinlock::new(vec![Arc::new(StdErrorSink::new())]),
                context: ThreadLocalContextStore::new(),
            }),
            loggers: Spinlock::new(HashMap::new()),
        };
        engine.configure(config);
        engine
    }

    /// Replaces every threshold with the ones in `config`.
    pub fn configure(&self, config: &Config) {
        self.shared.levels.with_mut(|levels| {
            levels.root = config.root;
            levels.overrides = config.levels.iter().cloned().collect();
        });
    }

    /// Sets the threshold for `name` and its descendants. The empty name is the root.
    pub fn set_level(&self, name: &str, filter: LevelFilter) {
        self.shared.levels.with_mut(|levels| {
            if name.is_empty() {
                levels.root = filter;
            } else {
                levels.overrides.insert(name.to_string(), filter);
            }
        });
    }

    /// Makes `name` inherit its threshold again.
    pub fn clear_level(&self, name: &str) {
        self.shared.levels.with_mut(|levels| {
            levels.overrides.remove(name);
        });
    }

    pub fn effective_level(&self, name: &str) -> LevelFilter {
        self.shared.levels.with(|levels| levels.effective(name))
    }

    /// Adds a sink alongside the existing ones.
    pub fn add_sink(&self, sink: Arc<dyn Sink>) {
        self.shared.sinks.with_mut(|sinks| sinks.push(sink));
    }

    /// Replaces all sinks. An empty list drops every record.
    pub fn set_sinks(&self, sinks: Vec<Arc<dyn Sink>>) {
        self.shared.sinks.with_mut(|current| *current = sinks);
    }

    pub fn sinks(&self) -> Vec<Arc<dyn Sink>> {
        self.shared.sinks.with(|sinks| sinks.clone())
    }

    /// Number of engine loggers created so far.
    pub fn logger_count(&self) -> usize {
        self.loggers.with(|loggers| loggers.len())
    }
}

impl Engine for LogEngine {
    fn logger(&self, name: &str) -> Arc<dyn EngineLogger> {
        if let Some(logger) = self.loggers.with(|loggers| loggers.get(name).cloned()) {
            return logger;
        }
        self.loggers.with_mut(|loggers| {
            loggers
                .entry(name.to_string())
                .or_insert_with(|| {
                    Arc::new(NamedLogger {
                        name: name.to_string(),
                        shared: Arc::downgrade(&self.shared),
                    })
                })
                .clone()
        })
    }

    fn context(&self) -> &dyn ContextStore {
        &self.shared.context
    }

    fn prepare_to_die(&self) {
        for sink in self.sinks() {
            sink.prepare_to_die();
        }
    }

    fn max_level(&self) -> LevelFilter {
        self.shared.levels.with(Levels::most_verbose)
    }
}
