// SPDX-License-Identifier: MIT OR Apache-2.0

//! Logger lookup and caching.
//!
//! A [`LoggerFactory`] owns one engine and a cache of facade loggers keyed by
//! name. It is an ordinary value: create one at startup, share it (usually in an
//! `Arc`), and call [`shutdown`](LoggerFactory::shutdown) when the application is
//! done with it. Nothing is installed globally unless you opt in through
//! [`LogBridge::install`](crate::LogBridge::install).
//!
//! ```rust
//! use logshim::engine::LogEngine;
//! use logshim::LoggerFactory;
//! use std::sync::Arc;
//!
//! let factory = LoggerFactory::new(Arc::new(LogEngine::new()));
//! let a = factory.get_logger("app::db");
//! let b = factory.get_logger("app::db");
//! assert!(Arc::ptr_eq(&a, &b));
//!
//! // the root logger answers to "" and "ROOT"
//! assert!(Arc::ptr_eq(&factory.get_logger(""), &factory.get_logger("root")));
//! ```

use crate::config::Config;
use crate::engine::{Engine, LogEngine};
use crate::error::Error;
use crate::logger::Logger;
use crate::mdc::Mdc;
use crate::param::Param;
use crate::spinlock::Spinlock;
use std::collections::HashMap;
use std::sync::Arc;

/// Name of the root logger.
pub const ROOT_LOGGER_NAME: &str = "";

/// The logger the factory reports its own lifecycle on.
const INTERNAL_LOGGER_NAME: &str = "logshim";

fn normalize(name: &str) -> &str {
    if name.eq_ignore_ascii_case("ROOT") {
        ROOT_LOGGER_NAME
    } else {
        name
    }
}

#[derive(Debug, Clone)]
enum Provider {
    Engine(Arc<dyn Engine>),
    Config(Config),
}

/// Builds a [`LoggerFactory`].
///
/// Supply either an engine, or a [`Config`] from which a [`LogEngine`] is built.
/// Whichever was supplied last wins.
///
/// ```rust
/// use logshim::{Config, Error, LevelFilter, LoggerFactory};
///
/// assert!(matches!(LoggerFactory::builder().build(), Err(Error::NoProvider)));
///
/// let factory = LoggerFactory::builder()
///     .config(Config::new(LevelFilter::Warn))
///     .build()
///     .unwrap();
/// assert!(!factory.get_logger("app").is_info_enabled());
/// ```
#[derive(Debug, Clone, Default)]
pub struct FactoryBuilder {
    provider: Option<Provider>,
}

impl FactoryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn engine(mut self, engine: Arc<dyn Engine>) -> Self {
        self.provider = Some(Provider::Engine(engine));
        self
    }

    /// Use the reference [`LogEngine`], configured by `config`.
    pub fn config(mut self, config: Config) -> Self {
        self.provider = Some(Provider::Config(config));
        self
    }

    /// # Errors
    ///
    /// [`Error::NoProvider`] if neither an engine nor a config was supplied.
    pub fn build(self) -> Result<LoggerFactory, Error> {
        let engine: Arc<dyn Engine> = match self.provider.ok_or(Error::NoProvider)? {
            Provider::Engine(engine) => engine,
            Provider::Config(config) => Arc::new(LogEngine::with_config(&config)),
        };
        Ok(LoggerFactory::new(engine))
    }
}

/// Hands out one [`Logger`] per name, all backed by the same engine.
#[derive(Debug)]
pub struct LoggerFactory {
    engine: Arc<dyn Engine>,
    loggers: Spinlock<HashMap<String, Arc<Logger>>>,
}

/*
Boilerplate notes.

Clone: no.  Two factories sharing an engine but not a cache would hand out distinct loggers for one name.
PartialEq/Hash: no meaningful notion.
Default: there's no default engine choice that isn't a policy decision, see FactoryBuilder.
*/

impl LoggerFactory {
    pub fn new(engine: Arc<dyn Engine>) -> Self {
        LoggerFactory {
            engine,
            loggers: Spinlock::new(HashMap::new()),
        }
    }

    pub fn builder() -> FactoryBuilder {
        FactoryBuilder::new()
    }

    /**
    Returns the logger for `name`, creating it on first use.

    Every call with the same name, from any thread, returns the same `Arc`.
    Threads racing on a new name may each ask the engine for its logger; only the
    first one to reach the cache is kept.
    The empty name and `ROOT` (any case) both name the root logger.
    */
    pub fn get_logger(&self, name: &str) -> Arc<Logger> {
        let name = normalize(name);
        if let Some(logger) = self.loggers.with(|loggers| loggers.get(name).cloned()) {
            return logger;
        }
        // the engine may log while creating its logger, so ask it outside the lock
        let created = Arc::new(Logger::new(name.to_string(), self.engine.logger(name)));
        // first writer wins; a racing loser drops its copy
        self.loggers.with_mut(|loggers| {
            loggers
                .entry(name.to_string())
                .or_insert(created)
                .clone()
        })
    }

    /// The logger named after `T`'s full type path.
    ///
    /// ```rust
    /// # use logshim::engine::LogEngine;
    /// # use logshim::LoggerFactory;
    /// # use std::sync::Arc;
    /// struct Scheduler;
    /// let factory = LoggerFactory::new(Arc::new(LogEngine::new()));
    /// assert!(factory.get_logger_for::<Scheduler>().name().ends_with("::Scheduler"));
    /// ```
    pub fn get_logger_for<T: ?Sized>(&self) -> Arc<Logger> {
        self.get_logger(std::any::type_name::<T>())
    }

    /// A diagnostic-context handle on this factory's engine.
    pub fn mdc(&self) -> Mdc {
        Mdc::new(self.engine.clone())
    }

    pub fn engine(&self) -> &Arc<dyn Engine> {
        &self.engine
    }

    /// Names of every cached logger, sorted.
    pub fn logger_names(&self) -> Vec<String> {
        let mut names = self.loggers.with(|loggers| loggers.keys().cloned().collect::<Vec<_>>());
        names.sort();
        names
    }

    /**
    Flushes the engine and forgets every cached logger.

    Loggers already handed out keep working against the engine.  Later lookups
    build fresh ones.
    */
    pub fn shutdown(&self) {
        let cached = self.loggers.with(|loggers| loggers.len());
        self.get_logger(INTERNAL_LOGGER_NAME).debug_with(
            "shutting down logger factory with {} cached loggers",
            &[Param::from(cached)],
        );
        self.engine.prepare_to_die();
        self.loggers.with_mut(|loggers| loggers.clear());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::InMemorySink;
    use crate::{Level, LevelFilter};

    fn factory() -> (LoggerFactory, Arc<LogEngine>) {
        let engine = Arc::new(LogEngine::new());
        (LoggerFactory::new(engine.clone()), engine)
    }

    #[test]
    fn test_same_instance_for_same_name() {
        let (factory, engine) = factory();
        let a = factory.get_logger("a");
        assert!(Arc::ptr_eq(&a, &factory.get_logger("a")));
        assert!(!Arc::ptr_eq(&a, &factory.get_logger("b")));
        assert_eq!(engine.logger_count(), 2);
    }

    #[test]
    fn test_same_instance_across_threads() {
        let (factory, engine) = factory();
        let loggers: Vec<Arc<Logger>> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..16)
                .map(|_| scope.spawn(|| factory.get_logger("shared")))
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });
        assert!(loggers.iter().all(|l| Arc::ptr_eq(l, &loggers[0])));
        assert_eq!(engine.logger_count(), 1);
    }

    /// An engine that reports every logger it creates through the factory using it.
    #[derive(Debug)]
    struct Chatty {
        inner: LogEngine,
        factory: std::sync::OnceLock<std::sync::Weak<LoggerFactory>>,
    }

    impl Engine for Chatty {
        fn logger(&self, name: &str) -> Arc<dyn crate::engine::EngineLogger> {
            if name != "chatty" {
                if let Some(factory) = self.factory.get().and_then(std::sync::Weak::upgrade) {
                    factory.get_logger("chatty").info_with("creating {}", &[Param::from(name)]);
                }
            }
            self.inner.logger(name)
        }

        fn context(&self) -> &dyn crate::engine::ContextStore {
            self.inner.context()
        }

        fn prepare_to_die(&self) {
            self.inner.prepare_to_die();
        }
    }

    #[test]
    fn test_engine_may_log_while_creating_a_logger() {
        let sink = Arc::new(InMemorySink::new());
        let chatty = Arc::new(Chatty {
            inner: LogEngine::new(),
            factory: std::sync::OnceLock::new(),
        });
        chatty.inner.set_sinks(vec![sink.clone()]);
        let factory = Arc::new(LoggerFactory::new(chatty.clone()));
        chatty.factory.set(Arc::downgrade(&factory)).unwrap();

        let logger = factory.get_logger("app");
        assert!(Arc::ptr_eq(&logger, &factory.get_logger("app")));
        assert_eq!(sink.poll().unwrap().message(), "creating app");
        assert_eq!(factory.logger_names(), vec!["app", "chatty"]);
    }

    #[test]
    fn test_root_normalization() {
        let (factory, _engine) = factory();
        let root = factory.get_logger(ROOT_LOGGER_NAME);
        assert_eq!(root.name(), "");
        assert!(Arc::ptr_eq(&root, &factory.get_logger("ROOT")));
        assert!(Arc::ptr_eq(&root, &factory.get_logger("Root")));
        assert_eq!(factory.logger_names(), vec![String::new()]);
    }

    #[test]
    fn test_logger_for_type() {
        struct Probe;
        let (factory, _engine) = factory();
        let logger = factory.get_logger_for::<Probe>();
        assert_eq!(logger.name(), std::any::type_name::<Probe>());
    }

    #[test]
    fn test_builder() {
        assert!(matches!(FactoryBuilder::new().build(), Err(Error::NoProvider)));

        let engine = Arc::new(LogEngine::new());
        let factory = LoggerFactory::builder()
            .config(Config::new(LevelFilter::Error))
            .engine(engine.clone())
            .build()
            .unwrap();
        engine.set_level("", LevelFilter::Trace);
        assert!(factory.get_logger("x").is_enabled(Level::Trace));
    }

    #[test]
    fn test_shutdown_flushes_and_forgets() {
        let (factory, engine) = factory();
        let sink = Arc::new(InMemorySink::new());
        engine.set_sinks(vec![sink.clone()]);
        engine.set_level(INTERNAL_LOGGER_NAME, LevelFilter::Debug);

        let before = factory.get_logger("app");
        factory.shutdown();
        assert!(factory.logger_names().is_empty());

        let record = sink.poll().unwrap();
        assert_eq!(record.logger_name(), INTERNAL_LOGGER_NAME);
        assert_eq!(record.message(), "shutting down logger factory with 1 cached loggers");

        let after = factory.get_logger("app");
        assert!(!Arc::ptr_eq(&before, &after));
        before.info("still works");
        assert_eq!(sink.poll().unwrap().message(), "still works");
    }

    #[test]
    fn test_mdc_shares_engine_store() {
        let (factory, engine) = factory();
        factory.mdc().put("k", "v").unwrap();
        assert_eq!(engine.context().get("k").as_deref(), Some("v"));
        factory.mdc().clear();
    }
}
