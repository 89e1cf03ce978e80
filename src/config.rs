// SPDX-License-Identifier: MIT OR Apache-2.0

//! Level configuration for the reference engine.
//!
//! Levels are given as a comma-separated list of directives. A bare level sets
//! the root threshold; `name=level` sets the threshold for a logger and its
//! descendants:
//!
//! ```rust
//! use logshim::{Config, LevelFilter};
//!
//! let config: Config = "warn,app::db=debug,app::db::pool=off".parse().unwrap();
//! assert_eq!(config.root, LevelFilter::Warn);
//! assert_eq!(config.levels.len(), 2);
//! ```
//!
//! [`Config::from_env`] reads the same syntax from `LOGSHIM_LOG`.

use crate::LevelFilter;
use crate::error::Error;
use std::str::FromStr;

/// Name of the environment variable read by [`Config::from_env`].
pub const ENV_VAR: &str = "LOGSHIM_LOG";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Config {
    /// Threshold for loggers with no more specific entry.
    pub root: LevelFilter,
    /// Per-logger thresholds, in directive order. Later entries for the same
    /// name win.
    pub levels: Vec<(String, LevelFilter)>,
}

impl Config {
    pub fn new(root: LevelFilter) -> Self {
        Config {
            root,
            levels: Vec::new(),
        }
    }

    /// Adds a threshold for `name` and its descendants.
    pub fn level(mut self, name: impl Into<String>, filter: LevelFilter) -> Self {
        self.levels.push((name.into(), filter));
        self
    }

    pub fn parse(directives: &str) -> Result<Config, Error> {
        let mut config = Config::default();
        for directive in directives.split(',').map(str::trim).filter(|d| !d.is_empty()) {
            match directive.split_once('=') {
                Some((name, level)) => {
                    let name = name.trim();
                    if name.is_empty() {
                        return Err(Error::InvalidDirective(directive.to_string()));
                    }
                    let filter = level
                        .parse::<LevelFilter>()
                        .map_err(|_| Error::InvalidDirective(directive.to_string()))?;
                    config.levels.push((name.to_string(), filter));
                }
                None => {
                    config.root = directive
                        .parse::<LevelFilter>()
                        .map_err(|_| Error::InvalidDirective(directive.to_string()))?;
                }
            }
        }
        Ok(config)
    }

    /// Reads directives from `LOGSHIM_LOG`. An unset variable yields the default
    /// (`info` for everything); a malformed one is an error.
    pub fn from_env() -> Result<Config, Error> {
        match std::env::var(ENV_VAR) {
            Ok(value) => Config::parse(&value),
            Err(_) => Ok(Config::default()),
        }
    }
}

impl FromStr for Config {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Config::parse(s)
    }
}
