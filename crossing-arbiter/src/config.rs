//! Startup configuration.
//!
//! Values come from environment variables, each falling back to a default
//! when unset.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::arbiter::ArbiterConfig;

/// Error reading configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// A variable is set but cannot be parsed
    #[error("invalid value for {var}: {value:?}")]
    Invalid { var: &'static str, value: String },

    /// A required variable is missing
    #[error("{0} must be set")]
    Missing(&'static str),
}

/// Complete configuration of the arbiter process.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Number of trains in the fleet.
    pub train_count: usize,

    /// Cars each train must announce before arbitration starts.
    pub cars_per_train: usize,

    /// Time between arbitration ticks.
    pub tick_interval: Duration,

    /// JSON file listing the crossing points.
    pub crossings_path: Option<PathBuf>,

    pub arbiter: ArbiterConfig,
}

impl Config {
    /// Read the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Read the configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let train_count = parse(&lookup, "ARBITER_TRAINS")?.unwrap_or(defaults.train_count);
        // Group labels carry the train index in a single digit
        if train_count == 0 || train_count > 10 {
            return Err(ConfigError::Invalid {
                var: "ARBITER_TRAINS",
                value: train_count.to_string(),
            });
        }

        let tick_ms: Option<u64> = parse(&lookup, "ARBITER_TICK_MS")?;
        let mut arbiter = defaults.arbiter;
        if let Some(p) = parse(&lookup, "ARBITER_PROXIMITY")? {
            arbiter.proximity_threshold = p;
        }
        if let Some(c) = parse(&lookup, "ARBITER_CLEARANCE")? {
            arbiter.clearance_threshold = c;
        }
        if let Some(prefix) = lookup("ARBITER_GROUP_PREFIX") {
            arbiter.group_prefix = prefix;
        }
        if let Some(multi) = parse(&lookup, "ARBITER_MULTI_CONTENDER")? {
            arbiter.allow_multi_contender = multi;
        }

        Ok(Self {
            train_count,
            cars_per_train: parse(&lookup, "ARBITER_CARS_PER_TRAIN")?
                .unwrap_or(defaults.cars_per_train),
            tick_interval: tick_ms
                .map(Duration::from_millis)
                .unwrap_or(defaults.tick_interval),
            crossings_path: lookup("ARBITER_CROSSINGS").map(PathBuf::from),
            arbiter,
        })
    }

    /// The crossings file, which has no default.
    pub fn require_crossings_path(&self) -> Result<&PathBuf, ConfigError> {
        self.crossings_path
            .as_ref()
            .ok_or(ConfigError::Missing("ARBITER_CROSSINGS"))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            train_count: 2,
            cars_per_train: 1,
            tick_interval: Duration::from_millis(100),
            crossings_path: None,
            arbiter: ArbiterConfig::default(),
        }
    }
}

fn parse<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
) -> Result<Option<T>, ConfigError> {
    match lookup(var) {
        None => Ok(None),
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::Invalid { var, value }),
    }
}
