//! Pregel runtime configuration
//!
//! Worker count, the optional superstep bound and tracing for the
//! execution engine.

use serde::{Deserialize, Serialize};
use std::path::Path;

use super::error::PregelError;

/// Pregel runtime configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PregelConfig {
    /// Number of workers (threads and partitions) per superstep
    pub workers: usize,

    /// Stop after this many supersteps even if vertices are still active
    pub max_supersteps: Option<usize>,

    /// Emit per-superstep tracing events
    pub tracing_enabled: bool,
}

impl Default for PregelConfig {
    fn default() -> Self {
        Self {
            workers: num_cpus::get(),
            max_supersteps: None,
            tracing_enabled: true,
        }
    }
}

impl PregelConfig {
    /// Create a new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the worker count
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    /// Bound the run to `max` supersteps
    pub fn with_max_supersteps(mut self, max: usize) -> Self {
        self.max_supersteps = Some(max);
        self
    }

    /// Run until every vertex halts, however long that takes
    pub fn without_superstep_limit(mut self) -> Self {
        self.max_supersteps = None;
        self
    }

    /// Enable or disable tracing
    pub fn with_tracing(mut self, enabled: bool) -> Self {
        self.tracing_enabled = enabled;
        self
    }

    /// Check if the superstep bound stops the run before superstep `superstep`
    pub fn limit_reached(&self, superstep: usize) -> bool {
        self.max_supersteps.is_some_and(|max| superstep >= max)
    }

    /// Reject configurations the engine cannot run
    pub fn validate(&self) -> Result<(), PregelError> {
        if self.workers == 0 {
            return Err(PregelError::config_error("workers must be at least 1"));
        }
        Ok(())
    }

    /// Parse a JSON configuration; missing fields take their defaults
    pub fn from_json_str(json: &str) -> Result<Self, PregelError> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| PregelError::config_error(format!("invalid config JSON: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load a JSON configuration file
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, PregelError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            PregelError::config_error(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_json_str(&json)
    }
}
