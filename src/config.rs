//! # Configuration
//!
//! Layered configuration: built-in defaults, an optional file, then
//! environment variables prefixed with `RECONCILER_` using `__` between
//! nested keys (e.g. `RECONCILER_WORKER__MAX_RETRIES=3`).

use crate::database::Dialect;
use crate::scheduler::RetryPolicy;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::debug;

/// Errors raised while loading configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Configuration load error: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub dialect: Dialect,
    pub url: String,
    pub operations_table: String,
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            dialect: Dialect::Postgres,
            url: "postgresql://localhost/reconciler_development".to_string(),
            operations_table: "scheduler_operations".to_string(),
            max_connections: 10,
        }
    }
}

/// Worker retry settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkerConfig {
    /// Invoker attempts per operation
    pub max_retries: u32,
    /// Pause between invoker attempts
    pub retry_delay_ms: u64,
    /// Retry budget handed to the invoker for the operation itself
    pub max_operation_retries: u32,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            max_retries: 5,
            retry_delay_ms: 5000,
            max_operation_retries: 5,
        }
    }
}

impl WorkerConfig {
    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.max_retries, self.retry_delay())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconcilerConfig {
    pub database: DatabaseConfig,
    pub worker: WorkerConfig,
}

impl ReconcilerConfig {
    /// Load defaults, then `path` (if given), then environment overrides
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder =
            config::Config::builder().add_source(config::Config::try_from(&Self::default())?);

        if let Some(path) = path {
            debug!(path = %path.display(), "loading configuration file");
            builder = builder.add_source(config::File::from(path).required(true));
        }

        let config: Self = builder
            .add_source(
                config::Environment::with_prefix("RECONCILER")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::load(None)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.worker.max_retries == 0 {
            return Err(ConfigError::Invalid(
                "worker.max_retries must be at least 1".to_string(),
            ));
        }
        if self.database.operations_table.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "database.operations_table must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
