//! Application configuration module
//!
//! Server settings with defaults suitable for local development. Values are
//! layered: built-in defaults, then an optional TOML file, then environment
//! variables (see [`load`]).

pub mod load;

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

pub use load::{load, ConfigLayer, CONFIG_PATH_ENV};

/// Application configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Port the HTTP server binds to
    pub server_port: u16,
    /// PostgreSQL connection string; the in-memory store is used when absent
    pub database_url: Option<String>,
    pub database_max_connections: u32,
    /// How long a mutation waits for a scope lock before giving up
    pub lock_timeout_ms: u64,
    /// Per-plan broadcast buffer
    pub channel_capacity: usize,
    /// Period of the channel and lock registry cleanup task
    pub cleanup_interval_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server_port: 3000,
            database_url: None,
            database_max_connections: 10,
            lock_timeout_ms: 5_000,
            channel_capacity: 256,
            cleanup_interval_secs: 300,
        }
    }
}

impl AppConfig {
    /// Create a new AppConfigBuilder
    pub fn builder() -> AppConfigBuilder {
        AppConfigBuilder::default()
    }

    pub fn lock_timeout(&self) -> Duration {
        Duration::from_millis(self.lock_timeout_ms)
    }

    pub fn cleanup_interval(&self) -> Duration {
        Duration::from_secs(self.cleanup_interval_secs)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(url) = &self.database_url {
            if !(url.starts_with("postgres://") || url.starts_with("postgresql://")) {
                return Err(ConfigError::InvalidUrl(url.clone()));
            }
        }
        if self.database_max_connections == 0 {
            return Err(ConfigError::invalid("database_max_connections", "must be at least 1"));
        }
        if self.lock_timeout_ms == 0 {
            return Err(ConfigError::invalid("lock_timeout_ms", "must be greater than zero"));
        }
        if self.channel_capacity == 0 {
            return Err(ConfigError::invalid("channel_capacity", "must be greater than zero"));
        }
        if self.cleanup_interval_secs == 0 {
            return Err(ConfigError::invalid("cleanup_interval_secs", "must be greater than zero"));
        }
        Ok(())
    }
}

/// Builder for AppConfig
#[derive(Debug, Default)]
pub struct AppConfigBuilder {
    config: AppConfig,
}

impl AppConfigBuilder {
    pub fn server_port(mut self, port: u16) -> Self {
        self.config.server_port = port;
        self
    }

    pub fn database_url(mut self, url: impl Into<String>) -> Self {
        self.config.database_url = Some(url.into());
        self
    }

    pub fn database_max_connections(mut self, connections: u32) -> Self {
        self.config.database_max_connections = connections;
        self
    }

    pub fn lock_timeout(mut self, timeout: Duration) -> Self {
        self.config.lock_timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        self
    }

    pub fn channel_capacity(mut self, capacity: usize) -> Self {
        self.config.channel_capacity = capacity;
        self
    }

    pub fn cleanup_interval(mut self, interval: Duration) -> Self {
        self.config.cleanup_interval_secs = interval.as_secs();
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<AppConfig, ConfigError> {
        self.config.validate()?;
        Ok(self.config)
    }
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid database URL: {0}")]
    InvalidUrl(String),
    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

impl ConfigError {
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            field,
            reason: reason.into(),
        }
    }
}
