use std::fs;
use std::path::Path;

use serde::Deserialize;

use super::{AppConfig, ConfigError};

/// Environment variable naming an optional TOML config file
pub const CONFIG_PATH_ENV: &str = "TRIPBOARD_CONFIG";

/// One partial layer of configuration as read from a TOML file
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigLayer {
    pub server_port: Option<u16>,
    pub database_url: Option<String>,
    pub database_max_connections: Option<u32>,
    pub lock_timeout_ms: Option<u64>,
    pub channel_capacity: Option<usize>,
    pub cleanup_interval_secs: Option<u64>,
}

impl ConfigLayer {
    pub fn from_toml(contents: &str, origin: &str) -> Result<Self, ConfigError> {
        toml::from_str(contents).map_err(|source| ConfigError::Parse {
            path: origin.to_string(),
            source,
        })
    }

    pub fn read(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let layer = Self::from_toml(&contents, &path.display().to_string())?;
        tracing::debug!(path = %path.display(), "loaded config file");
        Ok(layer)
    }

    fn apply(self, config: &mut AppConfig) {
        if let Some(port) = self.server_port {
            config.server_port = port;
        }
        if let Some(url) = self.database_url {
            config.database_url = Some(url);
        }
        if let Some(connections) = self.database_max_connections {
            config.database_max_connections = connections;
        }
        if let Some(timeout) = self.lock_timeout_ms {
            config.lock_timeout_ms = timeout;
        }
        if let Some(capacity) = self.channel_capacity {
            config.channel_capacity = capacity;
        }
        if let Some(interval) = self.cleanup_interval_secs {
            config.cleanup_interval_secs = interval;
        }
    }
}

/// Load the configuration from the file named by `TRIPBOARD_CONFIG` (if any)
/// and the process environment
pub fn load() -> Result<AppConfig, ConfigError> {
    let file = std::env::var(CONFIG_PATH_ENV).ok();
    load_from(file.as_deref().map(Path::new), |key| std::env::var(key).ok())
}

/// Defaults, then `file`, then `env`
pub fn load_from<F>(file: Option<&Path>, env: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = AppConfig::default();
    if let Some(path) = file {
        ConfigLayer::read(path)?.apply(&mut config);
    }
    apply_env_overrides(&mut config, env)?;
    config.validate()?;

    tracing::debug!(
        port = config.server_port,
        database = config.database_url.is_some(),
        lock_timeout_ms = config.lock_timeout_ms,
        "config loaded"
    );
    Ok(config)
}

fn apply_env_overrides<F>(config: &mut AppConfig, env: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(port) = parse_env(&env, "SERVER_PORT", "server_port")? {
        config.server_port = port;
    }
    if let Some(url) = env("DATABASE_URL").filter(|url| !url.trim().is_empty()) {
        config.database_url = Some(url);
    }
    if let Some(connections) = parse_env(&env, "DATABASE_MAX_CONNECTIONS", "database_max_connections")? {
        config.database_max_connections = connections;
    }
    if let Some(timeout) = parse_env(&env, "LOCK_TIMEOUT_MS", "lock_timeout_ms")? {
        config.lock_timeout_ms = timeout;
    }
    if let Some(capacity) = parse_env(&env, "BROADCAST_CAPACITY", "channel_capacity")? {
        config.channel_capacity = capacity;
    }
    if let Some(interval) = parse_env(&env, "CLEANUP_INTERVAL_SECS", "cleanup_interval_secs")? {
        config.cleanup_interval_secs = interval;
    }
    Ok(())
}

fn parse_env<F, T>(env: &F, key: &str, field: &'static str) -> Result<Option<T>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match env(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::invalid(field, format!("{key}={raw} is not a valid number"))),
    }
}
