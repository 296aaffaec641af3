//! Server configuration parsed from environment variables.

use std::path::PathBuf;
use std::time::Duration;

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_DB_MAX_CONNECTIONS: u32 = 5;
pub const DEFAULT_DB_CONNECT_TIMEOUT_SECS: u64 = 5;
pub const DEFAULT_DB_MONITOR_INTERVAL_SECS: u64 = 30;
pub const DEFAULT_STATIC_DIR: &str = "client/dist";

/// Errors produced while reading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A variable is set but does not parse.
    #[error("invalid {var}: {value:?}")]
    Invalid { var: &'static str, value: String },
}

/// Database connection settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbConfig {
    /// Raw `DATABASE_URL`; `None` selects the local default.
    pub url: Option<String>,
    pub max_connections: u32,
    pub connect_timeout: Duration,
    pub monitor_interval: Duration,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            url: None,
            max_connections: DEFAULT_DB_MAX_CONNECTIONS,
            connect_timeout: Duration::from_secs(DEFAULT_DB_CONNECT_TIMEOUT_SECS),
            monitor_interval: Duration::from_secs(DEFAULT_DB_MONITOR_INTERVAL_SECS),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub port: u16,
    pub static_dir: PathBuf,
    pub db: DbConfig,
}

impl Config {
    /// Build typed config from environment variables.
    ///
    /// Optional:
    /// - `DATABASE_URL`: local default when absent or blank
    /// - `PORT`: default 3000
    /// - `STATIC_DIR`: built client assets, default `client/dist`
    /// - `DB_MAX_CONNECTIONS`: default 5
    /// - `DB_CONNECT_TIMEOUT_SECS`: default 5
    /// - `DB_MONITOR_INTERVAL_SECS`: default 30
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when a numeric variable does not parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        let url = std::env::var("DATABASE_URL").ok().filter(|v| !v.trim().is_empty());
        let db = DbConfig {
            url,
            max_connections: env_parse("DB_MAX_CONNECTIONS", DEFAULT_DB_MAX_CONNECTIONS)?,
            connect_timeout: Duration::from_secs(env_parse(
                "DB_CONNECT_TIMEOUT_SECS",
                DEFAULT_DB_CONNECT_TIMEOUT_SECS,
            )?),
            monitor_interval: Duration::from_secs(env_parse(
                "DB_MONITOR_INTERVAL_SECS",
                DEFAULT_DB_MONITOR_INTERVAL_SECS,
            )?),
        };
        let static_dir = std::env::var("STATIC_DIR").map_or_else(|_| PathBuf::from(DEFAULT_STATIC_DIR), PathBuf::from);

        Ok(Self { port: env_parse("PORT", DEFAULT_PORT)?, static_dir, db })
    }
}

fn env_parse<T: std::str::FromStr>(var: &'static str, default: T) -> Result<T, ConfigError> {
    match std::env::var(var) {
        Ok(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid { var, value: raw }),
        Err(_) => Ok(default),
    }
}
