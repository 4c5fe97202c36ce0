//! Configuration management for the TM1 client
//!
//! This module handles loading, validation, and merging of client configuration.

pub mod models;
pub mod validation;

pub use models::*;
pub use validation::Validate;

use crate::utils::error::{Result, Tm1Error};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, info};

/// Main configuration struct for the client
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Connection configuration
    #[serde(default)]
    pub connection: ConnectionConfig,
    /// Bulk operation defaults
    #[serde(default)]
    pub bulk: BulkConfig,
    /// Async execution polling defaults
    #[serde(default)]
    pub polling: PollingConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a YAML file
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading configuration from: {:?}", path);

        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| Tm1Error::Config(format!("Failed to read config file: {}", e)))?;

        let config = Self::from_yaml_str(&content)?;

        debug!("Configuration loaded successfully");
        Ok(config)
    }

    /// Parse and validate configuration from YAML text
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let config: Config = serde_yaml::from_str(content)
            .map_err(|e| Tm1Error::Config(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from environment variables
    ///
    /// A `.env` file in the working directory is read first when present.
    pub fn from_env() -> Result<Self> {
        info!("Loading configuration from environment variables");
        let _ = dotenvy::dotenv();

        let config = Self::default().apply_env(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Overlay `TM1_*` variables from `lookup` onto this configuration
    pub fn apply_env<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(base_url) = lookup("TM1_BASE_URL") {
            self.connection.base_url = base_url;
        }
        if let Some(user) = lookup("TM1_USER") {
            self.connection.user = Some(user);
        }
        if let Some(password) = lookup("TM1_PASSWORD") {
            self.connection.password = Some(password);
        }
        if let Some(timeout) = parse_var(&lookup, "TM1_TIMEOUT")? {
            self.connection.timeout = timeout;
        }
        if let Some(verify_tls) = parse_var(&lookup, "TM1_VERIFY_TLS")? {
            self.connection.verify_tls = verify_tls;
        }
        if let Some(chunk_size) = parse_var(&lookup, "TM1_BULK_CHUNK_SIZE")? {
            self.bulk.chunk_size = chunk_size;
        }
        if let Some(max_retries) = parse_var(&lookup, "TM1_BULK_MAX_RETRIES")? {
            self.bulk.max_retries = max_retries;
        }
        if let Some(retry_delay_ms) = parse_var(&lookup, "TM1_BULK_RETRY_DELAY_MS")? {
            self.bulk.retry_delay_ms = retry_delay_ms;
        }
        if let Some(cancel) = parse_var(&lookup, "TM1_BULK_CANCEL_AT_FAILURE")? {
            self.bulk.cancel_at_failure = cancel;
        }
        if let Some(timeout) = parse_var(&lookup, "TM1_POLL_TIMEOUT")? {
            self.polling.timeout = timeout;
        }
        if let Some(interval) = parse_var(&lookup, "TM1_POLL_INTERVAL")? {
            self.polling.poll_interval = interval;
        }
        if let Some(level) = lookup("TM1_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(json) = parse_var(&lookup, "TM1_LOG_JSON")? {
            self.logging.json = json;
        }
        Ok(self)
    }

    /// Get connection configuration
    pub fn connection(&self) -> &ConnectionConfig {
        &self.connection
    }

    /// Get bulk defaults
    pub fn bulk(&self) -> &BulkConfig {
        &self.bulk
    }

    /// Get polling defaults
    pub fn polling(&self) -> &PollingConfig {
        &self.polling
    }

    /// Validate the entire configuration
    pub fn validate(&self) -> Result<()> {
        debug!("Validating configuration");

        self.connection
            .validate()
            .map_err(|e| Tm1Error::Config(format!("Connection config error: {}", e)))?;
        self.bulk
            .validate()
            .map_err(|e| Tm1Error::Config(format!("Bulk config error: {}", e)))?;
        self.polling
            .validate()
            .map_err(|e| Tm1Error::Config(format!("Polling config error: {}", e)))?;
        self.logging
            .validate()
            .map_err(|e| Tm1Error::Config(format!("Logging config error: {}", e)))?;

        debug!("Configuration validation completed");
        Ok(())
    }

    /// Merge with another configuration (other takes precedence)
    pub fn merge(mut self, other: Self) -> Self {
        self.connection = self.connection.merge(other.connection);
        if other.bulk != BulkConfig::default() {
            self.bulk = other.bulk;
        }
        if other.polling != PollingConfig::default() {
            self.polling = other.polling;
        }
        if other.logging != LoggingConfig::default() {
            self.logging = other.logging;
        }
        self
    }
}

fn parse_var<F, T>(lookup: &F, key: &str) -> Result<Option<T>>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|e| Tm1Error::Config(format!("Invalid value for {}: {}", key, e))),
        None => Ok(None),
    }
}
