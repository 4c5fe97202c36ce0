//! Validators for the configuration sections

use super::trait_def::Validate;
use crate::config::models::*;
use tracing::debug;
use url::Url;

impl Validate for ConnectionConfig {
    fn validate(&self) -> Result<(), String> {
        debug!("Validating connection configuration");

        if self.base_url.is_empty() {
            return Err("Base URL cannot be empty".to_string());
        }

        let url = Url::parse(&self.base_url)
            .map_err(|e| format!("Invalid base URL '{}': {}", self.base_url, e))?;
        match url.scheme() {
            "http" | "https" => {}
            scheme => {
                return Err(format!(
                    "Base URL must use http:// or https:// scheme, got: {}",
                    scheme
                ));
            }
        }

        if self.timeout == 0 {
            return Err("Timeout must be greater than 0".to_string());
        }

        if self.user.is_some() != self.password.is_some() {
            return Err("User and password must be set together".to_string());
        }

        Ok(())
    }
}

impl Validate for BulkConfig {
    fn validate(&self) -> Result<(), String> {
        if self.chunk_size == 0 {
            return Err("Chunk size must be greater than 0".to_string());
        }
        if self.max_retries > 10 {
            return Err("Max retries should not exceed 10".to_string());
        }
        Ok(())
    }
}

impl Validate for PollingConfig {
    fn validate(&self) -> Result<(), String> {
        if self.timeout == 0 {
            return Err("Poll timeout must be greater than 0".to_string());
        }
        if self.poll_interval > self.timeout {
            return Err(format!(
                "Poll interval ({}s) cannot exceed poll timeout ({}s)",
                self.poll_interval, self.timeout
            ));
        }
        Ok(())
    }
}

impl Validate for LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        tracing_subscriber::EnvFilter::try_new(&self.level)
            .map(|_| ())
            .map_err(|e| format!("Invalid log level '{}': {}", self.level, e))
    }
}
