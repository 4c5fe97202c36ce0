//! Server connection configuration

use super::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

/// Where and how to reach the TM1 REST API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectionConfig {
    /// Base URL of the REST API, e.g. `https://tm1:8010/api/v1/`
    #[serde(default)]
    pub base_url: String,
    /// User for basic authentication
    #[serde(default)]
    pub user: Option<String>,
    /// Password for basic authentication
    #[serde(default)]
    pub password: Option<String>,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout: u64,
    /// Connect timeout in seconds
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout: u64,
    /// Verify the server TLS certificate
    #[serde(default = "default_true")]
    pub verify_tls: bool,
    /// User agent sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Extra headers sent with every request
    #[serde(default)]
    pub headers: HashMap<String, String>,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            user: None,
            password: None,
            timeout: default_timeout(),
            connect_timeout: default_connect_timeout(),
            verify_tls: true,
            user_agent: default_user_agent(),
            headers: HashMap::new(),
        }
    }
}

impl ConnectionConfig {
    pub fn timeout_duration(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }

    pub fn connect_timeout_duration(&self) -> Duration {
        Duration::from_secs(self.connect_timeout)
    }

    /// Merge with another configuration, `other` wins where it is set
    pub fn merge(mut self, other: Self) -> Self {
        if !other.base_url.is_empty() {
            self.base_url = other.base_url;
        }
        if other.user.is_some() {
            self.user = other.user;
        }
        if other.password.is_some() {
            self.password = other.password;
        }
        if other.timeout != default_timeout() {
            self.timeout = other.timeout;
        }
        if other.connect_timeout != default_connect_timeout() {
            self.connect_timeout = other.connect_timeout;
        }
        if !other.verify_tls {
            self.verify_tls = false;
        }
        if other.user_agent != default_user_agent() {
            self.user_agent = other.user_agent;
        }
        self.headers.extend(other.headers);
        self
    }
}
