//! HTTP client construction
//!
//! Builds the `reqwest` client used by the REST transport from a
//! [`ConnectionConfig`]. One client is created per transport so connections
//! are pooled across every call made through it.

use crate::config::ConnectionConfig;
use crate::utils::error::{Result, Tm1Error};
use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, ClientBuilder};
use std::time::Duration;
use tracing::debug;

/// Idle connection timeout
const POOL_IDLE_TIMEOUT: Duration = Duration::from_secs(90);

/// Maximum idle connections per host
const POOL_MAX_IDLE_PER_HOST: usize = 10;

/// Headers every TM1 request carries, plus the configured extras
pub fn default_headers(config: &ConnectionConfig) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json;odata.metadata=none"));
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json; charset=utf-8"));
    headers.insert(
        HeaderName::from_static("tm1-sessioncontext"),
        HeaderValue::from_static("tm1-rs"),
    );

    for (key, value) in &config.headers {
        let name = HeaderName::from_bytes(key.as_bytes())
            .map_err(|e| Tm1Error::Config(format!("Invalid header name '{}': {}", key, e)))?;
        let value = HeaderValue::from_str(value)
            .map_err(|e| Tm1Error::Config(format!("Invalid header value for '{}': {}", key, e)))?;
        headers.insert(name, value);
    }

    Ok(headers)
}

/// Build the HTTP client for a connection
pub fn build_http_client(config: &ConnectionConfig) -> Result<Client> {
    debug!(
        timeout_secs = config.timeout,
        verify_tls = config.verify_tls,
        "Building HTTP client"
    );

    ClientBuilder::new()
        .pool_max_idle_per_host(POOL_MAX_IDLE_PER_HOST)
        .pool_idle_timeout(POOL_IDLE_TIMEOUT)
        .timeout(config.timeout_duration())
        .connect_timeout(config.connect_timeout_duration())
        .tcp_nodelay(true)
        .cookie_store(true)
        .danger_accept_invalid_certs(!config.verify_tls)
        .user_agent(config.user_agent.as_str())
        .default_headers(default_headers(config)?)
        .build()
        .map_err(|e| Tm1Error::Config(format!("Failed to build HTTP client: {}", e)))
}
