//! `reqwest`-backed transport

use super::types::{HttpMethod, RestRequest, RestResponse};
use super::Transport;
use crate::config::ConnectionConfig;
use crate::utils::error::{Result, Tm1Error};
use crate::utils::net::build_http_client;
use crate::utils::truncate_string;
use async_trait::async_trait;
use reqwest::{Client, Method};
use serde_json::Value;
use std::collections::HashMap;
use tracing::{debug, warn};
use url::Url;

/// Longest server message kept in an error
const MAX_ERROR_MESSAGE_LEN: usize = 500;

/// Transport that talks HTTP to a TM1 server
#[derive(Debug, Clone)]
pub struct RestTransport {
    client: Client,
    base_url: Url,
    credentials: Option<(String, String)>,
}

impl RestTransport {
    /// Create a transport from connection settings
    pub fn new(config: &ConnectionConfig) -> Result<Self> {
        let client = build_http_client(config)?;
        Self::with_client(client, config)
    }

    /// Create a transport reusing an existing client
    pub fn with_client(client: Client, config: &ConnectionConfig) -> Result<Self> {
        let base_url = normalize_base_url(&config.base_url)?;
        let credentials = match (&config.user, &config.password) {
            (Some(user), Some(password)) => Some((user.clone(), password.clone())),
            _ => None,
        };

        Ok(Self {
            client,
            base_url,
            credentials,
        })
    }

    /// API root all request paths are resolved against
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolve a relative path against the API root
    pub fn url_for(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| {
                Tm1Error::invalid_request(format!("Invalid request path '{}': {}", path, e))
            })
    }
}

#[async_trait]
impl Transport for RestTransport {
    async fn execute(&self, request: RestRequest) -> Result<RestResponse> {
        let url = self.url_for(&request.path)?;
        debug!(method = %request.method, url = %url, "Sending request");

        let method = match request.method {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
            HttpMethod::Patch => Method::PATCH,
            HttpMethod::Delete => Method::DELETE,
        };

        let mut builder = self.client.request(method, url);
        if let Some((user, password)) = &self.credentials {
            builder = builder.basic_auth(user, Some(password));
        }
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let headers: HashMap<String, String> = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_ascii_lowercase(), v.to_string()))
            })
            .collect();
        let text = response.text().await?;

        if !(200..300).contains(&status) {
            let message = extract_error_message(&text);
            warn!(status, path = %request.path, "Remote call failed: {}", message);
            return Err(Tm1Error::RemoteCall { status, message });
        }

        Ok(RestResponse {
            status,
            headers,
            body: parse_body(&text),
        })
    }
}

/// Ensure the base URL parses and ends with `/` so relative joins append
fn normalize_base_url(raw: &str) -> Result<Url> {
    let with_slash = if raw.ends_with('/') {
        raw.to_string()
    } else {
        format!("{}/", raw)
    };
    Url::parse(&with_slash)
        .map_err(|e| Tm1Error::Config(format!("Invalid base URL '{}': {}", raw, e)))
}

fn parse_body(text: &str) -> Value {
    if text.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()))
}

/// Pull `error.message` out of an OData error body, falling back to the raw text
fn extract_error_message(text: &str) -> String {
    let message = serde_json::from_str::<Value>(text)
        .ok()
        .and_then(|body| {
            body.pointer("/error/message")
                .and_then(Value::as_str)
                .map(str::to_string)
        })
        .unwrap_or_else(|| text.trim().to_string());
    truncate_string(&message, MAX_ERROR_MESSAGE_LEN)
}
