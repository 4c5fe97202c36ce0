//! Transport layer
//!
//! The narrow request interface every service is written against. The
//! REST implementation talks to a TM1 server through `reqwest`; tests swap
//! in in-memory transports.

mod rest;
mod types;

pub use rest::RestTransport;
pub use types::{HttpMethod, RestRequest, RestResponse};

use crate::utils::error::Result;
use async_trait::async_trait;
use serde_json::Value;

/// Authenticated request/response access to the REST API
///
/// Paths are relative to the API root (e.g. `Cubes('Sales')/Dimensions`).
/// Implementations return `Tm1Error::RemoteCall` for non-2xx answers.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Execute a request
    async fn execute(&self, request: RestRequest) -> Result<RestResponse>;

    async fn get(&self, path: &str) -> Result<RestResponse> {
        self.execute(RestRequest::new(HttpMethod::Get, path)).await
    }

    async fn post(&self, path: &str, body: Value) -> Result<RestResponse> {
        self.execute(RestRequest::new(HttpMethod::Post, path).with_body(body))
            .await
    }

    /// POST with extra request headers
    async fn post_with_headers(
        &self,
        path: &str,
        body: Value,
        headers: &[(&str, &str)],
    ) -> Result<RestResponse> {
        let request = headers.iter().fold(
            RestRequest::new(HttpMethod::Post, path).with_body(body),
            |request, (name, value)| request.with_header(*name, *value),
        );
        self.execute(request).await
    }

    async fn patch(&self, path: &str, body: Value) -> Result<RestResponse> {
        self.execute(RestRequest::new(HttpMethod::Patch, path).with_body(body))
            .await
    }

    async fn delete(&self, path: &str) -> Result<RestResponse> {
        self.execute(RestRequest::new(HttpMethod::Delete, path)).await
    }
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for std::sync::Arc<T> {
    async fn execute(&self, request: RestRequest) -> Result<RestResponse> {
        (**self).execute(request).await
    }
}
