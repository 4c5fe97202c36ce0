//! Networking utilities

pub mod http;

pub use http::build_http_client;
