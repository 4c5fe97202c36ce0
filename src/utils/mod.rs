//! Utility modules for the TM1 client
//!
//! - **error**: Error type and retry helpers
//! - **logging**: `tracing` subscriber setup
//! - **net**: HTTP client construction

pub mod error;
pub mod logging;
pub mod net;

pub use error::{Result, RetryConfig, RetryFailure, RetryPolicy, Tm1Error};

/// Truncate string to specified length with ellipsis
///
/// Cuts on a character boundary so multi-byte element names survive.
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Escape an object name for use inside an OData key literal (`Cubes('...')`)
///
/// Single quotes are doubled; characters that would end the path segment or
/// start a query are percent-encoded.
pub fn escape_odata_key(name: &str) -> String {
    let mut escaped = String::with_capacity(name.len());
    for c in name.chars() {
        match c {
            '\'' => escaped.push_str("''"),
            '%' => escaped.push_str("%25"),
            '#' => escaped.push_str("%23"),
            '?' => escaped.push_str("%3F"),
            '&' => escaped.push_str("%26"),
            '+' => escaped.push_str("%2B"),
            '/' => escaped.push_str("%2F"),
            _ => escaped.push(c),
        }
    }
    escaped
}
