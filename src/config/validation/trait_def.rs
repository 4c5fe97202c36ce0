//! The `Validate` trait implemented by every configuration section

/// Checks a configuration section, returning a human readable reason on failure
pub trait Validate {
    fn validate(&self) -> Result<(), String>;
}
