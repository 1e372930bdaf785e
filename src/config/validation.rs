//! Configuration validation.
//!
//! Validates configuration at startup to catch common errors early.

use super::Config;
use thiserror::Error;

/// Validation errors for configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("server.name is required")]
    MissingServerName,
    #[error("limits.outbound_queue must be at least 1")]
    ZeroOutboundQueue,
    #[error("limits.event_queue must be at least 1")]
    ZeroEventQueue,
}

/// Validate a configuration, returning all errors found.
pub fn validate(config: &Config) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.server.name.trim().is_empty() {
        errors.push(ValidationError::MissingServerName);
    }

    // tokio channels panic on zero capacity
    if config.limits.outbound_queue == 0 {
        errors.push(ValidationError::ZeroOutboundQueue);
    }
    if config.limits.event_queue == 0 {
        errors.push(ValidationError::ZeroEventQueue);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
