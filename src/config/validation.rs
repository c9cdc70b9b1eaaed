//! Semantic configuration validation.
//!
//! Serde covers syntax; this module checks the cross-field constraints it
//! cannot express.

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::GatewayConfig;

/// A single semantic validation failure.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("listener.bind_address '{0}' is not a valid socket address")]
    BadBindAddress(String),

    #[error("backend.{0} must be non-zero")]
    ZeroPort(&'static str),

    #[error("backend.plaintext_port and backend.secure_port must differ (both {0})")]
    PortClash(u16),

    #[error("observability.metrics_address '{0}' is not a valid socket address")]
    BadMetricsAddress(String),
}

/// Validate a deserialized configuration.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BadBindAddress(
            config.listener.bind_address.clone(),
        ));
    }

    if config.backend.plaintext_port == 0 {
        errors.push(ValidationError::ZeroPort("plaintext_port"));
    }
    if config.backend.secure_port == 0 {
        errors.push(ValidationError::ZeroPort("secure_port"));
    }
    // The substitution policy cannot tell the ports apart otherwise.
    if config.backend.plaintext_port != 0
        && config.backend.plaintext_port == config.backend.secure_port
    {
        errors.push(ValidationError::PortClash(config.backend.plaintext_port));
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::BadMetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
