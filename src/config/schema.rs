//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the gateway.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the download gateway.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GatewayConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Backend read-service configuration (ports, downgrade policy).
    pub backend: BackendConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Backend read-service configuration.
///
/// The backend transport cannot negotiate a secure channel. A reference
/// declaring the secure port is therefore dialed on the plaintext port
/// instead, unless `allow_insecure_downgrade` is switched off, in which
/// case such references are rejected outright.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Plaintext service port referenced by the port substitution policy.
    pub plaintext_port: u16,

    /// Secure service port; references declaring it are downgraded or rejected.
    pub secure_port: u16,

    /// Substitute the plaintext port when a reference declares the secure
    /// port. When false, secure-port references fail validation instead.
    pub allow_insecure_downgrade: bool,

    /// Connection establishment timeout in seconds.
    pub connect_timeout_secs: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            plaintext_port: 1985,
            secure_port: 1986,
            allow_insecure_downgrade: true,
            connect_timeout_secs: 5,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_ports() {
        let config = GatewayConfig::default();
        assert_eq!(config.backend.plaintext_port, 1985);
        assert_eq!(config.backend.secure_port, 1986);
        assert!(config.backend.allow_insecure_downgrade);
    }

    #[test]
    fn minimal_toml_fills_defaults() {
        let config: GatewayConfig = toml::from_str("[backend]\nplaintext_port = 2000\n").unwrap();
        assert_eq!(config.backend.plaintext_port, 2000);
        assert_eq!(config.backend.secure_port, 1986);
        assert_eq!(config.listener.bind_address, "0.0.0.0:8080");
    }
}
