//! Backend dial-address resolution.
//!
//! # Responsibilities
//! - Apply the secure→plaintext port substitution policy
//! - Compute the outbound credential authority when the reference embeds one
//! - Keep the security-relevant data path explicit: credentials flow in from
//!   the resource resolver, never re-derived from strings
//!
//! The backend transport does not support secure channel negotiation, so a
//! caller-declared secure endpoint is dialed on the configured plaintext
//! port instead. This is a documented limitation, controlled by
//! `backend.allow_insecure_downgrade`.

use crate::config::BackendConfig;
use crate::resolve::resource::{LookupDescriptor, ResolveError};

/// Final dial target for a backend read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedEndpoint {
    pub host: String,
    pub port: u16,
    /// `user:pass@host` authority when the reference embedded credentials.
    pub authority: Option<String>,
}

impl ResolvedEndpoint {
    /// The `host:port` address to connect to.
    pub fn dial_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Compute the dial address for a validated descriptor.
///
/// A reference with no explicit port dials the plaintext port. No host
/// rewriting ever occurs.
pub fn resolve_endpoint(
    descriptor: &LookupDescriptor,
    backend: &BackendConfig,
) -> Result<ResolvedEndpoint, ResolveError> {
    let declared = descriptor.port.unwrap_or(backend.plaintext_port);

    let port = if declared == backend.secure_port {
        if !backend.allow_insecure_downgrade {
            return Err(ResolveError::DowngradeRefused(declared));
        }
        tracing::debug!(
            host = %descriptor.host,
            declared_port = declared,
            plaintext_port = backend.plaintext_port,
            "Secure port declared; substituting plaintext port"
        );
        backend.plaintext_port
    } else {
        declared
    };

    let authority = descriptor.credentials.as_ref().map(|c| match &c.password {
        Some(password) => format!("{}:{}@{}", c.user, password, descriptor.host),
        None => format!("{}@{}", c.user, descriptor.host),
    });

    Ok(ResolvedEndpoint {
        host: descriptor.host.clone(),
        port,
        authority,
    })
}
