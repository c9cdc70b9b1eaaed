//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → GatewayConfig (validated, immutable)
//!     → shared by value / Arc with all subsystems
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; there is no reload path
//! - All fields have defaults so a minimal (or absent) config file works
//! - Validation separates syntactic (serde) from semantic checks
//! - Backend ports are injected into the endpoint resolver at construction,
//!   never read from process-global state at request time

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::{BackendConfig, GatewayConfig, ListenerConfig, ObservabilityConfig};
