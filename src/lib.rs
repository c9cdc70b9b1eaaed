//! Bytestream-to-HTTP Download Gateway Library

pub mod bytestream;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod resolve;

pub use config::GatewayConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
