//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware, dispatch)
//!     → request.rs (request ID)
//!     → download.rs (resolve reference, open backend read, map errors)
//!     → bridge.rs (relay chunks into the response body)
//!     → Send to client
//! ```

pub mod bridge;
pub mod download;
pub mod request;
pub mod server;

pub use download::{DownloadError, DownloadParams};
pub use request::X_REQUEST_ID;
pub use server::{AppState, HttpServer};
