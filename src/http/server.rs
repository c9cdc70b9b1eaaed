//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum router with the download and health handlers
//! - Wire up middleware (tracing, request ID)
//! - Bind the server to a listener and serve with graceful shutdown
//!
//! Each request runs as its own Tokio task; the only cross-request state is
//! the read-only [`AppState`].

use std::sync::Arc;
use std::time::Duration;

use axum::routing::get;
use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::trace::TraceLayer;

use crate::bytestream::{ByteStreamSource, HttpByteStreamSource};
use crate::config::{BackendConfig, GatewayConfig};
use crate::http::download::download_handler;
use crate::http::request::{propagate_request_id_layer, set_request_id_layer};
use crate::resolve::{DigestFilename, FilenameStrategy};

/// Application state injected into handlers. Immutable for the process
/// lifetime; cloned per request by Axum.
#[derive(Clone)]
pub struct AppState {
    pub backend: BackendConfig,
    pub source: Arc<dyn ByteStreamSource>,
    pub filenames: Arc<dyn FilenameStrategy>,
}

/// HTTP server for the download gateway.
pub struct HttpServer {
    router: Router,
    config: GatewayConfig,
}

impl HttpServer {
    /// Create a server backed by the production HTTP read source.
    pub fn new(config: GatewayConfig) -> Self {
        let source = Arc::new(HttpByteStreamSource::new(Duration::from_secs(
            config.backend.connect_timeout_secs,
        )));
        Self::with_source(config, source)
    }

    /// Create a server over a custom read source. Tests use this to script
    /// the backend.
    pub fn with_source(config: GatewayConfig, source: Arc<dyn ByteStreamSource>) -> Self {
        let state = AppState {
            backend: config.backend.clone(),
            source,
            filenames: Arc::new(DigestFilename),
        };
        let router = Self::build_router(state);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(state: AppState) -> Router {
        Router::new()
            .route("/file/download", get(download_handler))
            .route("/healthz", get(healthz))
            .with_state(state)
            .layer(propagate_request_id_layer())
            .layer(TraceLayer::new_for_http())
            .layer(set_request_id_layer())
    }

    /// Consume the server, yielding its router. Used by in-process tests.
    pub fn into_router(self) -> Router {
        self.router
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// Run the server, accepting connections on the given listener until the
    /// shutdown signal fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Liveness probe.
async fn healthz() -> &'static str {
    "ok"
}
