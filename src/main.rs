//! Bytestream-to-HTTP Download Gateway
//!
//! Bridges a plain HTTP download endpoint to a remote streaming object-read
//! service addressed by `bytestream://` references, so clients without a
//! streaming-RPC client (browsers, curl) can fetch build logs and artifacts.
//!
//! # Architecture Overview
//!
//! ```text
//!                   ┌────────────────────────────────────────────────────┐
//!                   │                      GATEWAY                       │
//!                   │                                                    │
//!   GET /file/download?bytestream_url=...&filename=...                   │
//!   ────────────────┼─▶ http/server ──▶ resolve/resource ──┐             │
//!                   │                                      ▼             │
//!                   │                  resolve/filename  resolve/        │
//!                   │                        │           endpoint        │
//!                   │                        ▼              │            │
//!   200 streamed    │                  http/bridge ◀── bytestream ◀──────┼── backend
//!   ◀───────────────┼── chunks in order, headers before first byte       │   read service
//!                   │                                                    │
//!                   │  Cross-cutting: config, observability, lifecycle   │
//!                   └────────────────────────────────────────────────────┘
//! ```
//!
//! Failure at any resolver stage short-circuits before a backend connection
//! is attempted; connect, stream-open and mid-stream failures are all
//! fail-fast with no retry.

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use bytestream_gateway::config::{self, GatewayConfig};
use bytestream_gateway::http::HttpServer;
use bytestream_gateway::lifecycle::Shutdown;
use bytestream_gateway::observability::{logging, metrics};

/// Command-line arguments.
#[derive(Debug, Parser)]
#[command(
    name = "bytestream-gateway",
    about = "HTTP download gateway for bytestream resources"
)]
struct Args {
    /// Path to the TOML configuration file. Defaults apply when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the configured listener bind address.
    #[arg(long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init("bytestream_gateway=debug,tower_http=debug");

    let args = Args::parse();
    let mut config = match &args.config {
        Some(path) => config::load_config(path)?,
        None => GatewayConfig::default(),
    };
    if let Some(bind) = args.bind {
        config.listener.bind_address = bind;
    }

    tracing::info!(
        bind_address = %config.listener.bind_address,
        plaintext_port = config.backend.plaintext_port,
        secure_port = config.backend.secure_port,
        allow_insecure_downgrade = config.backend.allow_insecure_downgrade,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => {
                tracing::error!(
                    metrics_address = %config.observability.metrics_address,
                    "Failed to parse metrics address"
                );
            }
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(
        address = %listener.local_addr()?,
        "Listening for connections"
    );

    let shutdown = Shutdown::new();
    let signal_shutdown = shutdown.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Ctrl+C received, shutting down");
            signal_shutdown.trigger();
        }
    });

    let server = HttpServer::new(config);
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
