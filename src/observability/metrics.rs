//! Metrics collection and exposition.
//!
//! # Metrics
//! - `gateway_requests_total` (counter): download requests by status
//! - `gateway_request_duration_seconds` (histogram): time to first byte
//! - `gateway_relays_total` (counter): finished relays by outcome
//! - `gateway_bytes_streamed_total` (counter): body bytes relayed
//! - `gateway_relay_duration_seconds` (histogram): full relay duration

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, describe_counter, describe_histogram, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter on the given address.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => {
            describe_counter!("gateway_requests_total", "Download requests by status");
            describe_histogram!(
                "gateway_request_duration_seconds",
                "Time from request receipt to response start"
            );
            describe_counter!("gateway_relays_total", "Finished relays by outcome");
            describe_counter!("gateway_bytes_streamed_total", "Body bytes relayed");
            describe_histogram!("gateway_relay_duration_seconds", "Full relay duration");
            tracing::info!(address = %addr, "Metrics exporter listening");
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to install metrics exporter");
        }
    }
}

/// Record a download request once its response status is known.
pub fn record_download(status: u16, started: Instant) {
    counter!("gateway_requests_total", "status" => status.to_string()).increment(1);
    histogram!("gateway_request_duration_seconds").record(started.elapsed().as_secs_f64());
}

/// Record the outcome of a relay once its stream ends.
pub fn record_relay(bytes: u64, complete: bool, started: Instant) {
    let outcome = if complete { "complete" } else { "truncated" };
    counter!("gateway_relays_total", "outcome" => outcome).increment(1);
    counter!("gateway_bytes_streamed_total").increment(bytes);
    histogram!("gateway_relay_duration_seconds").record(started.elapsed().as_secs_f64());
}
