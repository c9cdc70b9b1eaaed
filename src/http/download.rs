//! The download endpoint: bytestream reference in, streamed file out.
//!
//! Error mapping happens at this boundary and nowhere else: validation
//! failures are client errors, connect failures are service-unavailable,
//! stream-open failures are internal errors. No layer below retries or
//! recovers.

use std::time::Instant;

use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::Deserialize;
use thiserror::Error;

use crate::bytestream::{ReadError, ReadRequest};
use crate::http::bridge;
use crate::http::request;
use crate::http::server::AppState;
use crate::observability::metrics;
use crate::resolve::{resolve_endpoint, resolve_resource, ResolveError};

/// Query parameters accepted by the download endpoint.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct DownloadParams {
    /// Resource reference; must start with `bytestream://`.
    pub bytestream_url: String,
    /// Optional hint for the derived filename.
    pub filename: String,
}

/// Errors surfaced by the download path.
#[derive(Debug, Error)]
pub enum DownloadError {
    /// Bad or missing resource reference; no network activity happened.
    #[error("{0}")]
    Validation(#[from] ResolveError),

    /// The backend endpoint could not be reached.
    #[error("{0}")]
    Connect(String),

    /// The backend accepted the connection but the read could not be opened.
    #[error("{0}")]
    Stream(String),
}

impl DownloadError {
    pub fn status(&self) -> StatusCode {
        match self {
            DownloadError::Validation(_) => StatusCode::BAD_REQUEST,
            DownloadError::Connect(_) => StatusCode::SERVICE_UNAVAILABLE,
            DownloadError::Stream(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ReadError> for DownloadError {
    fn from(err: ReadError) -> Self {
        match &err {
            ReadError::Connect { .. } => DownloadError::Connect(err.to_string()),
            ReadError::Open { .. } => DownloadError::Stream(err.to_string()),
        }
    }
}

/// Handle a download request by looking the object up in the backend read
/// service and relaying it.
pub async fn download_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<DownloadParams>,
) -> Response {
    let started = Instant::now();
    let request_id = request::request_id(&headers).to_string();

    let descriptor = match resolve_resource(
        &params.bytestream_url,
        &params.filename,
        state.filenames.as_ref(),
    ) {
        Ok(descriptor) => descriptor,
        Err(err) => return fail(DownloadError::Validation(err), &request_id, started),
    };

    let endpoint = match resolve_endpoint(&descriptor, &state.backend) {
        Ok(endpoint) => endpoint,
        Err(err) => return fail(DownloadError::Validation(err), &request_id, started),
    };

    tracing::debug!(
        request_id = %request_id,
        dial_addr = %endpoint.dial_addr(),
        resource = %descriptor.read_key(),
        filename = %descriptor.derived_filename,
        "Opening backend read"
    );

    let read = ReadRequest::full(descriptor.read_key());
    let chunks = match state.source.open_read(&endpoint, read).await {
        Ok(chunks) => chunks,
        Err(err) => return fail(err.into(), &request_id, started),
    };

    metrics::record_download(StatusCode::OK.as_u16(), started);
    bridge::streamed_attachment(&descriptor.derived_filename, chunks, request_id, started)
}

fn fail(err: DownloadError, request_id: &str, started: Instant) -> Response {
    let status = err.status();
    tracing::warn!(
        request_id = %request_id,
        status = %status,
        error = %err,
        "Download failed"
    );
    metrics::record_download(status.as_u16(), started);
    (status, err.to_string()).into_response()
}
