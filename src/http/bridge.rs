//! Stream bridge: relays an open backend read into the HTTP response body.
//!
//! # Responsibilities
//! - Set the attachment headers exactly once, before the first body byte
//! - Relay chunks in the order received, flushing incrementally (memory use
//!   is bounded by chunk size, arbitrarily large objects work)
//! - Account for relayed bytes and record the outcome when the stream ends
//!
//! Non-atomic streaming contract: bytes already flushed cannot be retracted.
//! A mid-stream failure truncates the response body with no corrective
//! action — at most one attempt, no resumption. Clients must detect
//! truncation from transport-level short-read / connection-reset signaling;
//! no truncation marker is written into the body.

use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Instant;

use axum::body::Body;
use axum::http::{header, HeaderValue, Response};
use bytes::Bytes;
use futures_util::Stream;

use crate::bytestream::{ChunkError, ChunkStream};
use crate::observability::metrics;

/// Build the streamed attachment response for an already-open backend read.
pub fn streamed_attachment(
    filename: &str,
    chunks: ChunkStream,
    request_id: String,
    started: Instant,
) -> Response<Body> {
    let relay = RelayStream::new(chunks, request_id, started);

    let disposition = format!("attachment; filename={filename}");
    let disposition = HeaderValue::from_str(&disposition)
        .unwrap_or_else(|_| HeaderValue::from_static("attachment"));

    let mut response = Response::new(Body::from_stream(relay));
    response.headers_mut().insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/octet-stream"),
    );
    response
        .headers_mut()
        .insert(header::CONTENT_DISPOSITION, disposition);
    response
}

/// Chunk stream wrapper that preserves arrival order and accounts for the
/// relay's outcome.
struct RelayStream {
    inner: ChunkStream,
    request_id: String,
    started: Instant,
    bytes_relayed: u64,
    chunks_relayed: u64,
    finished: bool,
}

impl RelayStream {
    fn new(inner: ChunkStream, request_id: String, started: Instant) -> Self {
        Self {
            inner,
            request_id,
            started,
            bytes_relayed: 0,
            chunks_relayed: 0,
            finished: false,
        }
    }
}

impl Stream for RelayStream {
    type Item = Result<Bytes, ChunkError>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        match this.inner.as_mut().poll_next(cx) {
            Poll::Ready(Some(Ok(chunk))) => {
                this.bytes_relayed += chunk.len() as u64;
                this.chunks_relayed += 1;
                Poll::Ready(Some(Ok(chunk)))
            }
            Poll::Ready(Some(Err(err))) => {
                if !this.finished {
                    this.finished = true;
                    tracing::error!(
                        request_id = %this.request_id,
                        bytes = this.bytes_relayed,
                        error = %err,
                        "Backend stream failed mid-relay; response truncated"
                    );
                    metrics::record_relay(this.bytes_relayed, false, this.started);
                }
                Poll::Ready(Some(Err(err)))
            }
            Poll::Ready(None) => {
                if !this.finished {
                    this.finished = true;
                    tracing::debug!(
                        request_id = %this.request_id,
                        bytes = this.bytes_relayed,
                        chunks = this.chunks_relayed,
                        "Relay complete"
                    );
                    metrics::record_relay(this.bytes_relayed, true, this.started);
                }
                Poll::Ready(None)
            }
            Poll::Pending => Poll::Pending,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::stream;
    use http_body_util::BodyExt;

    fn scripted(chunks: Vec<Result<Bytes, ChunkError>>) -> ChunkStream {
        Box::pin(stream::iter(chunks))
    }

    /// Drain a response body frame by frame, reporting whether it failed.
    async fn read_body(mut body: Body) -> (Vec<u8>, bool) {
        let mut collected = Vec::new();
        loop {
            match body.frame().await {
                Some(Ok(frame)) => {
                    if let Some(data) = frame.data_ref() {
                        collected.extend_from_slice(data);
                    }
                }
                Some(Err(_)) => return (collected, true),
                None => return (collected, false),
            }
        }
    }

    fn response(chunks: Vec<Result<Bytes, ChunkError>>) -> Response<Body> {
        streamed_attachment("blob", scripted(chunks), "test".into(), Instant::now())
    }

    #[tokio::test]
    async fn headers_set_before_body() {
        let response = response(vec![Ok(Bytes::from_static(b"x"))]);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "application/octet-stream"
        );
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=blob"
        );
    }

    #[tokio::test]
    async fn chunks_relayed_in_order_regardless_of_split() {
        let payload = b"the quick brown fox jumps over the lazy dog";
        for split in [1, 2, 3, 7, payload.len()] {
            let chunks = payload
                .chunks(split)
                .map(|c| Ok(Bytes::copy_from_slice(c)))
                .collect();
            let (body, failed) = read_body(response(chunks).into_body()).await;
            assert!(!failed);
            assert_eq!(body, payload, "split size {split}");
        }
    }

    #[tokio::test]
    async fn single_chunk_stream_relays() {
        let (body, failed) =
            read_body(response(vec![Ok(Bytes::from_static(b"Hello"))]).into_body()).await;
        assert!(!failed);
        assert_eq!(body, b"Hello");
    }

    #[tokio::test]
    async fn mid_stream_error_truncates_after_delivered_chunks() {
        let chunks = vec![
            Ok(Bytes::from_static(b"He")),
            Ok(Bytes::from_static(b"llo")),
            Err(ChunkError("backend went away".into())),
        ];
        let (body, failed) = read_body(response(chunks).into_body()).await;
        assert!(failed);
        assert_eq!(body, b"Hello", "exactly the delivered chunks, nothing more");
    }

    #[tokio::test]
    async fn unprintable_filename_falls_back_to_bare_attachment() {
        let response = streamed_attachment(
            "bad\nname",
            scripted(vec![]),
            "test".into(),
            Instant::now(),
        );
        assert_eq!(response.headers()[header::CONTENT_DISPOSITION], "attachment");
    }
}
