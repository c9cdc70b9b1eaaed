//! HTTP/1.1 transport for backend reads.
//!
//! Dials a fresh TCP connection per read, performs a hyper client handshake
//! and issues `GET /<resource_key>`. A non-zero offset or a length limit is
//! expressed as a `Range` header; when the reference embedded credentials
//! the request authority reflects them. The response body's data frames are
//! the chunk stream.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use futures_util::TryStreamExt;
use http_body_util::{BodyDataStream, Empty};
use hyper::client::conn::http1;
use hyper::header;
use hyper::{Method, Request};
use hyper_util::rt::TokioIo;
use tokio::net::TcpStream;

use crate::bytestream::source::{
    ByteStreamSource, ChunkError, ChunkStream, ReadError, ReadRequest,
};
use crate::resolve::ResolvedEndpoint;

/// Production [`ByteStreamSource`] speaking plaintext HTTP/1.1.
pub struct HttpByteStreamSource {
    connect_timeout: Duration,
}

impl HttpByteStreamSource {
    pub fn new(connect_timeout: Duration) -> Self {
        Self { connect_timeout }
    }
}

#[async_trait]
impl ByteStreamSource for HttpByteStreamSource {
    async fn open_read(
        &self,
        endpoint: &ResolvedEndpoint,
        request: ReadRequest,
    ) -> Result<ChunkStream, ReadError> {
        let addr = endpoint.dial_addr();

        let stream = tokio::time::timeout(self.connect_timeout, TcpStream::connect(&addr))
            .await
            .map_err(|_| ReadError::Connect {
                addr: addr.clone(),
                message: format!("connect timed out after {:?}", self.connect_timeout),
            })?
            .map_err(|e| ReadError::Connect {
                addr: addr.clone(),
                message: e.to_string(),
            })?;

        let (mut sender, conn) = http1::handshake(TokioIo::new(stream))
            .await
            .map_err(|e| ReadError::Open {
                resource: request.resource.clone(),
                message: format!("handshake failed: {e}"),
            })?;

        // Drives connection I/O; finishes once the chunk stream is dropped
        // or the body is read to completion.
        tokio::spawn(async move {
            if let Err(e) = conn.await {
                tracing::debug!(error = %e, "Backend connection closed with error");
            }
        });

        let authority = endpoint
            .authority
            .clone()
            .unwrap_or_else(|| addr.clone());

        let mut builder = Request::builder()
            .method(Method::GET)
            .uri(format!("/{}", request.resource))
            .header(header::HOST, authority);
        if let Some(range) = range_header(&request) {
            builder = builder.header(header::RANGE, range);
        }
        let outbound = builder
            .body(Empty::<Bytes>::new())
            .map_err(|e| ReadError::Open {
                resource: request.resource.clone(),
                message: e.to_string(),
            })?;

        let response = sender
            .send_request(outbound)
            .await
            .map_err(|e| ReadError::Open {
                resource: request.resource.clone(),
                message: e.to_string(),
            })?;

        if !response.status().is_success() {
            return Err(ReadError::Open {
                resource: request.resource,
                message: format!("backend returned {}", response.status()),
            });
        }

        let chunks = BodyDataStream::new(response.into_body())
            .map_err(|e| ChunkError(e.to_string()));
        Ok(Box::pin(chunks))
    }
}

/// `Range` header for a non-default read window, if one is needed.
fn range_header(request: &ReadRequest) -> Option<String> {
    // A limit of zero means "no limit", matching the read contract.
    let limit = request.limit.filter(|l| *l > 0);
    match (request.offset, limit) {
        (0, None) => None,
        (offset, None) => Some(format!("bytes={offset}-")),
        (offset, Some(limit)) => Some(format!("bytes={}-{}", offset, offset + limit - 1)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_read_needs_no_range() {
        assert_eq!(range_header(&ReadRequest::full("k")), None);
    }

    #[test]
    fn offset_and_limit_map_to_range() {
        let request = ReadRequest {
            resource: "k".into(),
            offset: 10,
            limit: None,
        };
        assert_eq!(range_header(&request).as_deref(), Some("bytes=10-"));

        let request = ReadRequest {
            resource: "k".into(),
            offset: 10,
            limit: Some(5),
        };
        assert_eq!(range_header(&request).as_deref(), Some("bytes=10-14"));
    }

    #[test]
    fn zero_limit_means_unbounded() {
        let request = ReadRequest {
            resource: "k".into(),
            offset: 0,
            limit: Some(0),
        };
        assert_eq!(range_header(&request), None);
    }
}
