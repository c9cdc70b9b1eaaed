//! Backend read collaborator contract.

use std::pin::Pin;

use async_trait::async_trait;
use bytes::Bytes;
use futures_util::Stream;
use thiserror::Error;

use crate::resolve::ResolvedEndpoint;

/// A streaming read request against the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadRequest {
    /// Backend object key (resource path, leading separator trimmed).
    pub resource: String,
    /// Byte offset to start reading from.
    pub offset: u64,
    /// Optional maximum number of bytes to read; `None` reads to the end.
    pub limit: Option<u64>,
}

impl ReadRequest {
    /// Full-object read for the given key (offset 0, no length limit).
    pub fn full(resource: impl Into<String>) -> Self {
        Self {
            resource: resource.into(),
            offset: 0,
            limit: None,
        }
    }
}

/// Failure opening a backend read, before any data was produced.
#[derive(Debug, Error)]
pub enum ReadError {
    /// The backend endpoint could not be reached.
    #[error("backend connect failed for {addr}: {message}")]
    Connect { addr: String, message: String },

    /// The backend accepted the connection but refused or failed the read.
    #[error("backend read open failed for '{resource}': {message}")]
    Open { resource: String, message: String },
}

/// Failure while receiving chunks from an already-open read.
#[derive(Debug, Error)]
#[error("backend stream failed: {0}")]
pub struct ChunkError(pub String);

/// Ordered chunk sequence terminated by end-of-stream.
pub type ChunkStream = Pin<Box<dyn Stream<Item = Result<Bytes, ChunkError>> + Send>>;

/// Streaming object-read collaborator.
///
/// One open call per request. The returned stream yields chunks in the order
/// the backend produced them and ends with either a clean end-of-stream or a
/// terminal [`ChunkError`]; there is no retry or resumption. The stream owns
/// whatever connection backs it and releases it on drop, so dropping the
/// stream (client disconnect) promptly aborts the backend read.
#[async_trait]
pub trait ByteStreamSource: Send + Sync {
    async fn open_read(
        &self,
        endpoint: &ResolvedEndpoint,
        request: ReadRequest,
    ) -> Result<ChunkStream, ReadError>;
}
