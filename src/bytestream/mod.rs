//! Backend streaming-read subsystem.
//!
//! # Data Flow
//! ```text
//! ResolvedEndpoint + read key
//!     → source.rs (ByteStreamSource contract: open a read, get chunks)
//!     → http.rs (per-request TCP + HTTP/1.1 transport)
//!     → ordered chunk stream, consumed by the stream bridge
//! ```
//!
//! # Design Decisions
//! - The collaborator is a trait so tests can script the backend
//! - One connection per request; the chunk stream owns it and releases it
//!   on drop, on every exit path
//! - Connect failures and read-open failures are distinct error phases

pub mod http;
pub mod source;

pub use http::HttpByteStreamSource;
pub use source::{ByteStreamSource, ChunkError, ChunkStream, ReadError, ReadRequest};
