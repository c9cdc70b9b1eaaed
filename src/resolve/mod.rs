//! Resource resolution subsystem.
//!
//! # Data Flow
//! ```text
//! query parameters (bytestream_url, filename)
//!     → resource.rs (parse & validate reference → LookupDescriptor)
//!     → filename.rs (derive display name, pluggable strategy)
//!     → endpoint.rs (dial address, port substitution, credentials)
//!     → handed to the stream bridge
//! ```
//!
//! All three steps are pure: no network activity happens until every
//! resolver has succeeded.

pub mod endpoint;
pub mod filename;
pub mod resource;

pub use endpoint::{resolve_endpoint, ResolvedEndpoint};
pub use filename::{derive_filename, DigestFilename, FilenameStrategy};
pub use resource::{resolve_resource, Credentials, LookupDescriptor, ResolveError};
