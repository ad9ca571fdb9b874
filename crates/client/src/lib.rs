//! Client crate: Mackerel host inventory and monitor endpoints.
#![allow(clippy::uninlined_format_args)]
/// API client
pub mod client;
/// Response envelope and monitor list decoding
pub mod decode;
/// Error types
pub mod error;
/// Query string construction
pub mod query;
/// HTTP transport abstraction
pub mod transport;

pub use api_types;
pub use client::{API_PREFIX, Client, DEFAULT_BASE_URL};
pub use decode::decode_monitors;
pub use error::{Error, Result};
pub use query::find_hosts_query;
pub use transport::{HttpTransport, RawResponse, Transport, TransportError};
