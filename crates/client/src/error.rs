use api_types::MonitorDecodeError;
use reqwest::Method;

use crate::transport::TransportError;

/// Convenience alias used throughout the client.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors returned by [`crate::Client`].
///
/// Nothing is retried: each variant reaches the caller as soon as it occurs.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The configured base URL could not be parsed.
    #[error("invalid base url `{url}`: {source}")]
    InvalidBaseUrl {
        /// Offending input
        url: String,
        /// Parse failure
        #[source]
        source: url::ParseError,
    },
    /// The request body could not be serialized.
    #[error("failed to encode request body: {0}")]
    Encode(#[source] serde_json::Error),
    /// The transport failed before a response was received.
    #[error("{method} {path} failed: {source}")]
    Transport {
        /// Request method
        method: Method,
        /// Request path including query
        path: String,
        /// Transport failure
        #[source]
        source: TransportError,
    },
    /// The service answered with anything other than `200 OK`.
    #[error("{method} {path} returned status {status}, expected 200")]
    Status {
        /// Request method
        method: Method,
        /// Request path including query
        path: String,
        /// Received status code
        status: u16,
    },
    /// The response body is not the expected JSON envelope.
    #[error("malformed response body: {0}")]
    Json(#[source] serde_json::Error),
    /// A monitor in a list response could not be decoded.
    #[error("failed to decode monitor at index {index}: {source}")]
    Decode {
        /// Position of the offending element
        index: usize,
        /// Why it failed
        #[source]
        source: MonitorDecodeError,
    },
}

impl Error {
    /// Status code for [`Error::Status`].
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}
