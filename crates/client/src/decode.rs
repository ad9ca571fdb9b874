use api_types::Monitor;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{Error, Result};

/// Decode a raw monitor list, preserving element order.
///
/// Stops at the first element that fails and reports its index.
pub fn decode_monitors(raw: Vec<Value>) -> Result<Vec<Monitor>> {
    raw.into_iter()
        .enumerate()
        .map(|(index, value)| {
            Monitor::from_value(value).map_err(|source| Error::Decode { index, source })
        })
        .collect()
}

/// Parse a response body into `T`.
pub(crate) fn parse_body<T: DeserializeOwned>(body: &[u8]) -> Result<T> {
    serde_json::from_slice(body).map_err(Error::Json)
}
