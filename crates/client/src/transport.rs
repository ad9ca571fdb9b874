use std::fmt;

use async_trait::async_trait;
use reqwest::{
    Client as HttpClient, Method,
    header::{ACCEPT, CONTENT_TYPE, USER_AGENT},
};
use url::Url;

/// Error produced by a [`Transport`] when no response could be obtained.
pub type TransportError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Header carrying the API key.
pub const API_KEY_HEADER: &str = "X-Api-Key";

const USER_AGENT_VALUE: &str = concat!("mackerel-client-rs/", env!("CARGO_PKG_VERSION"));

/// Status and body of a completed HTTP exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    /// HTTP status code
    pub status: u16,
    /// Fully read response body
    pub body: Vec<u8>,
}

/// Sends one request and reads the whole response.
///
/// `path` is absolute (starts with `/`) and may carry a query string. `body`,
/// when present, is a serialized JSON document.
#[async_trait]
pub trait Transport: Send + Sync + fmt::Debug {
    /// Perform the request.
    async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<Vec<u8>>,
    ) -> Result<RawResponse, TransportError>;
}

/// [`Transport`] backed by `reqwest`, authenticating with an API key.
#[derive(Clone)]
pub struct HttpTransport {
    http: HttpClient,
    base_url: Url,
    api_key: String,
}

impl HttpTransport {
    /// Create a transport sending requests to `base_url`.
    pub fn new(api_key: String, base_url: Url) -> Self {
        Self { http: HttpClient::new(), base_url, api_key }
    }

    /// Use a preconfigured `reqwest` client (proxies, timeouts, TLS).
    pub fn with_http_client(mut self, http: HttpClient) -> Self {
        self.http = http;
        self
    }

    /// Base URL requests are resolved against.
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn url_for(&self, path: &str) -> Result<Url, url::ParseError> {
        self.base_url.join(path)
    }
}

impl fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpTransport")
            .field("base_url", &self.base_url.as_str())
            .field("api_key", &"<redacted>")
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<Vec<u8>>,
    ) -> Result<RawResponse, TransportError> {
        let url = self.url_for(path)?;
        let mut rb = self
            .http
            .request(method, url)
            .header(API_KEY_HEADER, &self.api_key)
            .header(ACCEPT, "application/json")
            .header(USER_AGENT, USER_AGENT_VALUE);
        if let Some(body) = body {
            rb = rb.header(CONTENT_TYPE, "application/json").body(body);
        }

        let resp = rb.send().await?;
        let status = resp.status().as_u16();
        let body = resp.bytes().await?.to_vec();
        Ok(RawResponse { status, body })
    }
}
