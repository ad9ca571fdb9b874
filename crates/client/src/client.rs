use api_types::{CreateHostParam, FindHostsParam, Host, HostStatus, Monitor, UpdateHostParam};
use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;
use url::{Url, form_urlencoded};

use crate::{
    decode::{decode_monitors, parse_body},
    error::{Error, Result},
    query::find_hosts_query,
    transport::{HttpTransport, Transport},
};

/// Default API endpoint.
pub const DEFAULT_BASE_URL: &str = "https://mackerel.io";

/// Path prefix shared by every endpoint.
pub const API_PREFIX: &str = "/api/v0";

/// Client for the Mackerel host and monitor APIs.
///
/// Holds no per-call state; clone it freely or share it between tasks.
#[derive(Debug, Clone)]
pub struct Client<T = HttpTransport> {
    transport: T,
    verbose: bool,
}

impl Client {
    /// Create a client talking to [`DEFAULT_BASE_URL`].
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_options(api_key, DEFAULT_BASE_URL, false)
    }

    /// Create a client for a custom endpoint. With `verbose`, request and
    /// response bodies are logged at debug level.
    pub fn with_options(api_key: impl Into<String>, base_url: &str, verbose: bool) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|source| Error::InvalidBaseUrl { url: base_url.to_owned(), source })?;
        Ok(Self::with_base_url(api_key, base_url, verbose))
    }

    /// Like [`Client::with_options`] for an already parsed URL.
    pub fn with_base_url(api_key: impl Into<String>, base_url: Url, verbose: bool) -> Self {
        Self::from_transport(HttpTransport::new(api_key.into(), base_url), verbose)
    }
}

impl<T: Transport> Client<T> {
    /// Create a client on top of an arbitrary transport.
    pub const fn from_transport(transport: T, verbose: bool) -> Self {
        Self { transport, verbose }
    }

    /// The underlying transport.
    pub const fn transport(&self) -> &T {
        &self.transport
    }

    /// Fetch a single host.
    pub async fn find_host(&self, id: &str) -> Result<Host> {
        #[derive(Deserialize)]
        struct Resp {
            host: Host,
        }
        let body = self.call(Method::GET, &host_path(id, ""), None).await?;
        Ok(parse_body::<Resp>(&body)?.host)
    }

    /// Search hosts. An empty filter lists every host.
    pub async fn find_hosts(&self, param: &FindHostsParam) -> Result<Vec<Host>> {
        #[derive(Deserialize)]
        struct Resp {
            hosts: Vec<Host>,
        }
        let query = find_hosts_query(param);
        let path = if query.is_empty() {
            format!("{API_PREFIX}/hosts.json")
        } else {
            format!("{API_PREFIX}/hosts.json?{query}")
        };
        let body = self.call(Method::GET, &path, None).await?;
        Ok(parse_body::<Resp>(&body)?.hosts)
    }

    /// Register a new host and return its ID.
    pub async fn create_host(&self, param: &CreateHostParam) -> Result<String> {
        let body = self.call_json(Method::POST, &format!("{API_PREFIX}/hosts"), param).await?;
        Ok(parse_body::<IdResp>(&body)?.id)
    }

    /// Update a host and return its ID.
    pub async fn update_host(&self, id: &str, param: &UpdateHostParam) -> Result<String> {
        let body = self.call_json(Method::PUT, &host_path(id, ""), param).await?;
        Ok(parse_body::<IdResp>(&body)?.id)
    }

    /// Change the status of a host.
    pub async fn update_host_status(&self, id: &str, status: HostStatus) -> Result<()> {
        #[derive(Serialize)]
        struct Req {
            status: HostStatus,
        }
        self.call_json(Method::POST, &host_path(id, "/status"), &Req { status }).await?;
        Ok(())
    }

    /// Retire a host.
    pub async fn retire_host(&self, id: &str) -> Result<()> {
        let empty = serde_json::Map::new();
        self.call_json(Method::POST, &host_path(id, "/retire"), &empty).await?;
        Ok(())
    }

    /// List every monitor, in the order the service returned them.
    pub async fn find_monitors(&self) -> Result<Vec<Monitor>> {
        #[derive(Deserialize)]
        struct Resp {
            monitors: Vec<Value>,
        }
        let body = self.call(Method::GET, &format!("{API_PREFIX}/monitors"), None).await?;
        decode_monitors(parse_body::<Resp>(&body)?.monitors)
    }

    async fn call_json<B>(&self, method: Method, path: &str, payload: &B) -> Result<Vec<u8>>
    where
        B: Serialize + ?Sized,
    {
        let body = serde_json::to_vec(payload).map_err(Error::Encode)?;
        self.call(method, path, Some(body)).await
    }

    async fn call(&self, method: Method, path: &str, body: Option<Vec<u8>>) -> Result<Vec<u8>> {
        debug!(%method, path, "Sending request");
        if self.verbose {
            if let Some(body) = &body {
                debug!(%method, path, body = %String::from_utf8_lossy(body), "Request body");
            }
        }

        let resp = self.transport.request(method.clone(), path, body).await.map_err(|source| {
            Error::Transport { method: method.clone(), path: path.to_owned(), source }
        })?;

        debug!(%method, path, status = resp.status, "Received response");
        if self.verbose {
            debug!(%method, path, body = %String::from_utf8_lossy(&resp.body), "Response body");
        }

        if resp.status != 200 {
            return Err(Error::Status { method, path: path.to_owned(), status: resp.status });
        }
        Ok(resp.body)
    }
}

#[derive(Deserialize)]
struct IdResp {
    id: String,
}

/// Path of a single host resource, with the ID percent-encoded as one segment.
fn host_path(id: &str, suffix: &str) -> String {
    // `byte_serialize` writes spaces as `+`, which is literal in a path.
    let id: String = form_urlencoded::byte_serialize(id.as_bytes()).collect();
    let id = id.replace('+', "%20");
    format!("{API_PREFIX}/hosts/{id}{suffix}")
}
