//! Mackerel API access configuration
use clap::Parser;
use url::Url;

/// Default API endpoint
pub const DEFAULT_API_BASE: &str = "https://mackerel.io";

/// API access configuration options
#[derive(Debug, Clone, Parser)]
pub struct ApiOpts {
    /// Mackerel API key
    #[clap(long, env = "MACKEREL_APIKEY", hide_env_values = true)]
    pub api_key: String,
    /// Mackerel API base URL
    #[clap(long, env = "MACKEREL_APIBASE", default_value = DEFAULT_API_BASE)]
    pub api_base: Url,
    /// Log request and response bodies
    #[clap(long, env = "MACKEREL_VERBOSE")]
    pub verbose: bool,
}
