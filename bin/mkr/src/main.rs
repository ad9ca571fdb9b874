//! Entrypoint.

mod cli;

use clap::Parser;
use cli::Cli;
use client::Client;
use dotenvy::dotenv;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    if let Ok(custom_env_file) = std::env::var("ENV_FILE") {
        dotenvy::from_filename(custom_env_file)?;
    } else {
        // Try the default .env file, and ignore if it doesn't exist.
        dotenv().ok();
    }

    let cli = Cli::parse();
    let default_level = if cli.api.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

    debug!(api_base = %cli.api.api_base, "Using Mackerel API");
    let client = Client::with_base_url(cli.api.api_key, cli.api.api_base, cli.api.verbose);
    let output = cli.command.run(&client).await?;
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
