use api_types::{CreateHostParam, FindHostsParam, HostStatus};
use clap::{Parser, Subcommand};
use client::{Client, Transport};
use config::ApiOpts;
use eyre::{Result, WrapErr};
use serde_json::{Value, json};

/// Command line options for mkr
#[derive(Debug, Parser)]
#[command(name = "mkr", version, about = "Manage Mackerel hosts and inspect monitors")]
pub(crate) struct Cli {
    /// API access configuration
    #[clap(flatten)]
    pub(crate) api: ApiOpts,

    /// Operation to run
    #[command(subcommand)]
    pub(crate) command: Command,
}

/// Top level command
#[derive(Debug, Subcommand)]
pub(crate) enum Command {
    /// Host inventory operations
    #[command(subcommand)]
    Hosts(HostsCommand),
    /// Monitor operations
    #[command(subcommand)]
    Monitors(MonitorsCommand),
}

/// Host inventory operations
#[derive(Debug, Subcommand)]
pub(crate) enum HostsCommand {
    /// Show a single host
    Get {
        /// Host ID
        id: String,
    },
    /// Search hosts
    List {
        /// Service name
        #[arg(long)]
        service: Option<String>,
        /// Role name, repeatable
        #[arg(long = "role")]
        roles: Vec<String>,
        /// Host name
        #[arg(long)]
        name: Option<String>,
        /// Host status, repeatable
        #[arg(long = "status")]
        statuses: Vec<HostStatus>,
    },
    /// Register a host
    Create {
        /// Host name
        #[arg(long)]
        name: String,
        /// Role as `service:role`, repeatable
        #[arg(long = "role-fullname")]
        role_fullnames: Vec<String>,
    },
    /// Update a host
    Update {
        /// Host ID
        id: String,
        /// New host name
        #[arg(long)]
        name: Option<String>,
        /// Role as `service:role`, repeatable
        #[arg(long = "role-fullname")]
        role_fullnames: Vec<String>,
    },
    /// Change the status of a host
    Status {
        /// Host ID
        id: String,
        /// working, standby, maintenance or poweroff
        status: HostStatus,
    },
    /// Retire a host
    Retire {
        /// Host ID
        id: String,
    },
}

/// Monitor operations
#[derive(Debug, Subcommand)]
pub(crate) enum MonitorsCommand {
    /// List all monitors
    List,
}

impl Command {
    /// Run the command and return what should be printed.
    pub(crate) async fn run<T: Transport>(self, client: &Client<T>) -> Result<Value> {
        match self {
            Self::Hosts(cmd) => cmd.run(client).await,
            Self::Monitors(MonitorsCommand::List) => {
                let monitors = client.find_monitors().await.wrap_err("failed to list monitors")?;
                Ok(serde_json::to_value(monitors)?)
            }
        }
    }
}

impl HostsCommand {
    async fn run<T: Transport>(self, client: &Client<T>) -> Result<Value> {
        let output = match self {
            Self::Get { id } => {
                let host = client
                    .find_host(&id)
                    .await
                    .wrap_err_with(|| format!("failed to fetch host {id}"))?;
                serde_json::to_value(host)?
            }
            Self::List { service, roles, name, statuses } => {
                let param = FindHostsParam { service, roles, name, statuses };
                let hosts = client.find_hosts(&param).await.wrap_err("failed to search hosts")?;
                serde_json::to_value(hosts)?
            }
            Self::Create { name, role_fullnames } => {
                let param = CreateHostParam { name, role_fullnames, ..Default::default() };
                let id = client.create_host(&param).await.wrap_err("failed to create host")?;
                json!({ "id": id })
            }
            Self::Update { id, name, role_fullnames } => {
                let param = CreateHostParam {
                    name: name.unwrap_or_default(),
                    role_fullnames,
                    ..Default::default()
                };
                let id = client
                    .update_host(&id, &param)
                    .await
                    .wrap_err_with(|| format!("failed to update host {id}"))?;
                json!({ "id": id })
            }
            Self::Status { id, status } => {
                client
                    .update_host_status(&id, status)
                    .await
                    .wrap_err_with(|| format!("failed to set status of host {id}"))?;
                json!({ "success": true })
            }
            Self::Retire { id } => {
                client
                    .retire_host(&id)
                    .await
                    .wrap_err_with(|| format!("failed to retire host {id}"))?;
                json!({ "success": true })
            }
        };
        Ok(output)
    }
}
