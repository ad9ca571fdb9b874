use std::{collections::BTreeMap, fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::meta::MetaValue;

/// Roles of a host, keyed by service name.
pub type Roles = BTreeMap<String, Vec<String>>;

/// Host as returned by the hosts endpoints.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Host {
    /// Service-assigned host ID
    #[serde(deserialize_with = "crate::nullable::de_null_default")]
    pub id: String,
    /// Host name
    #[serde(deserialize_with = "crate::nullable::de_null_default")]
    pub name: String,
    /// Host type (e.g. `unknown`, `ec2`)
    #[serde(rename = "type", deserialize_with = "crate::nullable::de_null_default")]
    pub kind: String,
    /// Raw status string; see [`Host::parsed_status`]
    #[serde(deserialize_with = "crate::nullable::de_null_default")]
    pub status: String,
    /// Free-form memo
    #[serde(deserialize_with = "crate::nullable::de_null_default")]
    pub memo: String,
    /// Service name to role names
    #[serde(
        deserialize_with = "crate::nullable::de_null_default",
        skip_serializing_if = "BTreeMap::is_empty"
    )]
    pub roles: Roles,
    /// Role full names as sent by the service (`service:role`)
    #[serde(
        deserialize_with = "crate::nullable::de_null_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub role_fullnames: Vec<String>,
    /// Whether the host has been retired
    #[serde(deserialize_with = "crate::nullable::de_null_default")]
    pub is_retired: bool,
    /// Registration time in seconds since the epoch
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<i64>,
    /// Agent-reported metadata
    #[serde(
        deserialize_with = "crate::nullable::de_null_default",
        skip_serializing_if = "HostMeta::is_empty"
    )]
    pub meta: HostMeta,
    /// Network interfaces
    #[serde(
        deserialize_with = "crate::nullable::de_null_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub interfaces: Vec<Interface>,
}

impl Host {
    /// Flatten [`Host::roles`] into `service:role` strings.
    ///
    /// Services are visited in name order, roles in the order the service
    /// listed them.
    pub fn role_fullnames(&self) -> Vec<String> {
        self.roles
            .iter()
            .flat_map(|(service, roles)| roles.iter().map(move |role| format!("{service}:{role}")))
            .collect()
    }

    /// Registration time as a UTC timestamp.
    pub fn created_at_datetime(&self) -> Option<DateTime<Utc>> {
        self.created_at.and_then(|secs| DateTime::from_timestamp(secs, 0))
    }

    /// Registration time formatted for humans, e.g. `Nov 14, 2023 at 10:13pm (UTC)`.
    pub fn created_at_display(&self) -> Option<String> {
        self.created_at_datetime().map(|dt| dt.format("%b %-d, %Y at %-I:%M%P (%Z)").to_string())
    }

    /// Interface name to IP address.
    pub fn ip_addresses(&self) -> BTreeMap<String, String> {
        self.interfaces.iter().map(|i| (i.name.clone(), i.ip_address.clone())).collect()
    }

    /// The status as a [`HostStatus`], if the service sent a known one.
    pub fn parsed_status(&self) -> Option<HostStatus> {
        self.status.parse().ok()
    }
}

/// Agent-reported host metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HostMeta {
    /// Agent build revision
    #[serde(
        rename = "agent-revision",
        deserialize_with = "crate::nullable::de_null_default",
        skip_serializing_if = "String::is_empty"
    )]
    pub agent_revision: String,
    /// Agent version
    #[serde(
        rename = "agent-version",
        deserialize_with = "crate::nullable::de_null_default",
        skip_serializing_if = "String::is_empty"
    )]
    pub agent_version: String,
    /// Block device name to device attributes
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub block_device: BTreeMap<String, BTreeMap<String, MetaValue>>,
    /// One record per logical CPU
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub cpu: Vec<BTreeMap<String, MetaValue>>,
    /// Filesystem name to usage attributes
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub filesystem: BTreeMap<String, MetaValue>,
    /// Kernel attributes
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub kernel: BTreeMap<String, String>,
    /// Memory attributes
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub memory: BTreeMap<String, String>,
}

impl HostMeta {
    /// True when no metadata has been reported.
    pub fn is_empty(&self) -> bool {
        self.agent_revision.is_empty() &&
            self.agent_version.is_empty() &&
            self.block_device.is_empty() &&
            self.cpu.is_empty() &&
            self.filesystem.is_empty() &&
            self.kernel.is_empty() &&
            self.memory.is_empty()
    }
}

/// Network interface of a host.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Interface {
    /// Interface name (e.g. `eth0`)
    #[serde(
        deserialize_with = "crate::nullable::de_null_default",
        skip_serializing_if = "String::is_empty"
    )]
    pub name: String,
    /// IPv4 address
    #[serde(
        deserialize_with = "crate::nullable::de_null_default",
        skip_serializing_if = "String::is_empty"
    )]
    pub ip_address: String,
    /// MAC address
    #[serde(
        deserialize_with = "crate::nullable::de_null_default",
        skip_serializing_if = "String::is_empty"
    )]
    pub mac_address: String,
}

/// Host status accepted by the status endpoint and the hosts filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HostStatus {
    /// Host is in service.
    Working,
    /// Host is on standby.
    Standby,
    /// Host is under maintenance.
    Maintenance,
    /// Host is powered off.
    Poweroff,
}

impl HostStatus {
    /// Wire representation.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Working => "working",
            Self::Standby => "standby",
            Self::Maintenance => "maintenance",
            Self::Poweroff => "poweroff",
        }
    }
}

impl fmt::Display for HostStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when parsing an unrecognized host status.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown host status `{0}` (expected working, standby, maintenance or poweroff)")]
pub struct UnknownHostStatus(pub String);

impl FromStr for HostStatus {
    type Err = UnknownHostStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "working" => Ok(Self::Working),
            "standby" => Ok(Self::Standby),
            "maintenance" => Ok(Self::Maintenance),
            "poweroff" => Ok(Self::Poweroff),
            other => Err(UnknownHostStatus(other.to_owned())),
        }
    }
}

/// Filters for the host search endpoint.
///
/// Every field is optional and applied independently; the default value
/// matches all hosts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FindHostsParam {
    /// Restrict to hosts belonging to this service
    pub service: Option<String>,
    /// Restrict to hosts having any of these roles
    pub roles: Vec<String>,
    /// Restrict to hosts whose name matches
    pub name: Option<String>,
    /// Restrict to hosts in any of these statuses
    pub statuses: Vec<HostStatus>,
}

/// Body of the host creation endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CreateHostParam {
    /// Host name
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
    /// Host metadata
    #[serde(skip_serializing_if = "HostMeta::is_empty")]
    pub meta: HostMeta,
    /// Network interfaces
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub interfaces: Vec<Interface>,
    /// Roles to assign, as `service:role`
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub role_fullnames: Vec<String>,
}

/// Body of the host update endpoint. Same shape as [`CreateHostParam`].
pub type UpdateHostParam = CreateHostParam;
