//! Data types for the Mackerel REST API.
//!
//! These structs mirror the JSON bodies exchanged with the host and monitor
//! endpoints. They live in their own crate so that consumers can depend on the
//! data model without pulling in an HTTP stack.

/// Hosts, host metadata and host search filters
pub mod host;
/// Loosely-typed metadata values
pub mod meta;
/// Monitor variants and their decoding
pub mod monitor;
/// Helper treating JSON `null` as the field default
pub mod nullable;
/// Numeric coercion helpers for serde
pub mod num;

pub use host::{
    CreateHostParam, FindHostsParam, Host, HostMeta, HostStatus, Interface, Roles,
    UnknownHostStatus, UpdateHostParam,
};
pub use meta::{MetaValue, Scalar};
pub use monitor::{
    ConnectivityMonitor, ExpressionMonitor, ExternalMonitor, HostMetricMonitor, Monitor,
    MonitorCommon, MonitorDecodeError, ServiceMetricMonitor, UnknownMonitor,
};
