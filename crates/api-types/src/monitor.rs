use serde::{Deserialize, Deserializer, Serialize, Serializer, de, ser::SerializeMap};
use serde_json::{Map, Value};

/// Fields shared by every known monitor kind.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonitorCommon {
    /// Service-assigned monitor ID
    pub id: String,
    /// Display name
    #[serde(default, deserialize_with = "crate::nullable::de_null_default")]
    pub name: String,
    /// Free-form memo
    #[serde(
        default,
        deserialize_with = "crate::nullable::de_null_default",
        skip_serializing_if = "String::is_empty"
    )]
    pub memo: String,
    /// Whether notifications are muted
    #[serde(default, deserialize_with = "crate::nullable::de_null_default")]
    pub is_mute: bool,
    /// Re-notification interval in minutes
    #[serde(
        default,
        deserialize_with = "crate::num::de_u64_opt",
        skip_serializing_if = "Option::is_none"
    )]
    pub notification_interval: Option<u64>,
}

/// Host connectivity (agent heartbeat) monitor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectivityMonitor {
    /// Common fields
    #[serde(flatten)]
    pub common: MonitorCommon,
    /// Services/roles the monitor applies to
    #[serde(default, deserialize_with = "crate::nullable::de_null_default")]
    pub scopes: Vec<String>,
    /// Services/roles excluded from the monitor
    #[serde(default, deserialize_with = "crate::nullable::de_null_default")]
    pub exclude_scopes: Vec<String>,
}

/// Host metric threshold monitor (`type: host`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HostMetricMonitor {
    /// Common fields
    #[serde(flatten)]
    pub common: MonitorCommon,
    /// Metric name
    #[serde(default, deserialize_with = "crate::nullable::de_null_default")]
    pub metric: String,
    /// Comparison operator, `>` or `<`
    #[serde(default, deserialize_with = "crate::nullable::de_null_default")]
    pub operator: String,
    /// Warning threshold
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warning: Option<f64>,
    /// Critical threshold
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub critical: Option<f64>,
    /// Number of points averaged before comparing
    #[serde(
        default,
        deserialize_with = "crate::num::de_u64_opt",
        skip_serializing_if = "Option::is_none"
    )]
    pub duration: Option<u64>,
    /// Consecutive failures needed to alert
    #[serde(
        default,
        deserialize_with = "crate::num::de_u64_opt",
        skip_serializing_if = "Option::is_none"
    )]
    pub max_check_attempts: Option<u64>,
    /// Services/roles the monitor applies to
    #[serde(default, deserialize_with = "crate::nullable::de_null_default")]
    pub scopes: Vec<String>,
    /// Services/roles excluded from the monitor
    #[serde(default, deserialize_with = "crate::nullable::de_null_default")]
    pub exclude_scopes: Vec<String>,
}

/// Service metric threshold monitor (`type: service`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceMetricMonitor {
    /// Common fields
    #[serde(flatten)]
    pub common: MonitorCommon,
    /// Service name
    #[serde(default, deserialize_with = "crate::nullable::de_null_default")]
    pub service: String,
    /// Metric name
    #[serde(default, deserialize_with = "crate::nullable::de_null_default")]
    pub metric: String,
    /// Comparison operator, `>` or `<`
    #[serde(default, deserialize_with = "crate::nullable::de_null_default")]
    pub operator: String,
    /// Warning threshold
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warning: Option<f64>,
    /// Critical threshold
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub critical: Option<f64>,
    /// Number of points averaged before comparing
    #[serde(
        default,
        deserialize_with = "crate::num::de_u64_opt",
        skip_serializing_if = "Option::is_none"
    )]
    pub duration: Option<u64>,
    /// Consecutive failures needed to alert
    #[serde(
        default,
        deserialize_with = "crate::num::de_u64_opt",
        skip_serializing_if = "Option::is_none"
    )]
    pub max_check_attempts: Option<u64>,
}

/// External HTTP monitor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExternalMonitor {
    /// Common fields
    #[serde(flatten)]
    pub common: MonitorCommon,
    /// Monitored URL
    #[serde(default, deserialize_with = "crate::nullable::de_null_default")]
    pub url: String,
    /// Service the response time metric is posted to
    #[serde(default, deserialize_with = "crate::nullable::de_null_default")]
    pub service: String,
    /// Consecutive failures needed to alert
    #[serde(
        default,
        deserialize_with = "crate::num::de_u64_opt",
        skip_serializing_if = "Option::is_none"
    )]
    pub max_check_attempts: Option<u64>,
    /// Critical response time in milliseconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_time_critical: Option<f64>,
    /// Warning response time in milliseconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_time_warning: Option<f64>,
    /// Minutes averaged for the response time check
    #[serde(
        default,
        deserialize_with = "crate::num::de_u64_opt",
        skip_serializing_if = "Option::is_none"
    )]
    pub response_time_duration: Option<u64>,
    /// Days before certificate expiry that raise a critical alert
    #[serde(
        default,
        deserialize_with = "crate::num::de_u64_opt",
        skip_serializing_if = "Option::is_none"
    )]
    pub certification_expiration_critical: Option<u64>,
    /// Days before certificate expiry that raise a warning
    #[serde(
        default,
        deserialize_with = "crate::num::de_u64_opt",
        skip_serializing_if = "Option::is_none"
    )]
    pub certification_expiration_warning: Option<u64>,
    /// String the response body must contain
    #[serde(
        default,
        deserialize_with = "crate::nullable::de_null_default",
        skip_serializing_if = "String::is_empty"
    )]
    pub contains_string: String,
}

/// Expression (formula) monitor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpressionMonitor {
    /// Common fields
    #[serde(flatten)]
    pub common: MonitorCommon,
    /// Graph expression
    #[serde(default, deserialize_with = "crate::nullable::de_null_default")]
    pub expression: String,
    /// Comparison operator, `>` or `<`
    #[serde(default, deserialize_with = "crate::nullable::de_null_default")]
    pub operator: String,
    /// Warning threshold
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warning: Option<f64>,
    /// Critical threshold
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub critical: Option<f64>,
}

/// Monitor of a kind this crate does not model.
///
/// All fields except `type` are kept as sent, at any depth.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UnknownMonitor {
    /// The `type` discriminator
    pub kind: String,
    /// Remaining raw fields
    pub fields: Map<String, Value>,
}

impl UnknownMonitor {
    /// The `id` field, if present and a string.
    pub fn id(&self) -> Option<&str> {
        self.fields.get("id").and_then(Value::as_str)
    }

    /// The `name` field, if present and a string.
    pub fn name(&self) -> Option<&str> {
        self.fields.get("name").and_then(Value::as_str)
    }
}

/// Returned when a monitor record cannot be decoded.
#[derive(Debug, thiserror::Error)]
pub enum MonitorDecodeError {
    /// The record is not a JSON object.
    #[error("monitor is not a JSON object")]
    NotAnObject,
    /// The `type` field is missing or null.
    #[error("monitor has no `type` field")]
    MissingType,
    /// The `type` field is not a string.
    #[error("monitor `type` must be a string, got {0}")]
    InvalidType(Value),
    /// A field of a known kind is missing or has the wrong type.
    #[error("invalid `{kind}` monitor: {source}")]
    Invalid {
        /// The discriminator that selected the shape
        kind: String,
        /// Underlying serde error
        #[source]
        source: serde_json::Error,
    },
}

/// A monitor, discriminated by its `type` field.
///
/// Unrecognized kinds decode into [`Monitor::Unknown`] rather than failing.
#[derive(Debug, Clone, PartialEq)]
pub enum Monitor {
    /// `type: connectivity`
    Connectivity(ConnectivityMonitor),
    /// `type: host`
    Host(HostMetricMonitor),
    /// `type: service`
    Service(ServiceMetricMonitor),
    /// `type: external`
    External(ExternalMonitor),
    /// `type: expression`
    Expression(ExpressionMonitor),
    /// Any other `type`
    Unknown(UnknownMonitor),
}

impl Monitor {
    /// Discriminator value for connectivity monitors.
    pub const CONNECTIVITY: &'static str = "connectivity";
    /// Discriminator value for host metric monitors.
    pub const HOST: &'static str = "host";
    /// Discriminator value for service metric monitors.
    pub const SERVICE: &'static str = "service";
    /// Discriminator value for external HTTP monitors.
    pub const EXTERNAL: &'static str = "external";
    /// Discriminator value for expression monitors.
    pub const EXPRESSION: &'static str = "expression";

    /// Decode a single raw monitor record.
    pub fn from_value(value: Value) -> Result<Self, MonitorDecodeError> {
        let Value::Object(mut fields) = value else {
            return Err(MonitorDecodeError::NotAnObject);
        };
        let kind = match fields.get("type") {
            None | Some(Value::Null) => return Err(MonitorDecodeError::MissingType),
            Some(Value::String(kind)) => kind.clone(),
            Some(other) => return Err(MonitorDecodeError::InvalidType(other.clone())),
        };

        if !Self::is_known_kind(&kind) {
            fields.remove("type");
            return Ok(Self::Unknown(UnknownMonitor { kind, fields }));
        }

        let object = Value::Object(fields);
        let decoded = match kind.as_str() {
            Self::CONNECTIVITY => serde_json::from_value(object).map(Self::Connectivity),
            Self::HOST => serde_json::from_value(object).map(Self::Host),
            Self::SERVICE => serde_json::from_value(object).map(Self::Service),
            Self::EXTERNAL => serde_json::from_value(object).map(Self::External),
            _ => serde_json::from_value(object).map(Self::Expression),
        };
        decoded.map_err(|source| MonitorDecodeError::Invalid { kind, source })
    }

    fn is_known_kind(kind: &str) -> bool {
        matches!(
            kind,
            Self::CONNECTIVITY | Self::HOST | Self::SERVICE | Self::EXTERNAL | Self::EXPRESSION
        )
    }

    /// The `type` discriminator of this monitor.
    pub fn kind(&self) -> &str {
        match self {
            Self::Connectivity(_) => Self::CONNECTIVITY,
            Self::Host(_) => Self::HOST,
            Self::Service(_) => Self::SERVICE,
            Self::External(_) => Self::EXTERNAL,
            Self::Expression(_) => Self::EXPRESSION,
            Self::Unknown(m) => &m.kind,
        }
    }

    /// Common fields, unless the kind is unknown.
    pub const fn common(&self) -> Option<&MonitorCommon> {
        match self {
            Self::Connectivity(m) => Some(&m.common),
            Self::Host(m) => Some(&m.common),
            Self::Service(m) => Some(&m.common),
            Self::External(m) => Some(&m.common),
            Self::Expression(m) => Some(&m.common),
            Self::Unknown(_) => None,
        }
    }

    /// Service-assigned ID.
    pub fn id(&self) -> Option<&str> {
        match self {
            Self::Unknown(m) => m.id(),
            known => known.common().map(|c| c.id.as_str()),
        }
    }

    /// Display name.
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Unknown(m) => m.name(),
            known => known.common().map(|c| c.name.as_str()),
        }
    }
}

impl<'de> Deserialize<'de> for Monitor {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Self::from_value(value).map_err(de::Error::custom)
    }
}

impl Serialize for Monitor {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        #[derive(Serialize)]
        #[serde(tag = "type", rename_all = "camelCase")]
        enum Tagged<'a> {
            Connectivity(&'a ConnectivityMonitor),
            Host(&'a HostMetricMonitor),
            Service(&'a ServiceMetricMonitor),
            External(&'a ExternalMonitor),
            Expression(&'a ExpressionMonitor),
        }

        match self {
            Self::Connectivity(m) => Tagged::Connectivity(m).serialize(serializer),
            Self::Host(m) => Tagged::Host(m).serialize(serializer),
            Self::Service(m) => Tagged::Service(m).serialize(serializer),
            Self::External(m) => Tagged::External(m).serialize(serializer),
            Self::Expression(m) => Tagged::Expression(m).serialize(serializer),
            Self::Unknown(m) => {
                let mut map = serializer.serialize_map(Some(m.fields.len() + 1))?;
                map.serialize_entry("type", &m.kind)?;
                for (key, value) in &m.fields {
                    map.serialize_entry(key, value)?;
                }
                map.end()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_connectivity_with_empty_scopes() {
        let monitor = Monitor::from_value(json!({
            "id": "2cSZzK3XfmG",
            "type": "connectivity",
            "scopes": [],
            "excludeScopes": []
        }))
        .unwrap();

        let Monitor::Connectivity(m) = monitor else { panic!("expected connectivity") };
        assert_eq!(m.common.id, "2cSZzK3XfmG");
        assert_eq!(m.common.name, "");
        assert!(m.scopes.is_empty());
        assert!(m.exclude_scopes.is_empty());
        assert_eq!(m.common.notification_interval, None);
    }

    #[test]
    fn decodes_host_metric_monitor() {
        let monitor = Monitor::from_value(json!({
            "id": "2cSZzK3XfmH",
            "type": "host",
            "name": "disk.aa-00.writes.delta",
            "metric": "disk.aa-00.writes.delta",
            "operator": ">",
            "warning": 20000.0,
            "critical": 400000,
            "duration": 3,
            "maxCheckAttempts": 1.0,
            "scopes": ["Hatena-Blog"],
            "excludeScopes": ["Hatena-Bookmark:db-master"]
        }))
        .unwrap();

        let Monitor::Host(m) = monitor else { panic!("expected host monitor") };
        assert_eq!(m.metric, "disk.aa-00.writes.delta");
        assert_eq!(m.operator, ">");
        assert_eq!(m.warning, Some(20000.0));
        assert_eq!(m.critical, Some(400_000.0));
        assert_eq!(m.duration, Some(3));
        assert_eq!(m.max_check_attempts, Some(1));
        assert_eq!(m.scopes, vec!["Hatena-Blog"]);
        assert_eq!(m.exclude_scopes, vec!["Hatena-Bookmark:db-master"]);
    }

    #[test]
    fn decodes_service_metric_monitor() {
        let monitor = Monitor::from_value(json!({
            "id": "2cSZzK3XfmI",
            "type": "service",
            "name": "Hatena-Blog - access_num.4xx_count",
            "service": "Hatena-Blog",
            "metric": "access_num.4xx_count",
            "operator": ">",
            "warning": 50.5,
            "duration": 1,
            "isMute": true
        }))
        .unwrap();

        let Monitor::Service(m) = monitor else { panic!("expected service monitor") };
        assert_eq!(m.service, "Hatena-Blog");
        assert_eq!(m.warning, Some(50.5));
        assert_eq!(m.critical, None);
        assert!(m.common.is_mute);
    }

    #[test]
    fn absent_numeric_fields_are_none_not_zero() {
        let monitor = Monitor::from_value(json!({
            "id": "x",
            "type": "external",
            "url": "https://example.com/"
        }))
        .unwrap();

        let Monitor::External(m) = monitor else { panic!("expected external monitor") };
        assert_eq!(m.max_check_attempts, None);
        assert_eq!(m.response_time_critical, None);
        assert_eq!(m.certification_expiration_warning, None);
        assert_eq!(m.contains_string, "");
    }

    #[test]
    fn null_strings_and_lists_decode_to_empty() {
        let monitor = Monitor::from_value(json!({
            "id": "a",
            "type": "connectivity",
            "name": null,
            "memo": null,
            "isMute": null,
            "scopes": null,
            "excludeScopes": null
        }))
        .unwrap();

        let Monitor::Connectivity(m) = monitor else { panic!("expected connectivity") };
        assert_eq!(m.common.name, "");
        assert_eq!(m.common.memo, "");
        assert!(!m.common.is_mute);
        assert!(m.scopes.is_empty());
        assert!(m.exclude_scopes.is_empty());
    }

    #[test]
    fn ignores_unknown_fields_on_known_kinds() {
        let monitor = Monitor::from_value(json!({
            "id": "2DujfcR2kA9",
            "type": "expression",
            "expression": "max(role('a:b','loadavg5'))",
            "somethingNew": {"nested": [1, 2, 3]}
        }))
        .unwrap();
        assert_eq!(monitor.kind(), Monitor::EXPRESSION);
        assert_eq!(monitor.id(), Some("2DujfcR2kA9"));
    }

    #[test]
    fn unknown_kind_keeps_raw_fields() {
        let monitor = Monitor::from_value(json!({
            "id": "3yAPkNJnY8T",
            "type": "anomalyDetection",
            "name": "anomaly",
            "scopes": ["Hatena-Blog:web"],
            "maxCheckAttempts": 3,
            "warningSensitivity": "insensitive"
        }))
        .unwrap();

        let Monitor::Unknown(m) = &monitor else { panic!("expected unknown") };
        assert_eq!(m.kind, "anomalyDetection");
        assert!(!m.fields.contains_key("type"));
        assert_eq!(m.fields["maxCheckAttempts"], json!(3));
        assert_eq!(m.fields["warningSensitivity"].as_str(), Some("insensitive"));
        assert_eq!(monitor.kind(), "anomalyDetection");
        assert_eq!(monitor.id(), Some("3yAPkNJnY8T"));
        assert_eq!(monitor.name(), Some("anomaly"));
        assert!(monitor.common().is_none());
    }

    #[test]
    fn unknown_kind_accepts_any_depth() {
        let raw = json!({
            "id": "4xQ",
            "type": "query",
            "query": {"legend": "{{host}}", "filters": [{"key": "env", "values": ["prod"]}]},
            "alertStatusOnGone": null
        });
        let monitor = Monitor::from_value(raw.clone()).unwrap();

        let Monitor::Unknown(m) = &monitor else { panic!("expected unknown") };
        assert_eq!(m.fields["query"]["filters"][0]["values"][0], "prod");
        assert_eq!(m.fields["alertStatusOnGone"], Value::Null);
        assert_eq!(serde_json::to_value(&monitor).unwrap(), raw);
    }

    #[test]
    fn missing_or_invalid_discriminator_fails() {
        let missing = Monitor::from_value(json!({"id": "a"})).unwrap_err();
        assert!(matches!(missing, MonitorDecodeError::MissingType));

        let null = Monitor::from_value(json!({"id": "a", "type": null})).unwrap_err();
        assert!(matches!(null, MonitorDecodeError::MissingType));

        let numeric = Monitor::from_value(json!({"id": "a", "type": 7})).unwrap_err();
        assert!(matches!(numeric, MonitorDecodeError::InvalidType(_)));

        let array = Monitor::from_value(json!(["connectivity"])).unwrap_err();
        assert!(matches!(array, MonitorDecodeError::NotAnObject));
    }

    #[test]
    fn mismatched_field_on_known_kind_fails() {
        let err = Monitor::from_value(json!({
            "id": "a",
            "type": "external",
            "maxCheckAttempts": "three"
        }))
        .unwrap_err();
        let MonitorDecodeError::Invalid { kind, .. } = &err else { panic!("unexpected: {err:?}") };
        assert_eq!(kind, "external");
        assert!(err.to_string().starts_with("invalid `external` monitor"));

        let missing_id = Monitor::from_value(json!({"type": "connectivity"})).unwrap_err();
        assert!(matches!(missing_id, MonitorDecodeError::Invalid { .. }));
    }

    #[test]
    fn serializes_with_discriminator() {
        let monitor = Monitor::Expression(ExpressionMonitor {
            common: MonitorCommon { id: "e1".to_owned(), name: "load".to_owned(), ..Default::default() },
            expression: "avg(roleSlots('service:role','loadavg5'))".to_owned(),
            operator: ">".to_owned(),
            warning: Some(20.0),
            critical: None,
        });
        assert_eq!(
            serde_json::to_value(&monitor).unwrap(),
            json!({
                "type": "expression",
                "id": "e1",
                "name": "load",
                "isMute": false,
                "expression": "avg(roleSlots('service:role','loadavg5'))",
                "operator": ">",
                "warning": 20.0
            })
        );

        let unknown = Monitor::Unknown(UnknownMonitor {
            kind: "check".to_owned(),
            fields: Map::from_iter([("id".to_owned(), json!("c1"))]),
        });
        assert_eq!(serde_json::to_value(&unknown).unwrap(), json!({"type": "check", "id": "c1"}));
    }

    #[test]
    fn deserialize_impl_matches_from_value() {
        let monitors: Vec<Monitor> = serde_json::from_str(
            r#"[{"id":"a","type":"connectivity"},{"id":"b","type":"mystery"}]"#,
        )
        .unwrap();
        assert_eq!(monitors[0].kind(), Monitor::CONNECTIVITY);
        assert_eq!(monitors[1].kind(), "mystery");
    }
}
