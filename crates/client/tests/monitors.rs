//! Integration tests for monitor listing and decoding

use api_types::Monitor;
use client::{Client, Error};
use mockito::Server;
use serde_json::json;

fn documented_monitors() -> serde_json::Value {
    json!({
        "monitors": [
            {
                "id": "2cSZzK3XfmG",
                "type": "connectivity",
                "scopes": [],
                "excludeScopes": []
            },
            {
                "id": "2c5bLca8d",
                "type": "external",
                "name": "testMonitorExternal",
                "url": "https://www.example.com/",
                "maxCheckAttempts": 3,
                "service": "someService",
                "notificationInterval": 60,
                "responseTimeCritical": 5000,
                "responseTimeWarning": 10000,
                "responseTimeDuration": 5,
                "certificationExpirationCritical": 15,
                "certificationExpirationWarning": 30,
                "containsString": "Foo Bar Baz"
            },
            {
                "id": "2DujfcR2kA9",
                "name": "expression test",
                "type": "expression",
                "expression": "avg(roleSlots('service:role','loadavg5'))",
                "operator": ">",
                "warning": 20,
                "critical": 30
            }
        ]
    })
}

#[tokio::test]
async fn find_monitors_decodes_documented_example() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/api/v0/monitors")
        .match_header("x-api-key", "dummy-key")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(documented_monitors().to_string())
        .create_async()
        .await;

    let client = Client::with_options("dummy-key", &server.url(), false).unwrap();
    let monitors = client.find_monitors().await.unwrap();
    mock.assert_async().await;

    assert_eq!(monitors.len(), 3);
    let kinds: Vec<_> = monitors.iter().map(Monitor::kind).collect();
    assert_eq!(kinds, ["connectivity", "external", "expression"]);

    let Monitor::Connectivity(connectivity) = &monitors[0] else { panic!("expected connectivity") };
    assert_eq!(connectivity.common.id, "2cSZzK3XfmG");
    assert!(connectivity.scopes.is_empty());
    assert!(connectivity.exclude_scopes.is_empty());

    let Monitor::External(external) = &monitors[1] else { panic!("expected external") };
    assert_eq!(external.common.id, "2c5bLca8d");
    assert_eq!(external.common.name, "testMonitorExternal");
    assert_eq!(external.common.notification_interval, Some(60));
    assert_eq!(external.url, "https://www.example.com/");
    assert_eq!(external.service, "someService");
    assert_eq!(external.max_check_attempts, Some(3));
    assert_eq!(external.response_time_critical, Some(5000.0));
    assert_eq!(external.response_time_warning, Some(10000.0));
    assert_eq!(external.response_time_duration, Some(5));
    assert_eq!(external.certification_expiration_critical, Some(15));
    assert_eq!(external.certification_expiration_warning, Some(30));
    assert_eq!(external.contains_string, "Foo Bar Baz");

    let Monitor::Expression(expression) = &monitors[2] else { panic!("expected expression") };
    assert_eq!(expression.common.id, "2DujfcR2kA9");
    assert_eq!(expression.common.name, "expression test");
    assert_eq!(expression.expression, "avg(roleSlots('service:role','loadavg5'))");
    assert_eq!(expression.operator, ">");
    assert_eq!(expression.warning, Some(20.0));
    assert_eq!(expression.critical, Some(30.0));
}

#[tokio::test]
async fn find_monitors_keeps_unknown_kinds() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/api/v0/monitors")
        .with_status(200)
        .with_body(
            json!({"monitors": [
                {"id": "a", "type": "anomalyDetection", "scopes": ["svc:role"]},
                {"id": "b", "type": "connectivity"}
            ]})
            .to_string(),
        )
        .create_async()
        .await;

    let client = Client::with_options("k", &server.url(), false).unwrap();
    let monitors = client.find_monitors().await.unwrap();

    let Monitor::Unknown(unknown) = &monitors[0] else { panic!("expected unknown") };
    assert_eq!(unknown.kind, "anomalyDetection");
    assert_eq!(unknown.id(), Some("a"));
    assert_eq!(monitors[1].kind(), "connectivity");
}

#[tokio::test]
async fn find_monitors_rejects_malformed_body() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/api/v0/monitors")
        .with_status(200)
        .with_body("<html>maintenance</html>")
        .create_async()
        .await;

    let client = Client::with_options("k", &server.url(), false).unwrap();
    let err = client.find_monitors().await.unwrap_err();
    assert!(matches!(err, Error::Json(_)));
}
