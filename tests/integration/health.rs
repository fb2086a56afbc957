//! Health endpoint integration tests

use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::Value;

use crate::common::{direct_mode, test_config, test_server, workflow_mode};

#[tokio::test]
async fn test_health_reports_mode_and_version() {
    let server = test_server(test_config("http://127.0.0.1:9", workflow_mode()));

    let response = server.get("/health").await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    assert_eq!(body["mode"], "workflow");
    assert_eq!(body["invoker"], "workflow");
    assert!(body["uptime_seconds"].is_u64());
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn test_health_does_not_probe_upstream() {
    // Upstream is unreachable, the relay still reports healthy
    let server = test_server(test_config("http://127.0.0.1:9", direct_mode()));

    let response = server.get("/health").await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.json::<Value>()["mode"], "direct");
}

#[tokio::test]
async fn test_liveness() {
    let server = test_server(test_config("http://127.0.0.1:9", direct_mode()));

    let response = server.get("/health/live").await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.json::<Value>(), serde_json::json!({"status": "healthy"}));
}

#[tokio::test]
async fn test_metrics_endpoint_serves_text() {
    let server = test_server(test_config("http://127.0.0.1:9", direct_mode()));

    let response = server.get("/metrics").await;

    assert_eq!(response.status_code(), StatusCode::OK);
}
