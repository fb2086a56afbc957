//! Prometheus metrics endpoint
//!
//! Exposes relay metrics in Prometheus format for monitoring.

use axum::response::IntoResponse;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::Lazy;

/// Global Prometheus handle for metrics export
static PROMETHEUS_HANDLE: Lazy<PrometheusHandle> = Lazy::new(|| {
    PrometheusBuilder::new()
        .install_recorder()
        .expect("Failed to install Prometheus recorder")
});

/// Initialize metrics (call once at startup)
pub fn init_metrics() {
    let _ = &*PROMETHEUS_HANDLE;

    register_metrics();
}

fn register_metrics() {
    metrics::describe_counter!("relay_requests_total", "Total number of relayed requests");
    metrics::describe_histogram!(
        "relay_request_duration_seconds",
        "Relayed request duration in seconds"
    );
    metrics::describe_counter!(
        "relay_poll_attempts_total",
        "Workflow run status polls issued"
    );
}

/// Prometheus metrics endpoint handler
pub async fn prometheus_metrics() -> impl IntoResponse {
    PROMETHEUS_HANDLE.render()
}

/// Record a relayed request
pub fn record_request(status: &str, mode: &str, duration_secs: f64) {
    metrics::counter!("relay_requests_total", "status" => status.to_string(), "mode" => mode.to_string())
        .increment(1);
    metrics::histogram!("relay_request_duration_seconds", "mode" => mode.to_string())
        .record(duration_secs);
}
