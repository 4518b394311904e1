//! Prometheus metrics for the points server.
//!
//! Recorded through the `metrics` facade. Nothing is exported unless
//! [`init_metrics`] installs the Prometheus exporter; until then every
//! call below is a no-op.
//!
//! # Metrics
//!
//! - **HTTP**: request counts and duration by method, route and status
//! - **Ledger**: accounts created, points earned/spent, rejected requests

use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;

/// Initialize Prometheus metrics exporter.
///
/// Metrics will be available at `http://<addr>/metrics`.
///
/// # Arguments
///
/// - `addr`: Address to bind the metrics server to (e.g., `0.0.0.0:9090`)
pub fn init_metrics(addr: SocketAddr) -> Result<(), String> {
    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .map_err(|e| format!("Failed to install Prometheus exporter: {}", e))
}

// ============================================================================
// HTTP Metrics
// ============================================================================

/// Record HTTP request.
pub fn http_requests_total(method: &str, path: &str, status: u16) {
    metrics::counter!("http_requests_total",
        "method" => method.to_string(),
        "path" => path.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
}

/// Record HTTP request duration in milliseconds.
pub fn http_request_duration_ms(method: &str, path: &str, duration_ms: f64) {
    metrics::histogram!("http_request_duration_ms",
        "method" => method.to_string(),
        "path" => path.to_string()
    )
    .record(duration_ms);
}

// ============================================================================
// Ledger Metrics
// ============================================================================

/// Increment accounts created counter.
pub fn accounts_created_total() {
    metrics::counter!("accounts_created_total").increment(1);
}

/// Add earned points.
pub fn points_earned_total(points: i64) {
    metrics::counter!("points_earned_total").increment(points.max(0) as u64);
}

/// Add spent points.
pub fn points_spent_total(points: i64) {
    metrics::counter!("points_spent_total").increment(points.max(0) as u64);
}

/// Record a rejected request by error kind.
pub fn ledger_rejections_total(kind: &str) {
    metrics::counter!("ledger_rejections_total", "kind" => kind.to_string()).increment(1);
}
