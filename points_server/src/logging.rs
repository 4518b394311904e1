//! Structured logging configuration.
//!
//! `tracing` with an env-filter; the ledger library logs through the `log`
//! facade and those records are picked up by the same subscriber.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize structured logging
///
/// Log levels are configurable via the `RUST_LOG` env var.
///
/// # Example
///
/// ```no_run
/// use points_server::logging;
///
/// #[tokio::main]
/// async fn main() {
///     logging::init();
///     tracing::info!("Server starting");
/// }
/// ```
pub fn init() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tower_http=warn,hyper=warn"));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();

    tracing::info!("Structured logging initialized");
}

/// Log API request/response
///
/// # Arguments
///
/// * `request_id` - Correlation ID of the request
/// * `method` - HTTP method
/// * `path` - Route template or request path
/// * `status_code` - Response status code
/// * `duration_ms` - Request duration in milliseconds
pub fn log_api_request(
    request_id: &str,
    method: &str,
    path: &str,
    status_code: u16,
    duration_ms: u64,
) {
    if duration_ms > 1000 {
        tracing::warn!(
            request_id = request_id,
            http_method = method,
            http_path = path,
            http_status = status_code,
            duration_ms = duration_ms,
            "PERFORMANCE: Slow request"
        );
    } else {
        tracing::info!(
            request_id = request_id,
            http_method = method,
            http_path = path,
            http_status = status_code,
            duration_ms = duration_ms,
            "API request completed"
        );
    }
}

/// Log a request the ledger or input validation turned down
///
/// Server-side failures are errors; everything else is the client's doing
/// and only logged at debug level.
pub fn log_ledger_rejection(kind: &str, status_code: u16, message: &str) {
    if status_code >= 500 {
        tracing::error!(
            kind = kind,
            http_status = status_code,
            "LEDGER: {}",
            message
        );
    } else {
        tracing::debug!(
            kind = kind,
            http_status = status_code,
            "Request rejected: {}",
            message
        );
    }
}
