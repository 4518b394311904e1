//! Points ledger HTTP server.
//!
//! Serves the ledger API over HTTP with an in-memory ledger that lives for
//! the lifetime of the process.

use std::sync::Arc;

use anyhow::Error;
use pico_args::Arguments;
use points_ledger::LedgerManager;
use points_server::{
    api::{self, AppState},
    config::ServerConfig,
    logging, metrics,
};
use tracing::info;

const HELP: &str = "\
Run the points ledger server

USAGE:
  points_server [OPTIONS]

OPTIONS:
  --bind           IP:PORT   Server socket bind address  [default: env SERVER_BIND or 127.0.0.1:8000]
  --metrics-bind   IP:PORT   Prometheus exporter address [default: env METRICS_BIND, disabled if unset]

FLAGS:
  -h, --help                 Print help information

ENVIRONMENT:
  SERVER_BIND                Server bind address (e.g., 0.0.0.0:8000)
  METRICS_BIND               Prometheus exporter address (e.g., 0.0.0.0:9090)
  RUST_LOG                   Log filter (default: info)
";

#[tokio::main]
async fn main() -> Result<(), Error> {
    // Load .env file if it exists
    let _ = dotenvy::dotenv();

    let mut pargs = Arguments::from_env();

    // Help has a higher priority and should be handled separately.
    if pargs.contains(["-h", "--help"]) {
        print!("{HELP}");
        std::process::exit(0);
    }

    let bind_override = pargs.opt_value_from_str("--bind")?;
    let metrics_override = pargs.opt_value_from_str("--metrics-bind")?;

    let config = ServerConfig::from_env(bind_override, metrics_override)?;
    config.validate()?;

    logging::init();
    info!("Starting points ledger server at {}", config.bind);

    if let Some(metrics_bind) = config.metrics_bind {
        metrics::init_metrics(metrics_bind).map_err(|e| anyhow::anyhow!(e))?;
        info!("Prometheus metrics exported on http://{}/metrics", metrics_bind);
    }

    let state = AppState {
        ledger: Arc::new(LedgerManager::new()),
    };
    let app = api::create_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind to {}: {}", config.bind, e))?;

    info!(
        "Server is running at http://{}. Press Ctrl+C to stop.",
        config.bind
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| anyhow::anyhow!("Server error: {}", e))?;

    info!("Shutting down server...");

    Ok(())
}

/// Graceful shutdown signal
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to install CTRL+C signal handler: {}", e);
        std::future::pending::<()>().await;
    }
}
