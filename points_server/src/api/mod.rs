//! HTTP API for the points server.
//!
//! # Endpoints Overview
//!
//! - `POST /api/{user}/create` - Register a user
//! - `POST /api/{user}/transaction` - Record points earned from a payer
//! - `PUT  /api/{user}/spend` - Spend points, oldest first
//! - `GET  /api/{user}/points[?itemized=1]` - Total, or balance per payer
//! - `GET  /health` - Server health status
//!
//! Every body is wrapped as `{"response": ..., "success": bool}`.
//!
//! # Example Usage
//!
//! ```rust,no_run
//! use points_ledger::LedgerManager;
//! use points_server::api::{create_router, AppState};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let state = AppState {
//!     ledger: Arc::new(LedgerManager::new()),
//! };
//! let app = create_router(state);
//!
//! let listener = tokio::net::TcpListener::bind("127.0.0.1:8000").await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```

pub mod errors;
pub mod points;
pub mod request_id;

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post, put},
};
use points_ledger::PointsRepository;
use serde_json::json;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

pub use errors::{ApiError, ApiResponse, ApiResult, Empty};

/// Application state shared across all HTTP handlers.
///
/// Cloned per request; the ledger sits behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub ledger: Arc<dyn PointsRepository>,
}

/// Create the API router with all endpoints and middleware.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/{user}/create", post(points::create_account))
        .route("/api/{user}/transaction", post(points::record_transaction))
        .route("/api/{user}/spend", put(points::spend_points))
        .route("/api/{user}/points", get(points::get_points))
        .layer(axum::middleware::from_fn(request_id::request_id_middleware))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Health check endpoint for monitoring and load balancers.
///
/// # Example
///
/// ```bash
/// curl http://localhost:8000/health
/// # {"status":"healthy","version":"1.0.0","accounts":3,"timestamp":"2025-11-22T10:30:00+00:00"}
/// ```
async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let accounts = state.ledger.account_count().await;

    let response = json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
        "accounts": accounts,
        "timestamp": chrono::Utc::now().to_rfc3339(),
    });

    (StatusCode::OK, Json(response))
}
