//! Points API handlers.
//!
//! This module provides the HTTP endpoints for the points ledger:
//! - Creating a user account
//! - Recording an earn transaction from a payer
//! - Spending points (oldest first)
//! - Querying total or per-payer balances
//!
//! # Examples
//!
//! Record a transaction:
//! ```bash
//! curl -X POST http://localhost:8000/api/alice/transaction \
//!   -H "Content-Type: application/json" \
//!   -d '{"payer": "DANNON", "points": 300, "timestamp": "2020-10-31T10:00:00Z"}'
//! ```
//!
//! Spend points:
//! ```bash
//! curl -X PUT http://localhost:8000/api/alice/spend \
//!   -H "Content-Type: application/json" \
//!   -d '{"points": 5000}'
//! ```

use axum::{
    Json,
    extract::{Path, Query, State, rejection::JsonRejection},
};
use points_ledger::{PayerBalances, Points};
use serde::{Deserialize, Serialize};

use super::{
    AppState,
    errors::{ApiError, ApiResponse, ApiResult, Empty},
};
use crate::{
    metrics,
    validation::{PointsField, parse_timestamp},
};

#[derive(Debug, Deserialize)]
pub struct TransactionPayload {
    pub payer: String,
    pub points: PointsField,
    pub timestamp: String,
}

#[derive(Debug, Deserialize)]
pub struct SpendPayload {
    pub points: PointsField,
}

#[derive(Debug, Default, Deserialize)]
pub struct PointsQuery {
    pub itemized: Option<String>,
}

/// Either per-payer balances or the total
#[derive(Debug, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum PointsView {
    Itemized(PayerBalances),
    Total(Points),
}

/// Register a new user.
///
/// # Response
///
/// Returns `200 OK` with `{"response": {}, "success": true}`.
///
/// # Errors
///
/// - `409 Conflict`: User already exists
pub async fn create_account(
    State(state): State<AppState>,
    Path(user): Path<String>,
) -> ApiResult<Json<ApiResponse<Empty>>> {
    state.ledger.create_account(&user).await?;
    metrics::accounts_created_total();
    Ok(Json(ApiResponse::ok(Empty {})))
}

/// Record points earned from a payer.
///
/// # Request Body
///
/// ```json
/// {
///   "payer": "DANNON",
///   "points": 300,
///   "timestamp": "2020-10-31T10:00:00Z"
/// }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Invalid timestamp, blank payer, or non-positive points
/// - `404 Not Found`: User doesn't exist
pub async fn record_transaction(
    State(state): State<AppState>,
    Path(user): Path<String>,
    payload: Result<Json<TransactionPayload>, JsonRejection>,
) -> ApiResult<Json<ApiResponse<Empty>>> {
    let Json(payload) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    // Payer names are stored exactly as sent
    if payload.payer.trim().is_empty() {
        return Err(ApiError::BadRequest("Payer must not be blank".to_string()));
    }
    let points = require_points(&payload.points)?;
    let earned_at = parse_timestamp(&payload.timestamp)?;

    state
        .ledger
        .record_earn(&user, &payload.payer, points, earned_at)
        .await?;
    metrics::points_earned_total(points);

    Ok(Json(ApiResponse::ok(Empty {})))
}

/// Spend points, oldest first.
///
/// # Request Body
///
/// ```json
/// { "points": 5000 }
/// ```
///
/// # Response
///
/// Returns `200 OK` with the points taken from each payer:
/// ```json
/// { "response": { "DANNON": -100, "UNILEVER": -200 }, "success": true }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Points must be positive
/// - `404 Not Found`: User doesn't exist
/// - `422 Unprocessable Entity`: Not enough points
pub async fn spend_points(
    State(state): State<AppState>,
    Path(user): Path<String>,
    payload: Result<Json<SpendPayload>, JsonRejection>,
) -> ApiResult<Json<ApiResponse<PayerBalances>>> {
    let Json(payload) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    let points = require_points(&payload.points)?;
    if points <= 0 {
        return Err(ApiError::BadRequest("Points must be positive".to_string()));
    }

    let spent = state.ledger.spend(&user, points).await?;
    metrics::points_spent_total(points);

    Ok(Json(ApiResponse::ok(spent)))
}

/// Get a user's points.
///
/// `?itemized=1` returns the balance for each payer, otherwise the total.
///
/// # Errors
///
/// - `400 Bad Request`: `itemized` is not a number or boolean
/// - `404 Not Found`: User doesn't exist
pub async fn get_points(
    State(state): State<AppState>,
    Path(user): Path<String>,
    Query(query): Query<PointsQuery>,
) -> ApiResult<Json<ApiResponse<PointsView>>> {
    let itemized = match query.itemized.as_deref() {
        None => false,
        Some(raw) => parse_flag(raw).ok_or_else(|| {
            ApiError::BadRequest(format!("Invalid value for itemized: {raw}"))
        })?,
    };

    let summary = state.ledger.account_summary(&user).await?;
    let view = if itemized {
        PointsView::Itemized(summary.balances)
    } else {
        PointsView::Total(summary.total)
    };

    Ok(Json(ApiResponse::ok(view)))
}

fn require_points(field: &PointsField) -> ApiResult<Points> {
    field
        .value()
        .ok_or_else(|| ApiError::BadRequest("Points must be an integer".to_string()))
}

/// `1`/`true` style query flags; any non-zero integer counts as set
fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" => Some(true),
        "false" | "" => Some(false),
        other => other.parse::<i64>().ok().map(|n| n != 0),
    }
}
