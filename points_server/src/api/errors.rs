//! API error mapping and the response envelope.
//!
//! Every response body has the shape `{"response": ..., "success": bool}`.
//! On failure `response` carries a client-safe message.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use points_ledger::LedgerError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{logging, metrics, validation::TimestampError};

/// Response envelope
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub response: T,
    pub success: bool,
}

impl<T> ApiResponse<T> {
    pub fn ok(response: T) -> Self {
        Self {
            response,
            success: true,
        }
    }
}

/// Serializes as `{}`, for operations with nothing to report
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Empty {}

/// API errors
#[derive(Debug, Error)]
pub enum ApiError {
    /// Rejected by the ledger
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// Timestamp could not be parsed
    #[error(transparent)]
    Timestamp(#[from] TimestampError),

    /// Malformed request body or parameters
    #[error("{0}")]
    BadRequest(String),
}

impl ApiError {
    /// HTTP status for this error
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Ledger(LedgerError::NotFound(_)) => StatusCode::NOT_FOUND,
            ApiError::Ledger(LedgerError::AlreadyExists(_)) => StatusCode::CONFLICT,
            ApiError::Ledger(LedgerError::InsufficientBalance { .. }) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            ApiError::Ledger(LedgerError::InvalidAmount(_) | LedgerError::BalanceOverflow) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::Ledger(LedgerError::Internal(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Timestamp(_) | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }

    /// Message safe to return to clients
    pub fn client_message(&self) -> String {
        match self {
            ApiError::Ledger(e) => e.client_message(),
            _ => self.to_string(),
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            ApiError::Ledger(e) => e.kind(),
            ApiError::Timestamp(_) => "invalid_timestamp",
            ApiError::BadRequest(_) => "bad_request",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        logging::log_ledger_rejection(self.kind(), status.as_u16(), &self.to_string());
        metrics::ledger_rejections_total(self.kind());

        let body = ApiResponse {
            response: self.client_message(),
            success: false,
        };
        (status, Json(body)).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
