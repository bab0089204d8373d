//! API error handling

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use market_core::FeeError;
use market_escrow::EscrowError;
use serde_json::json;
use thiserror::Error;

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Fee(#[from] FeeError),

    #[error(transparent)]
    Escrow(#[from] EscrowError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match &self {
            ApiError::Fee(e) => match e {
                FeeError::InvalidAmount(_) => {
                    (StatusCode::BAD_REQUEST, "invalid_amount", e.to_string())
                }
                FeeError::UnknownTaskType(_) => {
                    (StatusCode::BAD_REQUEST, "unknown_task_type", e.to_string())
                }
            },
            ApiError::Escrow(e) => match e {
                EscrowError::DuplicateEscrow(_) => {
                    (StatusCode::CONFLICT, "duplicate_escrow", e.to_string())
                }
                EscrowError::InvalidTransition { .. } => {
                    (StatusCode::CONFLICT, "invalid_transition", e.to_string())
                }
                EscrowError::ReleaseNotDue { .. } => {
                    (StatusCode::CONFLICT, "release_not_due", e.to_string())
                }
                EscrowError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found", e.to_string()),
                EscrowError::InvalidAmount(_) => {
                    (StatusCode::BAD_REQUEST, "invalid_amount", e.to_string())
                }
                EscrowError::Storage(_) => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "storage_error",
                    e.to_string(),
                ),
            },
        };

        if status.is_server_error() {
            tracing::error!("{}", message);
        }

        let body = Json(json!({
            "error": error_type,
            "message": message,
        }));

        (status, body).into_response()
    }
}
