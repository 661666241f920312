use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use services::services::{qr_code::QrCodeServiceError, redirect::RedirectTargetError};
use thiserror::Error;

const INTERNAL_ERROR_DETAIL: &str = "Internal server error";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    QrCode(#[from] QrCodeServiceError),
    #[error(transparent)]
    InvalidRedirectTarget(#[from] RedirectTargetError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status_code, error_type) = match &self {
            ApiError::QrCode(err) => match err {
                QrCodeServiceError::NotFound { .. } => (StatusCode::NOT_FOUND, "QrCodeNotFound"),
                QrCodeServiceError::Database(_) => {
                    (StatusCode::INTERNAL_SERVER_ERROR, "DatabaseError")
                }
            },
            ApiError::InvalidRedirectTarget(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "InvalidRedirectTarget")
            }
        };

        // Server-side failures never leak their cause to the client.
        let detail = match &self {
            ApiError::QrCode(err @ QrCodeServiceError::NotFound { .. }) => err.to_string(),
            _ => INTERNAL_ERROR_DETAIL.to_string(),
        };

        if status_code.is_server_error() {
            tracing::error!(
                status = %status_code,
                error_type,
                error = %self,
                "API request failed"
            );
        }
        (status_code, Json(json!({ "detail": detail }))).into_response()
    }
}
