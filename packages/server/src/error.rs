use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use common::storage::StorageError;
use sea_orm::DbErr;
use serde::Serialize;

use crate::donation::DonationError;
use crate::payment::GatewayError;

/// Structured error response returned by all endpoints on failure.
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorBody {
    /// HTTP status code, repeated in the body.
    #[schema(example = 400)]
    pub status: u16,
    /// Machine-readable error code. One of: `VALIDATION_ERROR`, `TOKEN_MISSING`,
    /// `TOKEN_INVALID`, `INVALID_CREDENTIALS`, `PERMISSION_DENIED`, `NOT_FOUND`,
    /// `USERNAME_TAKEN`, `UPLOAD_FAILED`, `STORAGE_UNAVAILABLE`, `GATEWAY_ERROR`,
    /// `GATEWAY_UNAVAILABLE`, `INTERNAL_ERROR`.
    #[schema(example = "VALIDATION_ERROR")]
    pub code: &'static str,
    /// Human-readable error description.
    #[schema(example = "Title must be 1-256 characters")]
    pub message: String,
}

/// Application-level error type.
#[derive(Debug)]
pub enum AppError {
    Validation(String),
    TokenMissing,
    TokenInvalid,
    InvalidCredentials,
    PermissionDenied,
    NotFound(String),
    UsernameTaken,
    /// A photo could not be handed to object storage.
    Upload(String),
    StorageUnavailable,
    /// The payment gateway rejected the request or could not be reached.
    Gateway(String),
    GatewayUnavailable,
    Internal(String),
}

impl AppError {
    fn status_and_body(self) -> (StatusCode, &'static str, String) {
        match self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg),
            AppError::TokenMissing => (
                StatusCode::UNAUTHORIZED,
                "TOKEN_MISSING",
                "Authentication required".into(),
            ),
            AppError::TokenInvalid => (
                StatusCode::UNAUTHORIZED,
                "TOKEN_INVALID",
                "Invalid or expired token".into(),
            ),
            AppError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                "INVALID_CREDENTIALS",
                "Invalid username or password".into(),
            ),
            AppError::PermissionDenied => (
                StatusCode::FORBIDDEN,
                "PERMISSION_DENIED",
                "Insufficient permissions".into(),
            ),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg),
            AppError::UsernameTaken => (
                StatusCode::CONFLICT,
                "USERNAME_TAKEN",
                "Username is already taken".into(),
            ),
            AppError::Upload(detail) => {
                tracing::error!("Upload failed: {}", detail);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "UPLOAD_FAILED",
                    "Failed to upload file".into(),
                )
            }
            AppError::StorageUnavailable => (
                StatusCode::SERVICE_UNAVAILABLE,
                "STORAGE_UNAVAILABLE",
                "File uploads are not configured".into(),
            ),
            AppError::Gateway(detail) => {
                tracing::error!("Payment gateway error: {}", detail);
                (
                    StatusCode::BAD_GATEWAY,
                    "GATEWAY_ERROR",
                    "Payment gateway request failed".into(),
                )
            }
            AppError::GatewayUnavailable => (
                StatusCode::SERVICE_UNAVAILABLE,
                "GATEWAY_UNAVAILABLE",
                "Payments are not configured".into(),
            ),
            AppError::Internal(detail) => {
                tracing::error!("Internal error: {}", detail);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An unexpected error occurred".into(),
                )
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.status_and_body();
        let body = ErrorBody {
            status: status.as_u16(),
            code,
            message,
        };
        (status, Json(body)).into_response()
    }
}

impl From<DbErr> for AppError {
    fn from(err: DbErr) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        AppError::Upload(err.to_string())
    }
}

impl From<GatewayError> for AppError {
    fn from(err: GatewayError) -> Self {
        AppError::Gateway(err.to_string())
    }
}

impl From<DonationError> for AppError {
    fn from(err: DonationError) -> Self {
        match err {
            DonationError::NotFound => AppError::NotFound("Donation not found".into()),
            DonationError::Unauthorized => AppError::TokenMissing,
            DonationError::Forbidden => AppError::PermissionDenied,
            DonationError::Validation(msg) => AppError::Validation(msg),
            DonationError::Persistence(e) => AppError::Internal(e.to_string()),
        }
    }
}
