//! Maps domain `AppError` to HTTP responses.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use vanish_core::error::{AppError, ErrorKind};

/// Standard API error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiErrorResponse {
    /// Always `false`.
    pub success: bool,
    /// Machine-readable error code.
    pub error: String,
    /// Human-readable message.
    pub message: String,
    /// Why content is unavailable (`deleted`, `expired`, `max_views_reached`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    /// Set when the caller must (re-)enter a password.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requires_password: Option<bool>,
}

/// Error type returned by every handler.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

/// Status code for an error kind.
pub fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::Gone => StatusCode::GONE,
        ErrorKind::PasswordRequired | ErrorKind::PasswordIncorrect => StatusCode::UNAUTHORIZED,
        ErrorKind::InvalidExpiry | ErrorKind::Validation => StatusCode::BAD_REQUEST,
        ErrorKind::Conflict => StatusCode::CONFLICT,
        ErrorKind::StoreUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        ErrorKind::Storage
        | ErrorKind::Configuration
        | ErrorKind::Serialization
        | ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let err = self.0;
        let status = status_for(err.kind);

        let message = if status.is_server_error() {
            tracing::error!(kind = %err.kind, error = %err, "Request failed");
            match err.kind {
                ErrorKind::StoreUnavailable => "Service temporarily unavailable, retry later",
                _ => "Internal server error",
            }
            .to_string()
        } else {
            err.message.clone()
        };

        let requires_password = matches!(
            err.kind,
            ErrorKind::PasswordRequired | ErrorKind::PasswordIncorrect
        )
        .then_some(true);

        let body = ApiErrorResponse {
            success: false,
            error: err.kind.to_string(),
            message,
            reason: err
                .reason
                .filter(|r| r.is_gone())
                .map(|r| r.as_str().to_string()),
            requires_password,
        };

        (status, Json(body)).into_response()
    }
}
