//! API error type with JSON responses.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use tracing::error;
use zeitsaldo_core::auth::PasswordError;
use zeitsaldo_core::ledger::{CsvImportError, ReportError, ValidationError};
use zeitsaldo_store::StoreError;

/// An API-facing error: status code, stable error code, human message.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    code: &'static str,
    message: String,
}

impl ApiError {
    /// Creates an error from its parts.
    #[must_use]
    pub fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
        }
    }

    /// 404 for a missing ledger entry.
    #[must_use]
    pub fn entry_not_found() -> Self {
        Self::new(StatusCode::NOT_FOUND, "ENTRY_NOT_FOUND", "entry not found")
    }

    /// 401 for missing or invalid credentials and sessions.
    #[must_use]
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "UNAUTHORIZED", message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(json!({ "error": self.code, "message": self.message })),
        )
            .into_response()
    }
}

impl From<ValidationError> for ApiError {
    fn from(e: ValidationError) -> Self {
        Self::new(StatusCode::BAD_REQUEST, e.error_code(), e.to_string())
    }
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        error!(error = %e, "store failure");
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "STORE_ERROR",
            "persistence failure",
        )
    }
}

impl From<CsvImportError> for ApiError {
    fn from(e: CsvImportError) -> Self {
        let code = match e {
            CsvImportError::Empty => "EMPTY_IMPORT",
            CsvImportError::Header(_) => "INVALID_IMPORT",
        };
        Self::new(StatusCode::BAD_REQUEST, code, e.to_string())
    }
}

impl From<ReportError> for ApiError {
    fn from(e: ReportError) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "INVALID_MONTH", e.to_string())
    }
}

impl From<PasswordError> for ApiError {
    fn from(e: PasswordError) -> Self {
        match e {
            PasswordError::TooShort => {
                Self::new(StatusCode::BAD_REQUEST, "PASSWORD_TOO_SHORT", e.to_string())
            }
            _ => {
                error!(error = %e, "password operation failed");
                Self::new(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "password operation failed",
                )
            }
        }
    }
}
