//! Application error type and its HTTP mapping.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Value, json};
use validator::ValidationErrors;

use crate::domain::repositories::StoreError;

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorInfo,
}

/// Machine-readable error payload returned to API clients.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorInfo {
    pub code: &'static str,
    pub message: String,
    pub details: Value,
}

/// Errors surfaced by services and handlers.
///
/// Every variant carries a human-readable message and structured details.
/// Each kind maps to exactly one HTTP status; none is retried automatically.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Request body failed shape validation.
    #[error("{message}")]
    Validation { message: String, details: Value },

    /// Target URL does not satisfy the URL syntax contract.
    #[error("{message}")]
    InvalidUrl { message: String, details: Value },

    /// Custom short code is malformed or reserved.
    #[error("{message}")]
    InvalidCode { message: String, details: Value },

    /// Custom short code is already held by another record.
    #[error("{message}")]
    CodeTaken { message: String, details: Value },

    /// Every generated candidate collided within the attempt budget.
    #[error("{message}")]
    AllocationExhausted { message: String, details: Value },

    #[error("{message}")]
    NotFound { message: String, details: Value },

    /// The code exists but its validity window has passed.
    #[error("{message}")]
    Expired { message: String, details: Value },

    #[error("{message}")]
    Internal { message: String, details: Value },
}

impl AppError {
    pub fn bad_request(message: impl Into<String>, details: Value) -> Self {
        Self::Validation {
            message: message.into(),
            details,
        }
    }
    pub fn invalid_url(message: impl Into<String>, details: Value) -> Self {
        Self::InvalidUrl {
            message: message.into(),
            details,
        }
    }
    pub fn invalid_code(message: impl Into<String>, details: Value) -> Self {
        Self::InvalidCode {
            message: message.into(),
            details,
        }
    }
    pub fn code_taken(message: impl Into<String>, details: Value) -> Self {
        Self::CodeTaken {
            message: message.into(),
            details,
        }
    }
    pub fn allocation_exhausted(message: impl Into<String>, details: Value) -> Self {
        Self::AllocationExhausted {
            message: message.into(),
            details,
        }
    }
    pub fn not_found(message: impl Into<String>, details: Value) -> Self {
        Self::NotFound {
            message: message.into(),
            details,
        }
    }
    pub fn expired(message: impl Into<String>, details: Value) -> Self {
        Self::Expired {
            message: message.into(),
            details,
        }
    }
    pub fn internal(message: impl Into<String>, details: Value) -> Self {
        Self::Internal {
            message: message.into(),
            details,
        }
    }

    /// HTTP status and stable error code for this kind.
    pub fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            Self::Validation { .. } => (StatusCode::BAD_REQUEST, "validation_error"),
            Self::InvalidUrl { .. } => (StatusCode::BAD_REQUEST, "invalid_url"),
            Self::InvalidCode { .. } => (StatusCode::BAD_REQUEST, "invalid_code"),
            Self::CodeTaken { .. } => (StatusCode::CONFLICT, "code_taken"),
            Self::AllocationExhausted { .. } => {
                (StatusCode::SERVICE_UNAVAILABLE, "allocation_exhausted")
            }
            Self::NotFound { .. } => (StatusCode::NOT_FOUND, "not_found"),
            Self::Expired { .. } => (StatusCode::GONE, "expired"),
            Self::Internal { .. } => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
        }
    }

    fn details(&self) -> &Value {
        match self {
            Self::Validation { details, .. }
            | Self::InvalidUrl { details, .. }
            | Self::InvalidCode { details, .. }
            | Self::CodeTaken { details, .. }
            | Self::AllocationExhausted { details, .. }
            | Self::NotFound { details, .. }
            | Self::Expired { details, .. }
            | Self::Internal { details, .. } => details,
        }
    }

    /// Builds the client-facing payload, used for per-item batch errors.
    pub fn to_error_info(&self) -> ErrorInfo {
        let (_, code) = self.status_and_code();
        ErrorInfo {
            code,
            message: self.to_string(),
            details: self.details().clone(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, _) = self.status_and_code();

        if status.is_server_error() {
            tracing::error!(error = %self, details = %self.details(), "request failed");
        }

        let body = ErrorBody {
            error: self.to_error_info(),
        };

        (status, Json(body)).into_response()
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        let details = serde_json::to_value(&errors).unwrap_or_else(|_| json!({}));
        AppError::bad_request("Request validation failed", details)
    }
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::AlreadyExists(code) => AppError::code_taken(
                "Short code is already taken",
                json!({ "code": code }),
            ),
            StoreError::Backend(reason) => {
                AppError::internal("Storage error", json!({ "reason": reason }))
            }
        }
    }
}
