//! HTTP error types for the Pagecraft server.
//!
//! Maps domain errors from `pagecraft-core` into appropriate HTTP responses.
//! Every error variant produces a JSON body with a machine-readable `error`
//! field and a human-readable `message`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use pagecraft_core::{CaptureError, ConfigError, GenerationError, PageError, ThemeError};
use pagecraft_storage::StorageError;

/// Application-level error returned from HTTP handlers.
#[derive(Debug)]
pub enum AppError {
    /// No valid session.
    Unauthorized(String),
    /// Requested resource not found.
    NotFound(String),
    /// Client sent invalid input.
    BadRequest(String),
    /// A uniqueness conflict in storage.
    Conflict(String),
    /// The AI provider failed; the message carries retry guidance.
    GenerationFailed(String),
    /// Internal server error.
    Internal(String),
}

/// JSON error response body.
#[derive(Serialize)]
struct ErrorBody {
    error: &'static str,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match self {
            Self::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "unauthorized", msg),
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg),
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg),
            Self::Conflict(msg) => (StatusCode::CONFLICT, "conflict", msg),
            Self::GenerationFailed(msg) => (StatusCode::BAD_GATEWAY, "generation_failed", msg),
            Self::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", msg),
        };

        let body = ErrorBody {
            error: error_type,
            message,
        };

        (status, axum::Json(body)).into_response()
    }
}

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::Conflict { .. } => Self::Conflict(err.to_string()),
            StorageError::MissingReference { .. } => Self::NotFound(err.to_string()),
            StorageError::Open { .. } | StorageError::Read { .. } | StorageError::Write { .. } => {
                tracing::error!(error = %err, "storage failure");
                Self::Internal(err.to_string())
            }
        }
    }
}

impl From<ThemeError> for AppError {
    fn from(err: ThemeError) -> Self {
        Self::BadRequest(err.to_string())
    }
}

impl From<ConfigError> for AppError {
    fn from(err: ConfigError) -> Self {
        Self::BadRequest(err.to_string())
    }
}

impl From<GenerationError> for AppError {
    fn from(err: GenerationError) -> Self {
        match err {
            GenerationError::EmptyPrompt => Self::BadRequest(err.to_string()),
            GenerationError::Failed { .. } => Self::GenerationFailed(err.to_string()),
        }
    }
}

impl From<CaptureError> for AppError {
    fn from(err: CaptureError) -> Self {
        match err {
            CaptureError::MissingField { .. } | CaptureError::InvalidField { .. } => {
                Self::BadRequest(err.to_string())
            }
            CaptureError::Storage(inner) => inner.into(),
        }
    }
}

impl From<PageError> for AppError {
    fn from(err: PageError) -> Self {
        match err {
            PageError::NotFound { .. } => Self::NotFound(err.to_string()),
            PageError::InvalidReference { .. } => Self::BadRequest(err.to_string()),
            PageError::Generation(inner) => inner.into(),
            PageError::Config(inner) => inner.into(),
            PageError::Storage(inner) => inner.into(),
        }
    }
}
