//! Centralized error handling for the OASIS API gateway
//!
//! Two error families live here:
//! - [`ApiError`]: failures detected by a controller *before* any business
//!   operation runs (validation, missing avatar). They render as error
//!   envelopes with an explicit status and are never eligible for test data.
//! - [`OperationError`]: what a business operation "throws". The executor
//!   converts it into an envelope, or into placeholder data when enabled.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::envelope::{ErrorDetail, ErrorKind, ResultEnvelope};
use crate::response;

/// API error type with HTTP status code mapping
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    /// Get the error code string
    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::Validation(_) => "VALIDATION_ERROR",
            ApiError::Unauthorized(_) => "UNAUTHORIZED",
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Get the HTTP status code
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn kind(&self) -> ErrorKind {
        match self {
            ApiError::Internal(_) => ErrorKind::Dependency,
            ApiError::NotFound(_) => ErrorKind::Operation,
            ApiError::Validation(_) | ApiError::Unauthorized(_) => ErrorKind::Validation,
        }
    }

    /// Render as an error envelope
    pub fn to_envelope(&self) -> ResultEnvelope<()> {
        let message = self.to_string();
        ResultEnvelope::failure(message.clone()).with_detail(ErrorDetail::new(
            self.kind(),
            self.error_code(),
            message,
        ))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!(error = %self, code = %self.error_code(), "Server error occurred");
        } else {
            tracing::debug!(error = %self, code = %self.error_code(), "Request rejected");
        }

        response::map(self.to_envelope(), Some(status)).into_response()
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(err: validator::ValidationErrors) -> Self {
        ApiError::Validation(err.to_string())
    }
}

/// Failure raised by a business operation instead of returning an envelope
#[derive(Error, Debug)]
pub enum OperationError {
    #[error("Connection refused")]
    ConnectionRefused(String),

    #[error("Operation timed out: {0}")]
    Timeout(String),

    #[error("Provider unavailable: {0}")]
    Unavailable(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Serialization failure: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Operation panicked: {0}")]
    Panicked(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl OperationError {
    /// Stable code surfaced in `errorDetail.code`
    pub fn code(&self) -> &'static str {
        match self {
            OperationError::ConnectionRefused(_) => "CONNECTION_REFUSED",
            OperationError::Timeout(_) => "TIMEOUT",
            OperationError::Unavailable(_) => "PROVIDER_UNAVAILABLE",
            OperationError::Storage(_) => "STORAGE_ERROR",
            OperationError::Serialization(_) => "SERIALIZATION_ERROR",
            OperationError::Panicked(_) => "PANICKED",
            OperationError::Other(_) => "OPERATION_FAILED",
        }
    }
}

impl From<sqlx::Error> for OperationError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::PoolTimedOut => {
                OperationError::Timeout("timed out acquiring a database connection".to_string())
            }
            sqlx::Error::PoolClosed => {
                OperationError::Unavailable("database pool is closed".to_string())
            }
            sqlx::Error::Io(io) if io.kind() == std::io::ErrorKind::ConnectionRefused => {
                OperationError::ConnectionRefused(io.to_string())
            }
            sqlx::Error::Io(io) if io.kind() == std::io::ErrorKind::TimedOut => {
                OperationError::Timeout(io.to_string())
            }
            other => OperationError::Storage(other.to_string()),
        }
    }
}
