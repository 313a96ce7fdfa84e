//! HTTP controllers
//!
//! Each handler validates its input, hands one manager call to the executor
//! and maps the resulting envelope to a response. Validation failures return
//! early as [`ApiError`] and never reach a manager.

pub mod avatar;
pub mod clan;
pub mod health;
pub mod settings;

pub use avatar::get_terms;
pub use clan::*;
pub use health::health_check;
pub use settings::*;

use axum::http::StatusCode;
use uuid::Uuid;

use crate::envelope::ResultEnvelope;
use crate::error::ApiError;

/// Status hint for lookups: broken dependency -> 500, business failure with
/// nothing to show -> 404.
pub(crate) fn read_status<T>(envelope: &ResultEnvelope<T>) -> Option<StatusCode> {
    if envelope.is_dependency_failure() {
        Some(StatusCode::INTERNAL_SERVER_ERROR)
    } else if envelope.is_error && !envelope.has_value() {
        Some(StatusCode::NOT_FOUND)
    } else {
        None
    }
}

/// Status hint for mutations: broken dependency -> 500, otherwise the
/// mapper default.
pub(crate) fn write_status<T>(envelope: &ResultEnvelope<T>) -> Option<StatusCode> {
    if envelope.is_dependency_failure() {
        Some(StatusCode::INTERNAL_SERVER_ERROR)
    } else {
        None
    }
}

/// Parse a route id, reporting the parameter name on failure
pub(crate) fn parse_id(raw: &str, name: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw.trim())
        .map_err(|_| ApiError::Validation(format!("{} must be a valid GUID, got '{}'.", name, raw)))
}
