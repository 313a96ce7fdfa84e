//! Envelope to HTTP response mapping

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::envelope::ResultEnvelope;

/// Status code and envelope body ready to be written
#[derive(Debug, Clone, PartialEq)]
pub struct EnvelopeResponse<T> {
    pub status: StatusCode,
    pub body: ResultEnvelope<T>,
}

/// Default status: 200 for success, 400 for any error. Anything finer
/// (401/404/500) must come from the caller as `explicit`.
pub fn status_for<T>(envelope: &ResultEnvelope<T>, explicit: Option<StatusCode>) -> StatusCode {
    match explicit {
        Some(status) => status,
        None if envelope.is_error => StatusCode::BAD_REQUEST,
        None => StatusCode::OK,
    }
}

/// Pair an envelope with its status. The body is never unwrapped.
pub fn map<T>(envelope: ResultEnvelope<T>, explicit: Option<StatusCode>) -> EnvelopeResponse<T> {
    EnvelopeResponse {
        status: status_for(&envelope, explicit),
        body: envelope,
    }
}

impl<T: Serialize> IntoResponse for EnvelopeResponse<T> {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::OperationError;

    #[test]
    fn test_default_success_status() {
        let response = map(ResultEnvelope::success(5, "ok"), None);
        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.body.result, Some(5));
    }

    #[test]
    fn test_empty_success_is_ok() {
        let response = map(ResultEnvelope::<u8>::empty("Nothing found."), None);
        assert_eq!(response.status, StatusCode::OK);
    }

    #[test]
    fn test_default_error_status() {
        let response = map(ResultEnvelope::<u8>::failure("Clan not found."), None);
        assert_eq!(response.status, StatusCode::BAD_REQUEST);
        assert!(response.body.is_error);
    }

    #[test]
    fn test_explicit_status_wins() {
        let err = OperationError::ConnectionRefused(String::new());
        let response = map(
            ResultEnvelope::<u8>::from_error("loading clan", &err),
            Some(StatusCode::INTERNAL_SERVER_ERROR),
        );
        assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);

        let response = map(ResultEnvelope::success(1, "ok"), Some(StatusCode::CREATED));
        assert_eq!(response.status, StatusCode::CREATED);
    }

    #[test]
    fn test_map_is_idempotent() {
        let envelope = ResultEnvelope::<Vec<u8>>::failure("Avatar is not a member.");
        let first = map(envelope.clone(), None);
        let second = map(envelope, None);
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_body_is_full_envelope() {
        let response = map(ResultEnvelope::<u8>::failure("bad"), None).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["isError"], true);
        assert_eq!(body["message"], "bad");
        assert!(body["result"].is_null());
    }
}
