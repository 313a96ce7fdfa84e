//! Uniform result envelope returned by every OASIS operation
//!
//! Every manager call and every HTTP response carries a [`ResultEnvelope`]:
//! the data (if any), whether the call failed, a human-readable message and,
//! for failures, a structured [`ErrorDetail`].

use serde::{Deserialize, Serialize};

use crate::error::OperationError;

/// Where in the request pipeline a failure originated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    /// Caller supplied malformed or missing input
    Validation,
    /// The business operation reported a failure
    Operation,
    /// The operation could not run (storage down, timeout, panic)
    Dependency,
}

/// Structured cause attached to failed envelopes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorDetail {
    pub kind: ErrorKind,
    pub code: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub causes: Vec<String>,
}

impl ErrorDetail {
    pub fn new(kind: ErrorKind, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            code: code.into(),
            message: message.into(),
            causes: Vec::new(),
        }
    }

    /// True when the failure came from a dependency rather than the caller
    /// or the business rules.
    pub fn is_dependency(&self) -> bool {
        self.kind == ErrorKind::Dependency
    }
}

impl From<&OperationError> for ErrorDetail {
    fn from(err: &OperationError) -> Self {
        let mut causes = Vec::new();
        let mut source = std::error::Error::source(err);
        while let Some(inner) = source {
            causes.push(inner.to_string());
            source = inner.source();
        }

        Self {
            kind: ErrorKind::Dependency,
            code: err.code().to_string(),
            message: err.to_string(),
            causes,
        }
    }
}

/// Success/error/message container
///
/// Serialized as `{ "result": ..., "isError": ..., "message": ..., "errorDetail": ... }`.
/// `message` defaults to the empty string, so clients never have to null-check it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultEnvelope<T> {
    pub result: Option<T>,
    pub is_error: bool,
    #[serde(default)]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_detail: Option<ErrorDetail>,
}

impl<T> ResultEnvelope<T> {
    /// Successful outcome carrying data
    pub fn success(value: T, message: impl Into<String>) -> Self {
        Self {
            result: Some(value),
            is_error: false,
            message: message.into(),
            error_detail: None,
        }
    }

    /// Successful outcome with nothing to return
    pub fn empty(message: impl Into<String>) -> Self {
        Self {
            result: None,
            is_error: false,
            message: message.into(),
            error_detail: None,
        }
    }

    /// Business failure reported by a manager ("Clan not found.")
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            result: None,
            is_error: true,
            message: message.into(),
            error_detail: None,
        }
    }

    /// Caller mistake detected before any operation ran
    pub fn validation(message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            result: None,
            is_error: true,
            error_detail: Some(ErrorDetail::new(
                ErrorKind::Validation,
                "VALIDATION_ERROR",
                message.clone(),
            )),
            message,
        }
    }

    /// Failure envelope for an operation that errored instead of returning.
    pub fn from_error(action: &str, err: &OperationError) -> Self {
        Self {
            result: None,
            is_error: true,
            message: format!("Error {}: {}", action, err),
            error_detail: Some(ErrorDetail::from(err)),
        }
    }

    /// Attach an explicit error detail
    pub fn with_detail(mut self, detail: ErrorDetail) -> Self {
        self.error_detail = Some(detail);
        self
    }

    pub fn has_value(&self) -> bool {
        self.result.is_some()
    }

    /// True when the envelope failed because a dependency broke
    pub fn is_dependency_failure(&self) -> bool {
        self.is_error
            && self
                .error_detail
                .as_ref()
                .map(ErrorDetail::is_dependency)
                .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_success_serializes_camel_case() {
        let envelope = ResultEnvelope::success(vec![1, 2], "Loaded.");
        let body = serde_json::to_value(&envelope).unwrap();

        assert_eq!(
            body,
            json!({ "result": [1, 2], "isError": false, "message": "Loaded." })
        );
    }

    #[test]
    fn test_missing_message_defaults_to_empty() {
        let envelope: ResultEnvelope<u32> =
            serde_json::from_value(json!({ "result": 3, "isError": false })).unwrap();

        assert_eq!(envelope.message, "");
        assert_eq!(envelope.result, Some(3));
    }

    #[test]
    fn test_failure_has_no_value() {
        let envelope: ResultEnvelope<String> = ResultEnvelope::failure("Clan not found.");
        assert!(envelope.is_error);
        assert!(!envelope.has_value());
        assert!(envelope.error_detail.is_none());
        assert!(!envelope.is_dependency_failure());
    }

    #[test]
    fn test_from_error_message_and_detail() {
        let err = OperationError::ConnectionRefused("localhost:5432".to_string());
        let envelope: ResultEnvelope<()> = ResultEnvelope::from_error("loading clan", &err);

        assert!(envelope.is_error);
        assert_eq!(envelope.message, "Error loading clan: Connection refused");
        let detail = envelope.error_detail.clone().unwrap();
        assert_eq!(detail.kind, ErrorKind::Dependency);
        assert_eq!(detail.code, "CONNECTION_REFUSED");
        assert!(envelope.is_dependency_failure());
    }

    #[test]
    fn test_validation_detail_kind() {
        let envelope: ResultEnvelope<()> = ResultEnvelope::validation("Clan name is required.");
        assert!(envelope.is_error);
        assert_eq!(
            envelope.error_detail.map(|d| d.kind),
            Some(ErrorKind::Validation)
        );
    }

    #[test]
    fn test_error_detail_walks_source_chain() {
        let inner = anyhow::anyhow!("socket closed").context("reading row");
        let err = OperationError::from(inner);
        let detail = ErrorDetail::from(&err);

        assert_eq!(detail.code, "OPERATION_FAILED");
        assert_eq!(detail.causes, vec!["socket closed".to_string()]);
    }
}
