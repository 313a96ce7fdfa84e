//! Test-data fallback policy
//!
//! When the operator enables `USE_TEST_DATA_WHEN_LIVE_DATA_NOT_AVAILABLE`,
//! read endpoints answer with a deterministic placeholder instead of an error
//! whenever the live operation fails or returns nothing. Substituted responses
//! always carry the [`TEST_DATA_MARKER`] in their message.

use std::borrow::Cow;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::envelope::{ErrorDetail, ErrorKind, ResultEnvelope};
use crate::error::OperationError;

/// Suffix appended to every substituted success message
pub const TEST_DATA_MARKER: &str = "(using test data)";

/// Environment variable holding the process-wide switch
pub const TEST_DATA_ENV_VAR: &str = "USE_TEST_DATA_WHEN_LIVE_DATA_NOT_AVAILABLE";

/// Accessor for the process-wide test-data switch, sampled once per request
pub trait FallbackSwitch: Send + Sync {
    fn enabled(&self) -> bool;
}

/// Reads the switch from the environment on every call so a changed value
/// takes effect without a restart.
#[derive(Debug, Clone)]
pub struct EnvSwitch {
    var: String,
    default: bool,
}

impl EnvSwitch {
    pub fn new(var: impl Into<String>, default: bool) -> Self {
        Self {
            var: var.into(),
            default,
        }
    }
}

impl FallbackSwitch for EnvSwitch {
    fn enabled(&self) -> bool {
        std::env::var(&self.var)
            .ok()
            .and_then(|raw| parse_flag(&raw))
            .unwrap_or(self.default)
    }
}

/// In-process switch that can be flipped at runtime
#[derive(Debug, Default)]
pub struct ToggleSwitch(AtomicBool);

impl ToggleSwitch {
    pub fn new(enabled: bool) -> Self {
        Self(AtomicBool::new(enabled))
    }

    pub fn set(&self, enabled: bool) {
        self.0.store(enabled, Ordering::Relaxed);
    }
}

impl FallbackSwitch for ToggleSwitch {
    fn enabled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Parse the boolean spellings accepted for the switch
pub fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Deterministic stand-in for live data, supplied per endpoint
pub struct Placeholder<T> {
    factory: Arc<dyn Fn() -> T + Send + Sync>,
    message: Cow<'static, str>,
}

impl<T> Placeholder<T> {
    /// `message` is the endpoint's normal success text; the test-data marker
    /// is appended on substitution.
    pub fn new(
        message: impl Into<Cow<'static, str>>,
        factory: impl Fn() -> T + Send + Sync + 'static,
    ) -> Self {
        Self {
            factory: Arc::new(factory),
            message: message.into(),
        }
    }

    pub fn message(&self) -> String {
        format!("{} {}", self.message, TEST_DATA_MARKER)
    }

    /// Build the substituted success envelope
    pub fn envelope(&self) -> ResultEnvelope<T> {
        ResultEnvelope::success((self.factory)(), self.message())
    }
}

impl<T> Clone for Placeholder<T> {
    fn clone(&self) -> Self {
        Self {
            factory: Arc::clone(&self.factory),
            message: self.message.clone(),
        }
    }
}

impl<T> std::fmt::Debug for Placeholder<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Placeholder")
            .field("message", &self.message)
            .finish_non_exhaustive()
    }
}

/// Per-request fallback decision inputs
#[derive(Debug)]
pub struct FallbackPolicy<T> {
    enabled: bool,
    action: Cow<'static, str>,
    placeholder: Option<Placeholder<T>>,
}

impl<T> FallbackPolicy<T> {
    /// `action` reads as the tail of "Error {action}: ...", e.g. "loading clan".
    pub fn new(enabled: bool, action: impl Into<Cow<'static, str>>) -> Self {
        Self {
            enabled,
            action: action.into(),
            placeholder: None,
        }
    }

    pub fn with_placeholder(mut self, placeholder: Placeholder<T>) -> Self {
        self.placeholder = Some(placeholder);
        self
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn action(&self) -> &str {
        &self.action
    }

    /// Placeholder to substitute with, if substitution is switched on for
    /// this request. Policies without a placeholder never substitute.
    pub fn active_placeholder(&self) -> Option<&Placeholder<T>> {
        if self.enabled {
            self.placeholder.as_ref()
        } else {
            None
        }
    }
}

/// What happened when the operation was invoked
#[derive(Debug)]
pub struct OperationOutcome<T> {
    pub attempted: bool,
    pub raw_result: Option<ResultEnvelope<T>>,
    pub thrown: Option<OperationError>,
}

impl<T> OperationOutcome<T> {
    pub fn returned(envelope: ResultEnvelope<T>) -> Self {
        Self {
            attempted: true,
            raw_result: Some(envelope),
            thrown: None,
        }
    }

    pub fn thrown(err: OperationError) -> Self {
        Self {
            attempted: true,
            raw_result: None,
            thrown: Some(err),
        }
    }

    /// Thrown, missing, failed or valueless outcomes all qualify.
    pub fn needs_substitution(&self) -> bool {
        if self.thrown.is_some() {
            return true;
        }
        match &self.raw_result {
            None => true,
            Some(envelope) => envelope.is_error || envelope.result.is_none(),
        }
    }
}

/// Decide between the live outcome and placeholder data
pub fn evaluate<T>(outcome: OperationOutcome<T>, policy: &FallbackPolicy<T>) -> ResultEnvelope<T> {
    if let Some(placeholder) = policy.active_placeholder() {
        if outcome.needs_substitution() {
            tracing::warn!(
                action = %policy.action(),
                thrown = outcome.thrown.is_some(),
                "Live data unavailable, substituting test data"
            );
            return placeholder.envelope();
        }
    }

    // A thrown error outranks anything the operation may have produced.
    if let Some(err) = outcome.thrown {
        return ResultEnvelope::from_error(policy.action(), &err);
    }

    match outcome.raw_result {
        Some(envelope) => envelope,
        None => {
            let message = format!("Error {}: operation produced no result", policy.action());
            ResultEnvelope::failure(message.clone()).with_detail(ErrorDetail::new(
                ErrorKind::Dependency,
                "NO_RESULT",
                message,
            ))
        }
    }
}
