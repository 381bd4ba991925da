//! Structured command error model
//!
//! This module defines [`CommandError`], the structured failure detail
//! carried by a `Failure` result, plus the standard error-code constants
//! and factory functions that commands use to produce consistent failures.
//!
//! A `CommandError` is a value, not a panic: command implementations catch
//! foreign errors at their boundary and translate them via [`wrap_error`]
//! or the factories into a `Failure` result. Foreign causes collapse to a
//! plain message string so that foreign-error identity never leaks into the
//! contract; only CommandError-to-CommandError wrapping nests, which bounds
//! cause-chain depth by construction.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::ToolgateError;

/// Machine-stable error code constants.
///
/// Codes group into families: caller input defects (not retryable),
/// resource-state defects (not retryable), authorization defects (not
/// retryable), backoff-worthy limits (retryable), transient network
/// conditions (retryable), and implementation defects.
pub mod codes {
    /// Input failed validation
    pub const VALIDATION_ERROR: &str = "VALIDATION_ERROR";
    /// Input was syntactically or semantically invalid
    pub const INVALID_INPUT: &str = "INVALID_INPUT";
    /// A required field was absent
    pub const MISSING_REQUIRED_FIELD: &str = "MISSING_REQUIRED_FIELD";
    /// The named resource does not exist
    pub const NOT_FOUND: &str = "NOT_FOUND";
    /// The named resource already exists
    pub const ALREADY_EXISTS: &str = "ALREADY_EXISTS";
    /// The operation conflicts with current resource state
    pub const CONFLICT: &str = "CONFLICT";
    /// The caller is not authenticated
    pub const UNAUTHORIZED: &str = "UNAUTHORIZED";
    /// The caller is authenticated but not permitted
    pub const FORBIDDEN: &str = "FORBIDDEN";
    /// Too many requests; back off and retry
    pub const RATE_LIMITED: &str = "RATE_LIMITED";
    /// A usage quota was exhausted
    pub const QUOTA_EXCEEDED: &str = "QUOTA_EXCEEDED";
    /// The backing service is temporarily unavailable
    pub const SERVICE_UNAVAILABLE: &str = "SERVICE_UNAVAILABLE";
    /// The operation exceeded its deadline
    pub const TIMEOUT: &str = "TIMEOUT";
    /// An unexpected implementation failure
    pub const INTERNAL_ERROR: &str = "INTERNAL_ERROR";
    /// The operation is recognized but not implemented
    pub const NOT_IMPLEMENTED: &str = "NOT_IMPLEMENTED";
    /// Fallback for un-typed foreign failures
    pub const UNKNOWN_ERROR: &str = "UNKNOWN_ERROR";
}

/// The cause of a [`CommandError`].
///
/// Either a nested `CommandError` (enabling chains) or a plain string
/// summary of a foreign error. Untagged on the wire: an object
/// deserializes as `Nested`, a string as `Message`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ErrorCause {
    /// A nested command error
    Nested(Box<CommandError>),
    /// A foreign error collapsed to its message
    Message(String),
}

/// Structured failure detail carried by a `Failure` result.
///
/// # Examples
///
/// ```
/// use toolgate::core::CommandError;
///
/// let err = CommandError::new("RATE_LIMITED", "Too many requests")
///     .with_suggestion("Wait 60 seconds")
///     .retryable(true);
/// assert_eq!(err.code, "RATE_LIMITED");
/// assert!(err.retryable);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandError {
    /// Short machine-stable identifier (see [`codes`])
    pub code: String,
    /// Human-readable description of the failure
    pub message: String,
    /// Actionable remediation text
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
    /// Whether retrying the same call may succeed
    #[serde(default)]
    pub retryable: bool,
    /// Opaque caller-defined context
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Map<String, Value>>,
    /// What caused this error, if anything
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cause: Option<ErrorCause>,
}

impl CommandError {
    /// Create an error with the required code and message.
    ///
    /// `retryable` defaults to `false`; the factories override it where
    /// the taxonomy says so.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            suggestion: None,
            retryable: false,
            details: None,
            cause: None,
        }
    }

    /// Set the remediation suggestion.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Set the retryable flag.
    pub fn retryable(mut self, retryable: bool) -> Self {
        self.retryable = retryable;
        self
    }

    /// Attach an opaque details map.
    pub fn with_details(mut self, details: Map<String, Value>) -> Self {
        self.details = Some(details);
        self
    }

    /// Insert a single details entry, creating the map if absent.
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.details
            .get_or_insert_with(Map::new)
            .insert(key.into(), value.into());
        self
    }

    /// Attach a cause.
    ///
    /// A [`CommandError`] cause nests; anything else should be collapsed to
    /// a message string first (see [`ErrorSource`]).
    pub fn with_cause(mut self, cause: ErrorCause) -> Self {
        self.cause = Some(cause);
        self
    }

    /// Attach a nested command error as the cause.
    pub fn caused_by(self, cause: CommandError) -> Self {
        self.with_cause(ErrorCause::Nested(Box::new(cause)))
    }
}

impl std::fmt::Display for CommandError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for CommandError {}

/// Anything that can be collapsed into a [`CommandError`] by [`wrap_error`].
#[derive(Debug)]
pub enum ErrorSource {
    /// Already a command error; passed through unchanged
    Command(CommandError),
    /// A foreign error, reduced to its message and short type name
    Foreign {
        /// The foreign error's display message
        message: String,
        /// Short type name of the foreign error (last path segment)
        error_type: String,
    },
    /// A bare string with no error identity at all
    Text(String),
}

impl ErrorSource {
    /// Capture a typed foreign error, recording its short type name.
    ///
    /// # Examples
    ///
    /// ```
    /// use toolgate::core::{wrap_error, ErrorSource};
    ///
    /// let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
    /// let wrapped = wrap_error(ErrorSource::foreign(&io));
    /// assert_eq!(wrapped.code, "INTERNAL_ERROR");
    /// ```
    pub fn foreign<E: std::error::Error>(err: &E) -> Self {
        Self::Foreign {
            message: err.to_string(),
            error_type: short_type_name::<E>().to_string(),
        }
    }
}

impl From<CommandError> for ErrorSource {
    fn from(err: CommandError) -> Self {
        Self::Command(err)
    }
}

impl From<anyhow::Error> for ErrorSource {
    fn from(err: anyhow::Error) -> Self {
        // Preserve identity when the chain already carries a CommandError.
        match err.downcast::<CommandError>() {
            Ok(cmd) => Self::Command(cmd),
            Err(err) => {
                let error_type = if err.downcast_ref::<ToolgateError>().is_some() {
                    "ToolgateError"
                } else {
                    "Error"
                };
                Self::Foreign {
                    message: err.to_string(),
                    error_type: error_type.to_string(),
                }
            }
        }
    }
}

impl From<String> for ErrorSource {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<&str> for ErrorSource {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

/// Collapse an arbitrary failure into a [`CommandError`].
///
/// - An existing `CommandError` is returned unchanged (idempotent).
/// - A foreign error becomes `INTERNAL_ERROR` with its message and a
///   `details.error_type` entry naming the foreign type.
/// - A bare string becomes `UNKNOWN_ERROR` with that string as message.
///
/// # Examples
///
/// ```
/// use toolgate::core::{wrap_error, CommandError};
///
/// let original = CommandError::new("ORIGINAL", "Original");
/// let wrapped = wrap_error(original.clone());
/// assert_eq!(wrapped, original);
///
/// let unknown = wrap_error("Something went wrong");
/// assert_eq!(unknown.code, "UNKNOWN_ERROR");
/// ```
pub fn wrap_error(source: impl Into<ErrorSource>) -> CommandError {
    match source.into() {
        ErrorSource::Command(err) => err,
        ErrorSource::Foreign {
            message,
            error_type,
        } => CommandError::new(codes::INTERNAL_ERROR, message).with_detail("error_type", error_type),
        ErrorSource::Text(text) => CommandError::new(codes::UNKNOWN_ERROR, text),
    }
}

/// Whether an error chain actually carries a [`CommandError`].
///
/// True only for genuine `CommandError` values; a JSON object merely shaped
/// like one is a value, not an error, and never passes this guard.
pub fn is_command_error(err: &anyhow::Error) -> bool {
    err.downcast_ref::<CommandError>().is_some()
}

/// Build a VALIDATION_ERROR failure for defective caller input.
pub fn validation_error(
    message: impl Into<String>,
    details: Option<Map<String, Value>>,
) -> CommandError {
    let mut err = CommandError::new(codes::VALIDATION_ERROR, message)
        .with_suggestion("Check the input and try again");
    if let Some(details) = details {
        err = err.with_details(details);
    }
    err
}

/// Build a NOT_FOUND failure for a missing resource.
pub fn not_found_error(resource_type: &str, resource_id: &str) -> CommandError {
    CommandError::new(
        codes::NOT_FOUND,
        format!("{} with ID '{}' not found", resource_type, resource_id),
    )
    .with_suggestion(format!(
        "Verify the {} ID '{}' and try again",
        resource_type.to_lowercase(),
        resource_id
    ))
    .with_detail("resource_type", resource_type)
    .with_detail("resource_id", resource_id)
}

/// Build a retryable RATE_LIMITED failure.
///
/// With a known retry-after interval the suggestion names it and
/// `details.retry_after_seconds` is set; without one the suggestion just
/// asks the caller to wait a moment and `details` is absent.
pub fn rate_limit_error(retry_after_seconds: Option<u64>) -> CommandError {
    let err = CommandError::new(codes::RATE_LIMITED, "Rate limit exceeded").retryable(true);
    match retry_after_seconds {
        Some(seconds) => err
            .with_suggestion(format!("Retry after {} seconds", seconds))
            .with_detail("retry_after_seconds", seconds),
        None => err.with_suggestion("Please wait a moment before retrying"),
    }
}

/// Build a retryable TIMEOUT failure for a named operation.
pub fn timeout_error(operation_name: &str, timeout_ms: u64) -> CommandError {
    CommandError::new(
        codes::TIMEOUT,
        format!(
            "Operation '{}' timed out after {}ms",
            operation_name, timeout_ms
        ),
    )
    .retryable(true)
    .with_suggestion("Retry the operation or increase the timeout")
    .with_detail("operation_name", operation_name)
    .with_detail("timeout_ms", timeout_ms)
}

/// Build a retryable INTERNAL_ERROR failure.
///
/// A foreign cause collapses to its message string; a `CommandError` cause
/// nests.
pub fn internal_error(message: impl Into<String>, cause: Option<ErrorSource>) -> CommandError {
    let err = CommandError::new(codes::INTERNAL_ERROR, message)
        .retryable(true)
        .with_suggestion("An internal error occurred, please try again");
    match cause {
        Some(ErrorSource::Command(nested)) => err.caused_by(nested),
        Some(ErrorSource::Foreign { message, .. }) => {
            err.with_cause(ErrorCause::Message(message))
        }
        Some(ErrorSource::Text(text)) => err.with_cause(ErrorCause::Message(text)),
        None => err,
    }
}

/// Last path segment of a type name, without generic parameters.
fn short_type_name<T: ?Sized>() -> &'static str {
    let full = std::any::type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_error() {
        let err = CommandError::new("TEST_ERROR", "Test message");
        assert_eq!(err.code, "TEST_ERROR");
        assert_eq!(err.message, "Test message");
        assert!(err.suggestion.is_none());
        assert!(!err.retryable);
    }

    #[test]
    fn test_full_error() {
        let err = CommandError::new("RATE_LIMITED", "Too many requests")
            .with_suggestion("Wait 60 seconds")
            .retryable(true)
            .with_detail("retry_after", 60);
        assert_eq!(err.suggestion.as_deref(), Some("Wait 60 seconds"));
        assert!(err.retryable);
        assert_eq!(err.details.unwrap()["retry_after"], 60);
    }

    #[test]
    fn test_error_with_nested_cause() {
        let cause = CommandError::new("ORIGINAL", "Original error");
        let err = CommandError::new("WRAPPED", "Wrapped error").caused_by(cause);
        match err.cause {
            Some(ErrorCause::Nested(nested)) => assert_eq!(nested.code, "ORIGINAL"),
            other => panic!("expected nested cause, got {other:?}"),
        }
    }

    #[test]
    fn test_display_includes_code_and_message() {
        let err = CommandError::new("NOT_FOUND", "missing");
        assert_eq!(err.to_string(), "NOT_FOUND: missing");
    }

    #[test]
    fn test_cause_serializes_untagged() {
        let nested = CommandError::new("WRAPPED", "w")
            .caused_by(CommandError::new("ORIGINAL", "o"));
        let json = serde_json::to_value(&nested).unwrap();
        assert_eq!(json["cause"]["code"], "ORIGINAL");

        let flat = CommandError::new("WRAPPED", "w")
            .with_cause(ErrorCause::Message("boom".to_string()));
        let json = serde_json::to_value(&flat).unwrap();
        assert_eq!(json["cause"], "boom");
    }

    #[test]
    fn test_validation_error_contract() {
        let err = validation_error("Title is required", None);
        assert_eq!(err.code, codes::VALIDATION_ERROR);
        assert_eq!(err.message, "Title is required");
        assert_eq!(
            err.suggestion.as_deref(),
            Some("Check the input and try again")
        );
        assert!(!err.retryable);
    }

    #[test]
    fn test_validation_error_with_details() {
        let mut details = Map::new();
        details.insert("field".to_string(), Value::from("email"));
        let err = validation_error("Invalid email format", Some(details));
        assert_eq!(err.details.unwrap()["field"], "email");
    }

    #[test]
    fn test_not_found_error_contract() {
        let err = not_found_error("Document", "doc-123");
        assert_eq!(err.code, codes::NOT_FOUND);
        assert_eq!(err.message, "Document with ID 'doc-123' not found");
        assert!(err.suggestion.as_deref().unwrap().contains("doc-123"));
        assert!(!err.retryable);
        let details = err.details.unwrap();
        assert_eq!(details["resource_type"], "Document");
        assert_eq!(details["resource_id"], "doc-123");
    }

    #[test]
    fn test_rate_limit_error_with_retry_after() {
        let err = rate_limit_error(Some(60));
        assert_eq!(err.code, codes::RATE_LIMITED);
        assert_eq!(err.message, "Rate limit exceeded");
        assert!(err.retryable);
        assert!(err.suggestion.as_deref().unwrap().contains("60 seconds"));
        assert_eq!(err.details.unwrap()["retry_after_seconds"], 60);
    }

    #[test]
    fn test_rate_limit_error_without_retry_after() {
        let err = rate_limit_error(None);
        assert!(err.retryable);
        assert!(err
            .suggestion
            .as_deref()
            .unwrap()
            .to_lowercase()
            .contains("wait a moment"));
        assert!(err.details.is_none());
    }

    #[test]
    fn test_timeout_error_contract() {
        let err = timeout_error("fetch_data", 5000);
        assert_eq!(err.code, codes::TIMEOUT);
        assert!(err.message.contains("fetch_data"));
        assert!(err.message.contains("5000ms"));
        assert!(err.retryable);
        let details = err.details.unwrap();
        assert_eq!(details["operation_name"], "fetch_data");
        assert_eq!(details["timeout_ms"], 5000);
    }

    #[test]
    fn test_internal_error_contract() {
        let err = internal_error("Processing failed", None);
        assert_eq!(err.code, codes::INTERNAL_ERROR);
        assert!(err.retryable);
        assert!(err
            .suggestion
            .as_deref()
            .unwrap()
            .to_lowercase()
            .contains("try again"));
    }

    #[test]
    fn test_internal_error_with_foreign_cause() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "Database connection failed");
        let err = internal_error("Query failed", Some(ErrorSource::foreign(&io)));
        assert_eq!(
            err.cause,
            Some(ErrorCause::Message("Database connection failed".to_string()))
        );
    }

    #[test]
    fn test_wrap_error_identity_on_command_error() {
        let original = CommandError::new("ORIGINAL", "Original");
        let wrapped = wrap_error(original.clone());
        assert_eq!(wrapped, original);
        // Double wrapping changes nothing either.
        assert_eq!(wrap_error(wrapped.clone()), original);
    }

    #[test]
    fn test_wrap_error_foreign() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "Bad value");
        let wrapped = wrap_error(ErrorSource::foreign(&io));
        assert_eq!(wrapped.code, codes::INTERNAL_ERROR);
        assert_eq!(wrapped.message, "Bad value");
        assert_eq!(wrapped.details.unwrap()["error_type"], "Error");
    }

    #[test]
    fn test_wrap_error_foreign_records_type_name() {
        let e = ToolgateError::Transport("broken".to_string());
        let wrapped = wrap_error(ErrorSource::foreign(&e));
        assert_eq!(wrapped.details.unwrap()["error_type"], "ToolgateError");
    }

    #[test]
    fn test_wrap_error_string() {
        let wrapped = wrap_error("Something went wrong");
        assert_eq!(wrapped.code, codes::UNKNOWN_ERROR);
        assert_eq!(wrapped.message, "Something went wrong");
    }

    #[test]
    fn test_wrap_error_anyhow_preserves_command_error() {
        let original = CommandError::new("ORIGINAL", "Original");
        let chained: anyhow::Error = original.clone().into();
        let wrapped = wrap_error(ErrorSource::from(chained));
        assert_eq!(wrapped, original);
    }

    #[test]
    fn test_is_command_error_true_for_genuine() {
        let err: anyhow::Error = CommandError::new("TEST", "Test").into();
        assert!(is_command_error(&err));
    }

    #[test]
    fn test_is_command_error_false_for_foreign() {
        let err: anyhow::Error = ToolgateError::Transport("x".to_string()).into();
        assert!(!is_command_error(&err));
        let err = anyhow::anyhow!("plain");
        assert!(!is_command_error(&err));
    }

    #[test]
    fn test_retryable_defaults_false_on_deserialize() {
        let err: CommandError =
            serde_json::from_str(r#"{"code":"X","message":"y"}"#).unwrap();
        assert!(!err.retryable);
    }
}
