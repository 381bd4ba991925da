//! Command error model integration tests
//!
//! Validates the factory contracts, `wrap_error` idempotency, and the
//! `is_command_error` guard.

use toolgate::core::{
    codes, internal_error, is_command_error, not_found_error, rate_limit_error, timeout_error,
    validation_error, wrap_error, CommandError, ErrorCause, ErrorSource,
};
use toolgate::error::ToolgateError;

// ---------------------------------------------------------------------------
// CommandError construction
// ---------------------------------------------------------------------------

#[test]
fn test_basic_error() {
    let err = CommandError::new("TEST_ERROR", "Test message");
    assert_eq!(err.code, "TEST_ERROR");
    assert_eq!(err.message, "Test message");
    assert!(err.suggestion.is_none());
    assert!(!err.retryable);
    assert!(err.details.is_none());
    assert!(err.cause.is_none());
}

#[test]
fn test_full_error() {
    let err = CommandError::new("RATE_LIMITED", "Too many requests")
        .with_suggestion("Wait 60 seconds")
        .retryable(true)
        .with_detail("retry_after", 60);
    assert_eq!(err.code, "RATE_LIMITED");
    assert_eq!(err.suggestion.as_deref(), Some("Wait 60 seconds"));
    assert!(err.retryable);
    assert_eq!(err.details.unwrap()["retry_after"], 60);
}

#[test]
fn test_error_cause_chain() {
    let cause = CommandError::new("ORIGINAL", "Original error");
    let err = CommandError::new("WRAPPED", "Wrapped error").caused_by(cause);
    match err.cause {
        Some(ErrorCause::Nested(nested)) => assert_eq!(nested.code, "ORIGINAL"),
        other => panic!("expected nested cause, got {other:?}"),
    }
}

// ---------------------------------------------------------------------------
// Error code constants
// ---------------------------------------------------------------------------

#[test]
fn test_error_code_constants() {
    assert_eq!(codes::VALIDATION_ERROR, "VALIDATION_ERROR");
    assert_eq!(codes::INVALID_INPUT, "INVALID_INPUT");
    assert_eq!(codes::MISSING_REQUIRED_FIELD, "MISSING_REQUIRED_FIELD");
    assert_eq!(codes::NOT_FOUND, "NOT_FOUND");
    assert_eq!(codes::ALREADY_EXISTS, "ALREADY_EXISTS");
    assert_eq!(codes::CONFLICT, "CONFLICT");
    assert_eq!(codes::UNAUTHORIZED, "UNAUTHORIZED");
    assert_eq!(codes::FORBIDDEN, "FORBIDDEN");
    assert_eq!(codes::RATE_LIMITED, "RATE_LIMITED");
    assert_eq!(codes::QUOTA_EXCEEDED, "QUOTA_EXCEEDED");
    assert_eq!(codes::SERVICE_UNAVAILABLE, "SERVICE_UNAVAILABLE");
    assert_eq!(codes::TIMEOUT, "TIMEOUT");
    assert_eq!(codes::INTERNAL_ERROR, "INTERNAL_ERROR");
    assert_eq!(codes::NOT_IMPLEMENTED, "NOT_IMPLEMENTED");
    assert_eq!(codes::UNKNOWN_ERROR, "UNKNOWN_ERROR");
}

// ---------------------------------------------------------------------------
// Factory contracts
// ---------------------------------------------------------------------------

#[test]
fn test_validation_error_factory() {
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
fn test_validation_error_factory_with_details() {
    let mut details = serde_json::Map::new();
    details.insert("field".to_string(), "email".into());
    details.insert("value".to_string(), "not-an-email".into());
    let err = validation_error("Invalid email format", Some(details));
    let details = err.details.unwrap();
    assert_eq!(details["field"], "email");
    assert_eq!(details["value"], "not-an-email");
}

#[test]
fn test_not_found_error_factory() {
    let err = not_found_error("Document", "doc-123");
    assert_eq!(err.code, codes::NOT_FOUND);
    assert_eq!(err.message, "Document with ID 'doc-123' not found");
    assert!(err
        .suggestion
        .as_deref()
        .unwrap()
        .to_lowercase()
        .contains("document"));
    assert!(err.suggestion.as_deref().unwrap().contains("doc-123"));
    assert!(!err.retryable);
    let details = err.details.unwrap();
    assert_eq!(details["resource_type"], "Document");
    assert_eq!(details["resource_id"], "doc-123");
}

#[test]
fn test_rate_limit_error_factory_with_retry_after() {
    let err = rate_limit_error(Some(60));
    assert_eq!(err.code, codes::RATE_LIMITED);
    assert_eq!(err.message, "Rate limit exceeded");
    assert!(err.retryable);
    assert!(err.suggestion.as_deref().unwrap().contains("60 seconds"));
    let details = err.details.unwrap();
    assert_eq!(details.len(), 1);
    assert_eq!(details["retry_after_seconds"], 60);
}

#[test]
fn test_rate_limit_error_factory_without_retry_after() {
    let err = rate_limit_error(None);
    assert_eq!(err.code, codes::RATE_LIMITED);
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
fn test_timeout_error_factory() {
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
fn test_internal_error_factory() {
    let err = internal_error("Processing failed", None);
    assert_eq!(err.code, codes::INTERNAL_ERROR);
    assert_eq!(err.message, "Processing failed");
    assert!(err.retryable);
    assert!(err
        .suggestion
        .as_deref()
        .unwrap()
        .to_lowercase()
        .contains("try again"));
}

#[test]
fn test_internal_error_factory_collapses_foreign_cause() {
    let io = std::io::Error::new(std::io::ErrorKind::Other, "Database connection failed");
    let err = internal_error("Query failed", Some(ErrorSource::foreign(&io)));
    assert_eq!(
        err.cause,
        Some(ErrorCause::Message("Database connection failed".to_string()))
    );
}

#[test]
fn test_internal_error_factory_nests_command_error_cause() {
    let nested = CommandError::new("ORIGINAL", "Original");
    let err = internal_error("Wrapped", Some(ErrorSource::from(nested)));
    match err.cause {
        Some(ErrorCause::Nested(inner)) => assert_eq!(inner.code, "ORIGINAL"),
        other => panic!("expected nested cause, got {other:?}"),
    }
}

// ---------------------------------------------------------------------------
// wrap_error
// ---------------------------------------------------------------------------

#[test]
fn test_wrap_error_identity() {
    let original = CommandError::new("ORIGINAL", "Original");
    let once = wrap_error(original.clone());
    let twice = wrap_error(once.clone());
    assert_eq!(once, original);
    assert_eq!(twice, original);
}

#[test]
fn test_wrap_error_foreign_error() {
    let io = std::io::Error::new(std::io::ErrorKind::Other, "Bad value");
    let wrapped = wrap_error(ErrorSource::foreign(&io));
    assert_eq!(wrapped.code, codes::INTERNAL_ERROR);
    assert_eq!(wrapped.message, "Bad value");
    assert_eq!(wrapped.details.unwrap()["error_type"], "Error");
}

#[test]
fn test_wrap_error_typed_foreign_error_names_type() {
    let e = ToolgateError::Transport("broken".to_string());
    let wrapped = wrap_error(ErrorSource::foreign(&e));
    assert_eq!(wrapped.code, codes::INTERNAL_ERROR);
    assert_eq!(wrapped.details.unwrap()["error_type"], "ToolgateError");
}

#[test]
fn test_wrap_error_plain_string() {
    let wrapped = wrap_error("Something went wrong");
    assert_eq!(wrapped.code, codes::UNKNOWN_ERROR);
    assert_eq!(wrapped.message, "Something went wrong");
    assert!(wrapped.details.is_none());
}

#[test]
fn test_wrap_error_anyhow_chain_preserves_command_error() {
    let original = CommandError::new("ORIGINAL", "Original");
    let chained: anyhow::Error = original.clone().into();
    let wrapped = wrap_error(ErrorSource::from(chained));
    assert_eq!(wrapped, original);
}

// ---------------------------------------------------------------------------
// is_command_error
// ---------------------------------------------------------------------------

#[test]
fn test_is_command_error_true_for_genuine_value() {
    let err: anyhow::Error = CommandError::new("TEST", "Test").into();
    assert!(is_command_error(&err));
}

#[test]
fn test_is_command_error_false_for_foreign_errors() {
    let err: anyhow::Error = ToolgateError::Transport("x".to_string()).into();
    assert!(!is_command_error(&err));

    let err: anyhow::Error = std::io::Error::new(std::io::ErrorKind::Other, "io").into();
    assert!(!is_command_error(&err));

    assert!(!is_command_error(&anyhow::anyhow!("plain message")));
}

// ---------------------------------------------------------------------------
// Wire format
// ---------------------------------------------------------------------------

#[test]
fn test_command_error_roundtrip() {
    let err = not_found_error("User", "user-456");
    let json = serde_json::to_value(&err).unwrap();
    let back: CommandError = serde_json::from_value(json).unwrap();
    assert_eq!(back, err);
}

#[test]
fn test_command_error_string_cause_roundtrip() {
    let err = internal_error("failed", Some(ErrorSource::from("disk full".to_string())));
    let json = serde_json::to_value(&err).unwrap();
    assert_eq!(json["cause"], "disk full");
    let back: CommandError = serde_json::from_value(json).unwrap();
    assert_eq!(back.cause, Some(ErrorCause::Message("disk full".to_string())));
}
