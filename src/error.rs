//! Error types for Toolgate
//!
//! This module defines the crate-level error type used throughout the
//! application, using `thiserror` for ergonomic error handling.
//!
//! Transport-level failures (connection refused, unknown tool) are raised as
//! these errors rather than returned as a [`crate::core::CommandResult`],
//! because they occur before a command even begins executing. Expected
//! domain failures inside a command are returned as `Failure` results
//! instead — see [`crate::core`].

use thiserror::Error;

/// Main error type for Toolgate operations
///
/// This enum encompasses all possible errors that can occur during
/// configuration loading, transport lifecycle management, and tool
/// invocation.
#[derive(Error, Debug)]
pub enum ToolgateError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Connection establishment failures
    ///
    /// Raised by `connect()` when the underlying session cannot be
    /// established; the transport transitions to `TransportState::Error`.
    #[error("Connection error: {0}")]
    Connection(String),

    /// Transport-level I/O failures during an established session
    #[error("Transport error: {0}")]
    Transport(String),

    /// A tool name not advertised by the connected server
    #[error("Tool not found: {tool_name}")]
    ToolNotFound {
        /// The requested tool name
        tool_name: String,
    },

    /// An operation exceeded its configured deadline
    #[error("Operation '{operation}' timed out after {timeout_ms}ms")]
    Timeout {
        /// Name of the operation that timed out
        operation: String,
        /// The deadline that was exceeded, in milliseconds
        timeout_ms: u64,
    },

    /// Construction-time invariant violations on value types
    /// (relevance/confidence/progress out of range)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Persisted CLI state errors (read/write of the state file)
    #[error("State error: {0}")]
    State(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// HTTP request errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Result type alias for Toolgate operations
///
/// This is a convenience alias that uses `anyhow::Error` as the error type,
/// allowing for rich error context and easy error propagation.
pub type Result<T> = anyhow::Result<T>;
