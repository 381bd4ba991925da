//! Transport abstraction and implementations
//!
//! This module defines the [`Transport`] trait that all transport
//! implementations must satisfy. Concrete implementations live in
//! submodules:
//!
//! - [`http::HttpTransport`] -- JSON-RPC 2.0 over HTTP POST against a live
//!   tool server.
//! - [`mock::MockTransport`] -- deterministic in-memory implementation with
//!   registered handlers, canned responses, and ordered call recording for
//!   test assertions.
//!
//! # Design
//!
//! A transport owns a connection-state machine ([`TransportState`]) and a
//! retry/timeout policy ([`TransportConfig`]). The contract assumes a single
//! logical caller per instance: operations are async suspension points but
//! execute within one control flow, with no background threads or timers.
//! Retries are sequential, never concurrent.
//!
//! Connection and tool-not-found failures are raised as
//! [`crate::error::ToolgateError`] values rather than returned as
//! `CommandResult` failures, because they occur before a command begins
//! executing.
//!
//! # Canonical Import Path
//!
//! ```no_run
//! use toolgate::transport::Transport;
//! ```

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::core::CommandResult;
use crate::error::{Result, ToolgateError};

pub mod http;
pub mod mock;

/// Connection lifecycle state of a [`Transport`] instance.
///
/// Owned exclusively by the transport; never shared or externally mutated.
///
/// Transitions (initial = `Disconnected`):
///
/// ```text
/// Disconnected --connect()--> Connecting --ok--> Connected
/// Connecting --failure--> Error          (connect() raises)
/// Connected --disconnect()--> Disconnected
/// Connected --failure in use--> Reconnecting --ok--> Connected
///                                            --exhausted--> Error
/// Error --connect()--> Connecting        (retries from scratch)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransportState {
    /// No session; the initial state
    Disconnected,
    /// `connect()` is in flight
    Connecting,
    /// Session established; tools may be listed and called
    Connected,
    /// Session lost mid-use; re-establishment in progress
    Reconnecting,
    /// Session failed; only `connect()` leaves this state
    Error,
}

impl Default for TransportState {
    fn default() -> Self {
        Self::Disconnected
    }
}

impl fmt::Display for TransportState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Disconnected => "disconnected",
            Self::Connecting => "connecting",
            Self::Connected => "connected",
            Self::Reconnecting => "reconnecting",
            Self::Error => "error",
        };
        write!(f, "{}", s)
    }
}

/// Retry and timeout policy for a transport.
///
/// Immutable once the transport is constructed. `extra` carries
/// transport-specific options (e.g. HTTP headers) as an opaque mapping.
///
/// # Examples
///
/// ```
/// use toolgate::transport::TransportConfig;
///
/// let config = TransportConfig::default();
/// assert_eq!(config.timeout_ms, 30_000);
/// assert_eq!(config.retry_attempts, 3);
/// assert_eq!(config.retry_delay_ms, 1_000);
/// assert!(config.extra.is_empty());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransportConfig {
    /// Per-operation deadline in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// How many sequential attempts a failing call gets
    #[serde(default = "default_retry_attempts")]
    pub retry_attempts: u32,
    /// Delay between attempts in milliseconds
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,
    /// Transport-specific options
    #[serde(default)]
    pub extra: HashMap<String, Value>,
}

fn default_timeout_ms() -> u64 {
    30_000
}

fn default_retry_attempts() -> u32 {
    3
}

fn default_retry_delay_ms() -> u64 {
    1_000
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout_ms: default_timeout_ms(),
            retry_attempts: default_retry_attempts(),
            retry_delay_ms: default_retry_delay_ms(),
            extra: HashMap::new(),
        }
    }
}

/// Description of a callable tool, as advertised by `list_tools`.
///
/// Read-only; `name` is unique within a connected session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolInfo {
    /// Tool name, unique within the session
    pub name: String,
    /// Human-readable description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Opaque input schema document
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input_schema: Option<Value>,
}

impl ToolInfo {
    /// Create a tool description with only the name set.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            input_schema: None,
        }
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the input schema document.
    pub fn with_input_schema(mut self, schema: Value) -> Self {
        self.input_schema = Some(schema);
        self
    }
}

/// What a tool call produced: a structured envelope, or a raw value.
///
/// This is the single canonical in-memory representation, produced at the
/// boundary where external JSON is parsed; internal code never handles two
/// shapes of the same concept.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolOutcome {
    /// The tool returned a structured [`CommandResult`] envelope
    Result(CommandResult<Value>),
    /// The tool returned an arbitrary value, passed through unchanged
    Raw(Value),
}

impl ToolOutcome {
    /// Classify a raw JSON value at the parse boundary.
    ///
    /// A value that deserializes as a valid result envelope becomes
    /// [`ToolOutcome::Result`]; anything else is preserved as
    /// [`ToolOutcome::Raw`].
    pub fn from_value(value: Value) -> Self {
        if value.get("success").map(Value::is_boolean) == Some(true) {
            if let Ok(result) = serde_json::from_value::<CommandResult<Value>>(value.clone()) {
                return Self::Result(result);
            }
        }
        Self::Raw(value)
    }

    /// The outcome as a JSON value, for display or machine output.
    pub fn to_value(&self) -> Result<Value> {
        match self {
            Self::Result(result) => Ok(serde_json::to_value(result)?),
            Self::Raw(value) => Ok(value.clone()),
        }
    }

    /// The structured envelope, when present.
    pub fn as_result(&self) -> Option<&CommandResult<Value>> {
        match self {
            Self::Result(result) => Some(result),
            Self::Raw(_) => None,
        }
    }
}

/// Abstraction over tool-server transports.
///
/// Implementations exist for HTTP JSON-RPC and an in-memory mock. All
/// methods are `async` so implementations can drive I/O without blocking
/// the Tokio executor.
///
/// # Examples
///
/// ```no_run
/// use toolgate::transport::Transport;
///
/// // Implementations are created via their own constructors or via
/// // `create_transport`; this trait is used polymorphically through
/// // `Box<dyn Transport>`.
/// ```
#[async_trait::async_trait]
pub trait Transport: Send + Sync + fmt::Debug {
    /// Establish the underlying session.
    ///
    /// Idempotent when already connected (no-op, no error).
    ///
    /// # Errors
    ///
    /// Returns [`ToolgateError::Connection`] carrying the underlying cause
    /// message; the transport is left in [`TransportState::Error`].
    async fn connect(&mut self) -> Result<()>;

    /// Tear down the session and return to `Disconnected`.
    ///
    /// Never fails; safe to call when already disconnected. The underlying
    /// session handle is released on every exit path.
    async fn disconnect(&mut self);

    /// The current connection state.
    fn state(&self) -> TransportState;

    /// The currently advertised tool set.
    ///
    /// Ordering is implementation-defined; the CLI layer sorts by name for
    /// display.
    ///
    /// # Errors
    ///
    /// Returns an error when the transport is not connected or the
    /// underlying listing request fails.
    async fn list_tools(&self) -> Result<Vec<ToolInfo>>;

    /// Invoke a named tool with a JSON-compatible argument mapping.
    ///
    /// Transport-level failures are retried per the configured policy
    /// (sequential attempts with a fixed delay); a single failed call does
    /// not by itself force a reconnect cycle.
    ///
    /// # Errors
    ///
    /// Returns [`ToolgateError::ToolNotFound`] when `name` is not
    /// advertised, or a `Timeout`/`Transport` error once retries are
    /// exhausted.
    async fn call_tool(&mut self, name: &str, arguments: Map<String, Value>)
        -> Result<ToolOutcome>;
}

/// Reserved target name selecting the [`mock::MockTransport`].
pub const MOCK_TARGET: &str = "mock";

/// Select and construct a transport for `target`.
///
/// The literal `"mock"` (or any `mock:`-prefixed target) selects the
/// in-memory [`mock::MockTransport`]; anything else is parsed as a URL and
/// selects the live [`http::HttpTransport`].
///
/// # Errors
///
/// Returns [`ToolgateError::Config`] when `target` is neither the mock
/// sentinel nor a valid URL.
///
/// # Examples
///
/// ```
/// use toolgate::transport::{create_transport, Transport, TransportConfig, TransportState};
///
/// let transport = create_transport("mock", TransportConfig::default()).unwrap();
/// assert_eq!(transport.state(), TransportState::Disconnected);
/// ```
pub fn create_transport(target: &str, config: TransportConfig) -> Result<Box<dyn Transport>> {
    if target == MOCK_TARGET || target.starts_with("mock:") {
        return Ok(Box::new(mock::MockTransport::with_config(config)));
    }
    let endpoint = url::Url::parse(target).map_err(|e| {
        ToolgateError::Config(format!("invalid server target '{}': {}", target, e))
    })?;
    Ok(Box::new(http::HttpTransport::new(endpoint, config)))
}
