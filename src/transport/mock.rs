//! Deterministic in-memory transport for tests
//!
//! This module provides [`MockTransport`], an in-process [`Transport`]
//! implementation that replaces real network I/O in tests.
//!
//! # Usage
//!
//! Register async handlers with [`MockTransport::register_tool`] or canned
//! values with [`MockTransport::add_mock_response`], then drive the code
//! under test through the [`Transport`] trait. Every `call_tool` invocation
//! is appended to an ordered log regardless of outcome, so a test can
//! assert *what was asked of* the simulated server — idempotency,
//! exactly-once expectations, argument-shape regressions — not merely what
//! came back.
//!
//! # Example
//!
//! ```
//! use serde_json::{json, Map};
//! use toolgate::core::CommandResult;
//! use toolgate::transport::mock::MockTransport;
//! use toolgate::transport::Transport;
//!
//! # #[tokio::main]
//! # async fn main() {
//! let mut transport = MockTransport::new();
//! transport.register_tool("echo", None, |args| async move {
//!     CommandResult::success(json!({ "echo": args.get("message").cloned() }))
//! });
//!
//! transport.connect().await.unwrap();
//! let mut args = Map::new();
//! args.insert("message".to_string(), json!("hi"));
//! let outcome = transport.call_tool("echo", args).await.unwrap();
//! assert!(outcome.as_result().unwrap().is_success());
//! assert_eq!(transport.call_count(Some("echo")), 1);
//! # }
//! ```

use std::collections::HashMap;
use std::fmt;
use std::future::Future;

use futures::future::BoxFuture;
use serde_json::{Map, Value};

use crate::core::CommandResult;
use crate::error::{Result, ToolgateError};
use crate::transport::{ToolInfo, ToolOutcome, Transport, TransportConfig, TransportState};

/// A registered tool handler: called with the argument mapping, returns a
/// structured result envelope.
type ToolHandler =
    Box<dyn Fn(Map<String, Value>) -> BoxFuture<'static, CommandResult<Value>> + Send + Sync>;

struct RegisteredTool {
    description: Option<String>,
    handler: ToolHandler,
}

/// One recorded `call_tool` invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    /// The tool that was invoked
    pub tool: String,
    /// The arguments it was invoked with
    pub arguments: Map<String, Value>,
}

/// In-memory [`Transport`] implementation for tests.
///
/// Create with [`MockTransport::new`] (default config) or
/// [`MockTransport::with_config`].
pub struct MockTransport {
    config: TransportConfig,
    state: TransportState,
    tools: HashMap<String, RegisteredTool>,
    mock_responses: HashMap<String, Value>,
    calls: Vec<RecordedCall>,
    /// When armed, the next `connect()` fails with this message.
    fail_connect: Option<String>,
}

impl fmt::Debug for MockTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MockTransport")
            .field("state", &self.state)
            .field("tools", &self.tools.keys().collect::<Vec<_>>())
            .field("mock_responses", &self.mock_responses.keys().collect::<Vec<_>>())
            .field("calls", &self.calls.len())
            .finish_non_exhaustive()
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl MockTransport {
    /// Create a disconnected mock with the default config.
    pub fn new() -> Self {
        Self::with_config(TransportConfig::default())
    }

    /// Create a disconnected mock with an explicit config.
    pub fn with_config(config: TransportConfig) -> Self {
        Self {
            config,
            state: TransportState::Disconnected,
            tools: HashMap::new(),
            mock_responses: HashMap::new(),
            calls: Vec::new(),
            fail_connect: None,
        }
    }

    /// The transport's immutable configuration.
    pub fn config(&self) -> &TransportConfig {
        &self.config
    }

    /// Install an async handler invoked on `call_tool`.
    pub fn register_tool<F, Fut>(&mut self, name: &str, description: Option<&str>, handler: F)
    where
        F: Fn(Map<String, Value>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = CommandResult<Value>> + Send + 'static,
    {
        self.tools.insert(
            name.to_string(),
            RegisteredTool {
                description: description.map(str::to_string),
                handler: Box::new(move |args| Box::pin(handler(args))),
            },
        );
    }

    /// Install a canned return value for `name`.
    ///
    /// The value bypasses any registered handler and is returned as-is
    /// (as [`ToolOutcome::Raw`]), preserving whatever shape the test
    /// supplies.
    pub fn add_mock_response(&mut self, name: &str, response: Value) {
        self.mock_responses.insert(name.to_string(), response);
    }

    /// Force the next `connect()` to fail with `message` and transition the
    /// transport to [`TransportState::Error`].
    ///
    /// Passing `flag = false` disarms a previously armed failure.
    pub fn set_should_fail_connect(&mut self, flag: bool, message: Option<&str>) {
        self.fail_connect = if flag {
            Some(message.unwrap_or("forced connect failure").to_string())
        } else {
            None
        };
    }

    /// Number of recorded calls for one tool, or across all tools.
    pub fn call_count(&self, name: Option<&str>) -> usize {
        match name {
            Some(name) => self.calls.iter().filter(|c| c.tool == name).count(),
            None => self.calls.len(),
        }
    }

    /// The most recent recorded invocation of `name`, if any.
    pub fn last_call(&self, name: &str) -> Option<&RecordedCall> {
        self.calls.iter().rev().find(|c| c.tool == name)
    }

    /// All recorded invocations of `name`, in call order.
    pub fn get_calls(&self, name: &str) -> Vec<&RecordedCall> {
        self.calls.iter().filter(|c| c.tool == name).collect()
    }

    /// Empty the call log without touching registered tools, canned
    /// responses, or connection state.
    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }

    /// Return the transport to its just-constructed state: disconnected,
    /// empty call log, no registered tools, no canned responses.
    pub fn reset(&mut self) {
        self.state = TransportState::Disconnected;
        self.tools.clear();
        self.mock_responses.clear();
        self.calls.clear();
        self.fail_connect = None;
    }
}

#[async_trait::async_trait]
impl Transport for MockTransport {
    async fn connect(&mut self) -> Result<()> {
        if self.state == TransportState::Connected {
            return Ok(());
        }
        self.state = TransportState::Connecting;
        if let Some(message) = &self.fail_connect {
            let message = message.clone();
            self.state = TransportState::Error;
            return Err(ToolgateError::Connection(message).into());
        }
        self.state = TransportState::Connected;
        Ok(())
    }

    async fn disconnect(&mut self) {
        self.state = TransportState::Disconnected;
    }

    fn state(&self) -> TransportState {
        self.state
    }

    /// Registered handlers and canned names, regardless of connection state.
    ///
    /// The mock relaxes the connected-only precondition so tests can
    /// inspect registrations around `reset()` without reconnecting.
    async fn list_tools(&self) -> Result<Vec<ToolInfo>> {
        let mut tools: Vec<ToolInfo> = self
            .tools
            .iter()
            .map(|(name, tool)| ToolInfo {
                name: name.clone(),
                description: tool.description.clone(),
                input_schema: None,
            })
            .collect();
        for name in self.mock_responses.keys() {
            if !self.tools.contains_key(name) {
                tools.push(ToolInfo::new(name.clone()));
            }
        }
        Ok(tools)
    }

    async fn call_tool(
        &mut self,
        name: &str,
        arguments: Map<String, Value>,
    ) -> Result<ToolOutcome> {
        // Recorded first, so the log captures the call regardless of outcome.
        self.calls.push(RecordedCall {
            tool: name.to_string(),
            arguments: arguments.clone(),
        });

        if let Some(response) = self.mock_responses.get(name) {
            return Ok(ToolOutcome::Raw(response.clone()));
        }
        if let Some(tool) = self.tools.get(name) {
            let result = (tool.handler)(arguments).await;
            return Ok(ToolOutcome::Result(result));
        }
        Err(ToolgateError::ToolNotFound {
            tool_name: name.to_string(),
        }
        .into())
    }
}
