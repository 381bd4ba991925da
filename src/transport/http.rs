//! JSON-RPC 2.0 over HTTP transport
//!
//! This module implements [`HttpTransport`], the live transport. Every
//! operation is an HTTP POST carrying a single JSON-RPC 2.0 request:
//!
//! - `connect()` sends `initialize` with the client identity and moves the
//!   state machine to `Connected`.
//! - `list_tools()` sends `tools/list` and maps the advertised tools.
//! - `call_tool()` sends `tools/call`; transport-level failures are retried
//!   per the configured policy (sequential attempts, fixed delay).
//!
//! # Reconnection
//!
//! A JSON-RPC error response is an answer from a live server and never
//! changes connection state. Only when every retry attempt fails at the
//! HTTP layer is the session presumed dead: the transport enters
//! `Reconnecting`, attempts one fresh `initialize`, and lands in
//! `Connected` (session recovered, the failed call is still surfaced) or
//! `Error`.
//!
//! # Headers
//!
//! `TransportConfig.extra["headers"]` may carry a string-to-string map
//! merged into every request (bearer tokens, API keys).

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::error::{Result, ToolgateError};
use crate::transport::{ToolInfo, ToolOutcome, Transport, TransportConfig, TransportState};

/// JSON-RPC error code for an unknown method or tool.
const RPC_METHOD_NOT_FOUND: i64 = -32601;

#[derive(Serialize)]
struct RpcRequest<'a> {
    jsonrpc: &'static str,
    id: u64,
    method: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    params: Option<Value>,
}

#[derive(Deserialize)]
struct RpcResponse {
    #[allow(dead_code)]
    jsonrpc: String,
    #[allow(dead_code)]
    id: Option<Value>,
    result: Option<Value>,
    error: Option<RpcError>,
}

#[derive(Debug, Deserialize)]
struct RpcError {
    code: i64,
    message: String,
    #[allow(dead_code)]
    data: Option<Value>,
}

/// Live JSON-RPC 2.0 transport over HTTP POST.
///
/// # Examples
///
/// ```no_run
/// use toolgate::transport::http::HttpTransport;
/// use toolgate::transport::TransportConfig;
///
/// let transport = HttpTransport::new(
///     url::Url::parse("http://localhost:3000/rpc").unwrap(),
///     TransportConfig::default(),
/// );
/// ```
#[derive(Debug)]
pub struct HttpTransport {
    /// Underlying reqwest HTTP client, built with the configured timeout.
    http_client: reqwest::Client,
    /// JSON-RPC endpoint URL (POST target).
    endpoint: url::Url,
    /// Retry/timeout policy; immutable after construction.
    config: TransportConfig,
    /// Connection-state machine, owned exclusively by this instance.
    state: TransportState,
    /// Monotonically increasing request ID counter.
    next_id: AtomicU64,
    /// Static extra headers merged into every request.
    headers: HashMap<String, String>,
}

impl HttpTransport {
    /// Construct a transport targeting `endpoint`.
    ///
    /// No network I/O is performed at construction time; the per-request
    /// timeout comes from `config.timeout_ms`.
    pub fn new(endpoint: url::Url, config: TransportConfig) -> Self {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            // SAFETY: Default reqwest client construction cannot fail
            // unless TLS initialisation fails, which is a fatal startup
            // condition on any supported platform.
            .expect("failed to build reqwest client");

        let headers = extra_headers(&config);

        Self {
            http_client,
            endpoint,
            config,
            state: TransportState::Disconnected,
            next_id: AtomicU64::new(1),
            headers,
        }
    }

    /// Issue a single JSON-RPC request and return its `result` value.
    ///
    /// # Errors
    ///
    /// [`ToolgateError::Timeout`] when the HTTP request times out,
    /// [`ToolgateError::Transport`] for other HTTP-level failures, and
    /// [`ToolgateError::Transport`]/[`ToolgateError::ToolNotFound`] for
    /// JSON-RPC error responses.
    async fn post_rpc(&self, method: &str, params: Option<Value>) -> Result<Value> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let request = RpcRequest {
            jsonrpc: "2.0",
            id,
            method,
            params,
        };

        let mut req = self
            .http_client
            .post(self.endpoint.as_str())
            .header("Content-Type", "application/json")
            .json(&request);
        for (k, v) in &self.headers {
            req = req.header(k.as_str(), v.as_str());
        }

        let response = req.send().await.map_err(|e| {
            if e.is_timeout() {
                anyhow::anyhow!(ToolgateError::Timeout {
                    operation: method.to_string(),
                    timeout_ms: self.config.timeout_ms,
                })
            } else {
                anyhow::anyhow!(ToolgateError::Transport(format!("HTTP POST failed: {}", e)))
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ToolgateError::Transport(format!(
                "server returned HTTP {}",
                status
            ))
            .into());
        }

        let rpc: RpcResponse = response.json().await.map_err(|e| {
            ToolgateError::Transport(format!("invalid JSON-RPC response: {}", e))
        })?;

        if let Some(error) = rpc.error {
            return Err(ToolgateError::Transport(format!(
                "JSON-RPC error {}: {}",
                error.code, error.message
            ))
            .into());
        }

        Ok(rpc.result.unwrap_or(Value::Null))
    }

    /// Send the `initialize` handshake.
    async fn initialize(&self) -> Result<Value> {
        self.post_rpc(
            "initialize",
            Some(json!({
                "client": {
                    "name": "toolgate",
                    "version": env!("CARGO_PKG_VERSION"),
                }
            })),
        )
        .await
    }

    /// Re-establish the session after all retries failed at the HTTP layer.
    async fn try_reconnect(&mut self) {
        self.state = TransportState::Reconnecting;
        tracing::warn!(endpoint = %self.endpoint, "session presumed dead, reconnecting");
        match self.initialize().await {
            Ok(_) => {
                tracing::info!(endpoint = %self.endpoint, "session re-established");
                self.state = TransportState::Connected;
            }
            Err(e) => {
                tracing::error!(endpoint = %self.endpoint, error = %e, "reconnect failed");
                self.state = TransportState::Error;
            }
        }
    }
}

/// Pull a string-to-string header map out of `extra["headers"]`.
fn extra_headers(config: &TransportConfig) -> HashMap<String, String> {
    let mut headers = HashMap::new();
    if let Some(Value::Object(map)) = config.extra.get("headers") {
        for (k, v) in map {
            if let Value::String(s) = v {
                headers.insert(k.clone(), s.clone());
            }
        }
    }
    headers
}

/// Whether an error is a transport-level failure worth retrying, as opposed
/// to an answer from a live server.
fn is_retryable(err: &anyhow::Error) -> bool {
    match err.downcast_ref::<ToolgateError>() {
        Some(ToolgateError::Timeout { .. }) => true,
        Some(ToolgateError::Transport(msg)) => !msg.starts_with("JSON-RPC error"),
        _ => false,
    }
}

#[async_trait::async_trait]
impl Transport for HttpTransport {
    async fn connect(&mut self) -> Result<()> {
        if self.state == TransportState::Connected {
            return Ok(());
        }
        self.state = TransportState::Connecting;
        tracing::debug!(endpoint = %self.endpoint, "connecting");
        match self.initialize().await {
            Ok(_) => {
                self.state = TransportState::Connected;
                tracing::info!(endpoint = %self.endpoint, "connected");
                Ok(())
            }
            Err(e) => {
                self.state = TransportState::Error;
                Err(ToolgateError::Connection(format!(
                    "failed to connect to {}: {}",
                    self.endpoint, e
                ))
                .into())
            }
        }
    }

    async fn disconnect(&mut self) {
        // Stateless POSTs hold no session handle; dropping the state is the
        // whole teardown and cannot fail.
        tracing::debug!(endpoint = %self.endpoint, "disconnecting");
        self.state = TransportState::Disconnected;
    }

    fn state(&self) -> TransportState {
        self.state
    }

    async fn list_tools(&self) -> Result<Vec<ToolInfo>> {
        if self.state != TransportState::Connected {
            return Err(ToolgateError::Transport(format!(
                "cannot list tools while {}",
                self.state
            ))
            .into());
        }
        let result = self.post_rpc("tools/list", None).await?;
        let tools = result.get("tools").cloned().unwrap_or(Value::Array(vec![]));
        let tools: Vec<ToolInfo> = serde_json::from_value(tools)
            .map_err(|e| ToolgateError::Transport(format!("invalid tools/list response: {}", e)))?;
        Ok(tools)
    }

    async fn call_tool(
        &mut self,
        name: &str,
        arguments: Map<String, Value>,
    ) -> Result<ToolOutcome> {
        if self.state != TransportState::Connected {
            return Err(ToolgateError::Connection(format!(
                "cannot call tool while {}",
                self.state
            ))
            .into());
        }

        let params = json!({ "name": name, "arguments": Value::Object(arguments) });
        let attempts = self.config.retry_attempts.max(1);
        let mut attempt = 0;

        loop {
            attempt += 1;
            match self.post_rpc("tools/call", Some(params.clone())).await {
                Ok(value) => return Ok(ToolOutcome::from_value(value)),
                Err(e) => {
                    // An unknown tool is an answer, not a transport fault.
                    if let Some(ToolgateError::Transport(msg)) =
                        e.downcast_ref::<ToolgateError>()
                    {
                        if msg.contains(&format!("JSON-RPC error {}", RPC_METHOD_NOT_FOUND)) {
                            return Err(ToolgateError::ToolNotFound {
                                tool_name: name.to_string(),
                            }
                            .into());
                        }
                    }
                    if !is_retryable(&e) {
                        return Err(e);
                    }
                    if attempt >= attempts {
                        tracing::warn!(
                            tool = name,
                            attempts,
                            "call failed on every attempt, giving up"
                        );
                        self.try_reconnect().await;
                        return Err(e);
                    }
                    tracing::debug!(
                        tool = name,
                        attempt,
                        "transport-level failure, retrying after delay"
                    );
                    tokio::time::sleep(Duration::from_millis(self.config.retry_delay_ms)).await;
                }
            }
        }
    }
}
