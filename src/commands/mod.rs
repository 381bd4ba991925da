/*!
Command handlers for the CLI

This module provides the handlers invoked by the CLI entrypoint:

- `connect`    — Establish and remember a server connection
- `disconnect` — Forget the remembered server
- `tools`      — List or inspect advertised tools
- `call`       — Invoke a tool with JSON arguments
- `status`     — Show the remembered connection
- `validate`   — Connect, list tools, and report health
- `shell`      — Interactive REPL (separate module)

Handlers are intentionally small: they resolve a target, construct a
transport via [`create_transport`], drive it, and hand results to the
output layer. The [`StateStore`] is passed in explicitly so nothing here
touches ambient global state.
*/

use serde_json::{Map, Value};

use crate::config::Config;
use crate::core::{wrap_error, CommandError, ErrorSource};
use crate::error::{Result, ToolgateError};
use crate::output;
use crate::state::{CliState, StateStore};
use crate::transport::{create_transport, Transport};

pub mod shell;

/// Resolve the target server: an explicit `--server` wins, otherwise the
/// remembered connection.
///
/// # Errors
///
/// Returns [`ToolgateError::State`] when neither is available.
pub fn resolve_target(server: Option<String>, store: &StateStore) -> Result<String> {
    if let Some(server) = server {
        return Ok(server);
    }
    store.load().server.ok_or_else(|| {
        ToolgateError::State(
            "No server connected. Use 'toolgate connect <server>' first.".to_string(),
        )
        .into()
    })
}

/// Map a raised error onto the structured error panel.
///
/// Raised transport errors render identically to a `Failure` result, with
/// a code drawn from the standard taxonomy.
pub fn report_error(err: &anyhow::Error) {
    use crate::core::codes;

    let command_error = match err.downcast_ref::<ToolgateError>() {
        Some(ToolgateError::ToolNotFound { tool_name }) => {
            CommandError::new(codes::NOT_FOUND, format!("Tool '{}' not found", tool_name))
                .with_suggestion("Use 'toolgate tools' to list available tools")
                .with_detail("tool_name", tool_name.as_str())
        }
        Some(ToolgateError::Connection(msg)) => {
            CommandError::new(codes::SERVICE_UNAVAILABLE, msg.as_str())
                .retryable(true)
                .with_suggestion("Check the server target and try again")
        }
        Some(ToolgateError::Timeout {
            operation,
            timeout_ms,
        }) => crate::core::timeout_error(operation, *timeout_ms),
        Some(ToolgateError::Config(msg)) | Some(ToolgateError::State(msg)) => {
            CommandError::new(codes::INVALID_INPUT, msg.as_str())
        }
        _ => wrap_error(ErrorSource::Foreign {
            message: err.to_string(),
            error_type: "Error".to_string(),
        }),
    };
    output::print_error_panel(&command_error);
}

/// Connect command handler
pub mod connect {
    use super::*;

    /// Connect to `target`, remember it, and report the tool count.
    ///
    /// The session is torn down before returning; later commands open
    /// their own.
    pub async fn run_connect(
        config: &Config,
        store: &StateStore,
        target: String,
        timeout: Option<u64>,
        quiet: bool,
    ) -> Result<()> {
        let mut transport_config = config.transport.clone();
        if let Some(timeout_ms) = timeout {
            transport_config.timeout_ms = timeout_ms;
        }

        if !quiet {
            output::print_info(&format!("Connecting to {}...", target));
        }

        let mut transport = create_transport(&target, transport_config)?;
        transport.connect().await?;

        let tools = transport.list_tools().await.unwrap_or_default();
        transport.disconnect().await;

        store.save(&CliState {
            server: Some(target.clone()),
        })?;
        tracing::info!(server = %target, "connection verified and remembered");

        if !quiet {
            output::print_success(&format!("Connected to {}", target));
            if !tools.is_empty() {
                output::print_info(&format!("Available tools: {}", tools.len()));
            }
        }
        Ok(())
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use tempfile::tempdir;

        #[tokio::test]
        async fn test_connect_mock_saves_state() {
            let dir = tempdir().unwrap();
            let store = StateStore::new(dir.path().join("state.json"));
            run_connect(
                &Config::default(),
                &store,
                "mock".to_string(),
                None,
                true,
            )
            .await
            .unwrap();
            assert_eq!(store.load().server.as_deref(), Some("mock"));
        }

        #[tokio::test]
        async fn test_connect_bad_target_fails_without_saving() {
            let dir = tempdir().unwrap();
            let store = StateStore::new(dir.path().join("state.json"));
            let res = run_connect(
                &Config::default(),
                &store,
                "not a url".to_string(),
                None,
                true,
            )
            .await;
            assert!(res.is_err());
            assert!(store.load().server.is_none());
        }
    }
}

/// Disconnect command handler
pub mod disconnect {
    use super::*;

    /// Forget the remembered server.
    pub fn run_disconnect(store: &StateStore, quiet: bool) -> Result<()> {
        let state = store.load();
        match state.server {
            Some(server) => {
                store.clear()?;
                if !quiet {
                    output::print_success(&format!("Disconnected from {}", server));
                }
            }
            None => {
                if !quiet {
                    output::print_info("No active connection");
                }
            }
        }
        Ok(())
    }

}

/// Tools listing command handler
pub mod tools {
    use super::*;

    /// List advertised tools, optionally filtered, or show one in detail.
    pub async fn run_tools(
        config: &Config,
        store: &StateStore,
        server: Option<String>,
        filter: Option<String>,
        detail: Option<String>,
        json_output: bool,
    ) -> Result<()> {
        let target = resolve_target(server, store)?;
        let mut transport = create_transport(&target, config.transport.clone())?;
        transport.connect().await?;
        let listed = transport.list_tools().await;
        transport.disconnect().await;
        let mut tools = listed?;

        if let Some(pattern) = &filter {
            let pattern = pattern.to_lowercase();
            tools.retain(|t| t.name.to_lowercase().contains(&pattern));
        }

        if let Some(name) = detail {
            let tool = tools
                .iter()
                .find(|t| t.name == name)
                .ok_or(ToolgateError::ToolNotFound { tool_name: name })?;
            if json_output {
                println!("{}", serde_json::to_string_pretty(tool)?);
            } else {
                output::print_tool_detail(tool)?;
            }
            return Ok(());
        }

        if json_output {
            println!("{}", serde_json::to_string_pretty(&tools)?);
        } else {
            output::print_tools(&tools);
        }
        Ok(())
    }

}

/// Tool invocation command handler
pub mod call {
    use super::*;

    /// Parse a JSON argument string into the mapping `call_tool` expects.
    ///
    /// # Errors
    ///
    /// Returns [`ToolgateError::Config`] when the string is not valid JSON
    /// or not a JSON object (tool arguments are a mapping by contract).
    pub fn parse_arguments(args: &str) -> Result<Map<String, Value>> {
        let value: Value = serde_json::from_str(args)
            .map_err(|e| ToolgateError::Config(format!("Invalid JSON arguments: {}", e)))?;
        match value {
            Value::Object(map) => Ok(map),
            other => Err(ToolgateError::Config(format!(
                "Tool arguments must be a JSON object, got: {}",
                other
            ))
            .into()),
        }
    }

    /// Call `tool` on the resolved server and render the outcome.
    pub async fn run_call(
        config: &Config,
        store: &StateStore,
        tool: String,
        args: String,
        server: Option<String>,
        json_output: bool,
    ) -> Result<()> {
        let arguments = parse_arguments(&args)?;
        let target = resolve_target(server, store)?;

        let mut transport = create_transport(&target, config.transport.clone())?;
        transport.connect().await?;
        let outcome = transport.call_tool(&tool, arguments).await;
        transport.disconnect().await;

        output::print_outcome(&outcome?, json_output)
    }

}

/// Status command handler
pub mod status {
    use super::*;

    /// Show the remembered connection.
    pub fn run_status(store: &StateStore, json_output: bool) -> Result<()> {
        let state = store.load();
        if json_output {
            println!(
                "{}",
                serde_json::to_string_pretty(&serde_json::json!({
                    "connected": state.server.is_some(),
                    "server": state.server,
                }))?
            );
            return Ok(());
        }
        match state.server {
            Some(server) => output::print_success(&format!("Connected to: {}", server)),
            None => {
                output::print_info("Not connected to any server");
                output::print_info("Use 'toolgate connect <server>' to connect");
            }
        }
        Ok(())
    }

}

/// Validation command handler
pub mod validate {
    use super::*;

    /// Connect to the resolved server, list its tools, and report.
    ///
    /// Any failed step surfaces as an error so the CLI exits non-zero.
    pub async fn run_validate(
        config: &Config,
        store: &StateStore,
        server: Option<String>,
        json_output: bool,
        quiet: bool,
    ) -> Result<()> {
        let target = resolve_target(server, store)?;
        let mut transport = create_transport(&target, config.transport.clone())?;

        transport.connect().await?;
        let listed = transport.list_tools().await;
        transport.disconnect().await;
        let tools = listed?;

        if json_output {
            println!(
                "{}",
                serde_json::to_string_pretty(&serde_json::json!({
                    "connection": true,
                    "tools_listed": true,
                    "tool_count": tools.len(),
                }))?
            );
        } else if !quiet {
            output::print_success("Connection: OK");
            output::print_success(&format!("Tools listed: {}", tools.len()));
            output::print_success("Validation passed");
        }
        Ok(())
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use tempfile::tempdir;

        #[tokio::test]
        async fn test_validate_mock_passes() {
            let dir = tempdir().unwrap();
            let store = StateStore::new(dir.path().join("state.json"));
            let res = run_validate(
                &Config::default(),
                &store,
                Some("mock".to_string()),
                false,
                true,
            )
            .await;
            assert!(res.is_ok());
        }

        #[tokio::test]
        async fn test_validate_without_target_fails() {
            let dir = tempdir().unwrap();
            let store = StateStore::new(dir.path().join("state.json"));
            let res = run_validate(&Config::default(), &store, None, false, true).await;
            assert!(res.is_err());
        }
    }
}
