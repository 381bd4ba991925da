//! Toolgate - tool-command client library and CLI
//!
//! This library provides the core contract for tool-style commands invoked
//! against a remote command surface, and a client abstraction that executes
//! those commands over a pluggable transport.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//!
//! - `core`: The command contract — result envelope, structured errors,
//!   and metadata value types (sources, plans, warnings, alternatives)
//! - `transport`: The `Transport` trait, connection-state machine, the
//!   live HTTP JSON-RPC implementation, and the in-memory mock
//! - `commands`: CLI subcommand handlers
//! - `config`: Configuration loading and validation
//! - `state`: Persisted CLI connection state
//! - `output`: Terminal rendering
//! - `error`: Crate error types and result alias
//! - `cli`: Command-line interface definition
//!
//! # Example
//!
//! ```
//! use serde_json::{json, Map};
//! use toolgate::core::CommandResult;
//! use toolgate::transport::{mock::MockTransport, Transport};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let mut transport = MockTransport::new();
//!     transport.register_tool("echo", None, |args| async move {
//!         CommandResult::success(json!({ "echo": args.get("message").cloned() }))
//!     });
//!
//!     transport.connect().await?;
//!     let mut args = Map::new();
//!     args.insert("message".to_string(), json!("hi"));
//!     let outcome = transport.call_tool("echo", args).await?;
//!     assert!(outcome.as_result().unwrap().is_success());
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod commands;
pub mod config;
pub mod core;
pub mod error;
pub mod output;
pub mod state;
pub mod transport;

// Re-export commonly used types
pub use crate::config::Config;
pub use crate::core::{CommandError, CommandResult};
pub use crate::error::{Result, ToolgateError};
pub use crate::transport::{
    create_transport, ToolInfo, ToolOutcome, Transport, TransportConfig, TransportState,
};
