//! Command-line interface definition for Toolgate
//!
//! This module defines the CLI structure using clap's derive API, providing
//! commands for connecting to tool servers, listing and calling tools, and
//! an interactive shell.

use clap::{Parser, Subcommand};

/// Toolgate - call tools on remote command servers
///
/// Connect to a tool server (or the built-in mock), discover the tools it
/// advertises, and invoke them with JSON arguments. Results are structured
/// success/failure envelopes with confidence and reasoning metadata.
#[derive(Parser, Debug, Clone)]
#[command(name = "toolgate")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/toolgate.yaml")]
    pub config: String,

    /// Output raw JSON instead of formatted text
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands for Toolgate
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Connect to a tool server and remember it for later commands
    Connect {
        /// Server target: a URL, or "mock" for the in-memory transport
        target: String,

        /// Connection timeout in milliseconds (overrides config)
        #[arg(short, long)]
        timeout: Option<u64>,
    },

    /// Forget the remembered server
    Disconnect,

    /// List tools advertised by the connected server
    Tools {
        /// Server to query (uses the remembered connection if omitted)
        #[arg(short, long)]
        server: Option<String>,

        /// Only show tools whose name contains this pattern
        #[arg(short, long)]
        filter: Option<String>,

        /// Show detailed info (including input schema) for one tool
        #[arg(short, long)]
        detail: Option<String>,
    },

    /// Call a tool with JSON arguments
    Call {
        /// Name of the tool to call
        tool: String,

        /// JSON object of arguments
        #[arg(default_value = "{}")]
        args: String,

        /// Server to use (uses the remembered connection if omitted)
        #[arg(short, long)]
        server: Option<String>,
    },

    /// Show the current connection status
    Status,

    /// Validate a server: connect, list tools, report
    Validate {
        /// Server to validate (uses the remembered connection if omitted)
        #[arg(short, long)]
        server: Option<String>,
    },

    /// Start an interactive shell against the remembered server
    Shell,
}

impl Cli {
    /// Parse command line arguments
    ///
    /// # Returns
    ///
    /// Returns the parsed CLI structure
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
