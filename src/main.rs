//! Toolgate - tool-command CLI
//!
//! Main entry point for the toolgate command-line interface.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use toolgate::cli::{Cli, Commands};
use toolgate::commands;
use toolgate::config::Config;
use toolgate::error::Result;
use toolgate::state::StateStore;

#[tokio::main]
async fn main() {
    // Initialize tracing
    init_tracing();

    // Parse command line arguments
    let cli = Cli::parse_args();

    if let Err(e) = run(cli).await {
        // Raised errors render the same panel as a Failure result.
        commands::report_error(&e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    // Load and validate configuration
    let config = Config::load(&cli.config)?;
    config.validate()?;

    // The state store is an explicit collaborator handed to every command.
    let store = StateStore::default_location()?;

    match cli.command {
        Commands::Connect { target, timeout } => {
            tracing::info!(server = %target, "connect command");
            commands::connect::run_connect(&config, &store, target, timeout, cli.quiet).await
        }
        Commands::Disconnect => commands::disconnect::run_disconnect(&store, cli.quiet),
        Commands::Tools {
            server,
            filter,
            detail,
        } => commands::tools::run_tools(&config, &store, server, filter, detail, cli.json).await,
        Commands::Call { tool, args, server } => {
            tracing::info!(tool = %tool, "call command");
            commands::call::run_call(&config, &store, tool, args, server, cli.json).await
        }
        Commands::Status => commands::status::run_status(&store, cli.json),
        Commands::Validate { server } => {
            commands::validate::run_validate(&config, &store, server, cli.json, cli.quiet).await
        }
        Commands::Shell => commands::shell::run_shell(&config, &store, cli.json).await,
    }
}

/// Initialize tracing subscriber with environment filter
fn init_tracing() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("toolgate=warn"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
