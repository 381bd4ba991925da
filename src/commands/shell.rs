//! Interactive shell handler
//!
//! A readline-based REPL against the remembered server. Unlike the one-shot
//! commands, the shell holds a single connected transport for its whole
//! lifetime and tears it down on exit.
//!
//! Commands: `tools`, `call <tool> [json]`, `help`, `exit` (or `quit`).

use colored::Colorize;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use crate::commands::{call::parse_arguments, report_error, resolve_target};
use crate::config::Config;
use crate::error::Result;
use crate::output;
use crate::state::StateStore;
use crate::transport::{create_transport, Transport};

/// Start the interactive shell.
///
/// # Errors
///
/// Returns an error when no server is remembered, the connection fails, or
/// the terminal cannot be opened. Errors from individual shell commands are
/// rendered inline and do not end the session.
pub async fn run_shell(config: &Config, store: &StateStore, json_output: bool) -> Result<()> {
    let target = resolve_target(None, store)?;

    let mut transport = create_transport(&target, config.transport.clone())?;
    transport.connect().await?;
    tracing::info!(server = %target, "shell session opened");

    println!(
        "{} - connected to {}",
        "Toolgate shell".bold(),
        target.cyan()
    );
    println!("{}", "Type 'help' for commands, 'exit' to quit".dimmed());

    let mut rl = DefaultEditor::new()?;

    loop {
        match rl.readline("toolgate> ") {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                rl.add_history_entry(line)?;

                if line == "exit" || line == "quit" {
                    break;
                }

                if line == "help" {
                    print_help();
                    continue;
                }

                if line == "tools" {
                    match transport.list_tools().await {
                        Ok(tools) => output::print_tools(&tools),
                        Err(e) => report_error(&e),
                    }
                    continue;
                }

                if let Some(rest) = line.strip_prefix("call ") {
                    let mut parts = rest.trim().splitn(2, char::is_whitespace);
                    let tool = match parts.next() {
                        Some(tool) if !tool.is_empty() => tool.to_string(),
                        _ => {
                            output::print_error("Usage: call <tool> [json-args]");
                            continue;
                        }
                    };
                    let args = parts.next().unwrap_or("{}");

                    let arguments = match parse_arguments(args) {
                        Ok(arguments) => arguments,
                        Err(e) => {
                            report_error(&e);
                            continue;
                        }
                    };

                    match transport.call_tool(&tool, arguments).await {
                        Ok(outcome) => {
                            if let Err(e) = output::print_outcome(&outcome, json_output) {
                                report_error(&e);
                            }
                        }
                        Err(e) => report_error(&e),
                    }
                    continue;
                }

                println!("{}", format!("Unknown command: {}", line).yellow());
            }
            Err(ReadlineError::Interrupted) => {
                println!("CTRL-C");
                break;
            }
            Err(ReadlineError::Eof) => {
                println!("CTRL-D");
                break;
            }
            Err(err) => {
                tracing::error!("Readline error: {:?}", err);
                break;
            }
        }
    }

    transport.disconnect().await;
    println!("{}", "Goodbye!".dimmed());
    Ok(())
}

fn print_help() {
    println!(
        "\n{}\n  tools              List available tools\n  call <tool> [json] Call a tool with optional JSON args\n  help               Show this help\n  exit               Exit the shell\n",
        "Commands:".bold()
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_shell_requires_remembered_server() {
        let dir = tempdir().unwrap();
        let store = StateStore::new(dir.path().join("state.json"));
        let res = run_shell(&Config::default(), &store, false).await;
        assert!(res.is_err());
    }
}
