//! Terminal rendering for results and tool listings
//!
//! This module turns [`CommandResult`] envelopes, raw tool outcomes, and
//! tool listings into colored terminal output. With `--json` every renderer
//! emits raw machine-readable JSON instead.
//!
//! Success output leads with the trust metadata (confidence bar, reasoning)
//! so a caller sees how much to rely on the payload before the payload
//! itself. Failures render as an error panel with code, message, and
//! suggestion, written to stderr.

use colored::Colorize;
use prettytable::{format, row, Table};
use serde_json::Value;

use crate::core::{Alternative, CommandError, CommandResult, PlanStep, PlanStepStatus, Warning};
use crate::error::Result;
use crate::transport::{ToolInfo, ToolOutcome};

/// Render a tool-call outcome.
///
/// A structured envelope gets the full result treatment; a raw value is
/// printed as pretty JSON unchanged.
pub fn print_outcome(outcome: &ToolOutcome, json_output: bool) -> Result<()> {
    match outcome {
        ToolOutcome::Result(result) => print_result(result, json_output),
        ToolOutcome::Raw(value) => {
            println!("{}", serde_json::to_string_pretty(value)?);
            Ok(())
        }
    }
}

/// Render a [`CommandResult`] envelope.
pub fn print_result(result: &CommandResult<Value>, json_output: bool) -> Result<()> {
    if json_output {
        println!("{}", serde_json::to_string_pretty(result)?);
        return Ok(());
    }
    match result {
        CommandResult::Success(_) => print_success_result(result)?,
        CommandResult::Failure(f) => print_error_panel(&f.error),
    }
    Ok(())
}

fn print_success_result(result: &CommandResult<Value>) -> Result<()> {
    if let Some(confidence) = result.confidence() {
        println!(
            "Confidence: {} {:.0}%",
            confidence_bar(confidence),
            confidence * 100.0
        );
    }
    if let Some(reasoning) = result.reasoning() {
        println!("{}", reasoning.dimmed());
    }

    match result.data() {
        Some(data) => {
            println!("{}", "Success".green().bold());
            println!("{}", serde_json::to_string_pretty(data)?);
        }
        None => println!("{}", "Command completed successfully".green()),
    }

    for warning in result.warnings() {
        print_warning_line(warning);
    }
    if !result.plan().is_empty() {
        print_plan(result.plan());
    }
    if !result.alternatives().is_empty() {
        print_alternatives(result.alternatives());
    }
    Ok(())
}

/// Render a structured error as a panel on stderr.
///
/// Raised transport errors and `Failure` results go through the same
/// renderer, so both failure paths look identical to the user.
pub fn print_error_panel(error: &CommandError) {
    eprintln!("{} {}", "Error".red().bold(), error.code.red());
    eprintln!("  {}", error.message);
    if let Some(suggestion) = &error.suggestion {
        eprintln!("  {} {}", "Suggestion:".yellow(), suggestion);
    }
}

/// A fixed-width confidence bar colored by band.
fn confidence_bar(confidence: f64) -> String {
    const WIDTH: usize = 10;
    let filled = (confidence * WIDTH as f64).round() as usize;
    let filled = filled.min(WIDTH);
    let bar = format!("{}{}", "█".repeat(filled), "░".repeat(WIDTH - filled));
    if confidence >= 0.8 {
        bar.green().to_string()
    } else if confidence >= 0.5 {
        bar.yellow().to_string()
    } else {
        bar.red().to_string()
    }
}

fn status_marker(status: PlanStepStatus) -> &'static str {
    match status {
        PlanStepStatus::Pending => "[ ]",
        PlanStepStatus::InProgress => "[~]",
        PlanStepStatus::Complete => "[x]",
        PlanStepStatus::Failed => "[!]",
        PlanStepStatus::Skipped => "[-]",
    }
}

fn print_plan(plan: &[PlanStep]) {
    println!("{}", "Execution plan".bold());
    for step in plan {
        let label = step.description.as_deref().unwrap_or(&step.action);
        let line = format!("  {} {}", status_marker(step.status), label);
        match step.status {
            PlanStepStatus::Failed => println!("{}", line.red()),
            PlanStepStatus::Complete => println!("{}", line.green()),
            _ => println!("{}", line),
        }
    }
}

fn print_alternatives(alternatives: &[Alternative<Value>]) {
    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_CLEAN);
    table.set_titles(row!["Option", "Reason", "Confidence"]);
    // Cap the table; past five rows it stops being a summary.
    for alt in alternatives.iter().take(5) {
        let data = truncate(&alt.data.to_string(), 50);
        let confidence = alt
            .confidence
            .map(|c| format!("{:.0}%", c * 100.0))
            .unwrap_or_else(|| "-".to_string());
        table.add_row(row![data, alt.reason, confidence]);
    }
    println!("{}", "Alternatives considered".bold());
    table.printstd();
}

fn print_warning_line(warning: &Warning) {
    println!("{} {}", "warning:".yellow(), warning.message);
}

/// Render the tool listing as a table, sorted by name.
pub fn print_tools(tools: &[ToolInfo]) {
    if tools.is_empty() {
        println!("{}", "No tools available".yellow());
        return;
    }

    let mut sorted: Vec<&ToolInfo> = tools.iter().collect();
    sorted.sort_by(|a, b| a.name.cmp(&b.name));

    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_CLEAN);
    table.set_titles(row!["Name", "Description"]);
    for tool in &sorted {
        let description = tool.description.as_deref().unwrap_or("-");
        table.add_row(row![tool.name.cyan(), truncate(description, 60)]);
    }
    table.printstd();
    println!("\n{}", format!("Total: {} tools", tools.len()).dimmed());
}

/// Render one tool with its full input schema.
pub fn print_tool_detail(tool: &ToolInfo) -> Result<()> {
    println!("\n{}", tool.name.cyan().bold());
    if let Some(description) = &tool.description {
        println!("{}\n", description.dimmed());
    }
    if let Some(schema) = &tool.input_schema {
        println!("{}", "Input schema:".bold());
        println!("{}", serde_json::to_string_pretty(schema)?);
    }
    Ok(())
}

/// Print a plain error line (for failures that carry no structure).
pub fn print_error(message: &str) {
    eprintln!("{} {}", "Error:".red(), message);
}

/// Print a success line.
pub fn print_success(message: &str) {
    println!("{} {}", "ok".green(), message);
}

/// Print an informational line.
pub fn print_info(message: &str) {
    println!("{} {}", "info".blue(), message);
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() > max {
        let cut: String = text.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", cut)
    } else {
        text.to_string()
    }
}
