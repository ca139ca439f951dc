// crates/sumo-extension-cli/src/main.rs
// ============================================================================
// Module: Sumo Extension CLI Entry Point
// Description: Command dispatcher for inspecting the extension configuration.
// Purpose: Validate or print the startup config from the process environment.
// Dependencies: clap, serde_json, sumo-extension-config, thiserror.
// ============================================================================

//! ## Overview
//! The CLI builds the extension configuration exactly as the extension does at
//! startup, emits the startup log event, and then either reports validation
//! issues (`check`) or prints the redacted effective configuration (`print`).
//! The endpoint secret is never printed.

// ============================================================================
// SECTION: Modules
// ============================================================================


// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::ArgAction;
use clap::CommandFactory;
use clap::Parser;
use clap::Subcommand;
use sumo_extension_config::ConfigBuild;
use sumo_extension_config::ConfigLogSink;
use sumo_extension_config::ExtensionConfig;
use sumo_extension_config::FileConfigLogSink;
use sumo_extension_config::StderrConfigLogSink;
use sumo_extension_config::record_build;
use thiserror::Error;

// ============================================================================
// SECTION: CLI Types
// ============================================================================

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(name = "sumo-extension", disable_help_subcommand = true, disable_version_flag = true)]
struct Cli {
    /// Print version information and exit.
    #[arg(long = "version", action = ArgAction::SetTrue, global = true)]
    show_version: bool,
    /// Append the startup log event to this file instead of stderr.
    #[arg(long, value_name = "PATH", global = true)]
    log_file: Option<PathBuf>,
    /// Selected subcommand to execute.
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Supported CLI subcommands.
#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
enum Commands {
    /// Validate the configuration and list every issue.
    Check,
    /// Print the redacted effective configuration as JSON.
    Print,
}

/// Lines to write and the resulting status of a command.
#[derive(Debug, Default, PartialEq, Eq)]
struct CommandOutput {
    /// Lines for stdout.
    stdout: Vec<String>,
    /// Lines for stderr.
    stderr: Vec<String>,
    /// Whether the command succeeded.
    success: bool,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// CLI error wrapper for user-facing messages.
#[derive(Debug, Error)]
#[error("{message}")]
struct CliError {
    /// Human-readable error message.
    message: String,
}

impl CliError {
    /// Constructs a new [`CliError`] from a message.
    const fn new(message: String) -> Self {
        Self {
            message,
        }
    }
}

/// CLI result alias for fallible operations.
type CliResult<T> = Result<T, CliError>;

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// CLI entry point returning an exit code.
fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(err) => emit_error(&err.to_string()),
    }
}

/// Executes the CLI command dispatcher.
fn run() -> CliResult<ExitCode> {
    let cli = Cli::parse();

    if cli.show_version {
        let version = env!("CARGO_PKG_VERSION");
        write_stdout_line(&format!("sumo-extension {version}"))
            .map_err(|err| CliError::new(output_error("stdout", &err)))?;
        return Ok(ExitCode::SUCCESS);
    }

    let Some(command) = cli.command else {
        show_help()?;
        return Ok(ExitCode::SUCCESS);
    };

    let build = ExtensionConfig::from_env();
    let sink = open_sink(cli.log_file.as_deref())?;
    record_build(sink.as_ref(), &build);

    let output = match command {
        Commands::Check => command_check(&build),
        Commands::Print => command_print(&build)?,
    };
    emit_output(&output)
}

// ============================================================================
// SECTION: Commands
// ============================================================================

/// Executes the `check` command.
fn command_check(build: &ConfigBuild) -> CommandOutput {
    if build.is_ok() {
        return CommandOutput {
            stdout: vec!["configuration ok".to_string()],
            stderr: Vec::new(),
            success: true,
        };
    }
    CommandOutput {
        stdout: Vec::new(),
        stderr: issue_lines(build),
        success: false,
    }
}

/// Executes the `print` command.
fn command_print(build: &ConfigBuild) -> CliResult<CommandOutput> {
    let rendered = serde_json::to_string_pretty(&build.config.redacted())
        .map_err(|err| CliError::new(format!("failed to render configuration: {err}")))?;
    let stderr = if build.is_ok() { Vec::new() } else { issue_lines(build) };
    Ok(CommandOutput {
        stdout: vec![rendered],
        stderr,
        success: build.is_ok(),
    })
}

/// Formats a summary line followed by one line per issue.
fn issue_lines(build: &ConfigBuild) -> Vec<String> {
    let issues = build.issues();
    let mut lines = Vec::with_capacity(issues.len() + 1);
    lines.push(format!("configuration invalid: {} issue(s)", issues.len()));
    lines.extend(
        issues.iter().map(|issue| format!("  [{}] {}: {}", issue.kind, issue.variable, issue)),
    );
    lines
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Opens the log sink selected by `--log-file`.
fn open_sink(path: Option<&Path>) -> CliResult<Box<dyn ConfigLogSink>> {
    match path {
        Some(path) => {
            let sink = FileConfigLogSink::new(path).map_err(|err| {
                CliError::new(format!("failed to open log file {}: {err}", path.display()))
            })?;
            Ok(Box::new(sink))
        }
        None => Ok(Box::new(StderrConfigLogSink)),
    }
}

/// Writes command output and maps the status to an exit code.
fn emit_output(output: &CommandOutput) -> CliResult<ExitCode> {
    for line in &output.stdout {
        write_stdout_line(line).map_err(|err| CliError::new(output_error("stdout", &err)))?;
    }
    for line in &output.stderr {
        write_stderr_line(line).map_err(|err| CliError::new(output_error("stderr", &err)))?;
    }
    Ok(if output.success { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

/// Renders the top-level help text to stdout.
fn show_help() -> CliResult<()> {
    let mut command = Cli::command();
    let help = command.render_help().to_string();
    write_stdout_line(help.trim_end()).map_err(|err| CliError::new(output_error("stdout", &err)))
}

/// Writes a line to stdout.
fn write_stdout_line(message: &str) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    writeln!(&mut stdout, "{message}")
}

/// Writes a line to stderr.
fn write_stderr_line(message: &str) -> std::io::Result<()> {
    let mut stderr = std::io::stderr();
    writeln!(&mut stderr, "{message}")
}

/// Formats an output error message.
fn output_error(stream: &str, error: &std::io::Error) -> String {
    format!("failed to write to {stream}: {error}")
}

/// Emits an error message to stderr and returns a failure exit code.
fn emit_error(message: &str) -> ExitCode {
    let _ = write_stderr_line(message);
    ExitCode::FAILURE
}
