// crates/fixture-harness-cli/src/main.rs
// ============================================================================
// Module: Fixture Harness CLI Entry Point
// Description: Command dispatcher for generated suite runs and config checks.
// Purpose: Run the heavy-load suites with resolved settings and report results.
// Dependencies: clap, fixture-harness-app, fixture-harness-config, fixture-harness-core
// ============================================================================

//! ## Overview
//! `fixture-harness run` resolves settings (file, then `FIXTURE_HARNESS_*`
//! environment, then flags), registers the heavy-load suite the configured
//! number of times, runs every case sequentially, and exits non-zero when a
//! case failed or a view was left attached. `fixture-harness config check`
//! prints the resolved settings without running anything.

// ============================================================================
// SECTION: Modules
// ============================================================================


// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::File;
use std::io::BufWriter;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::ArgAction;
use clap::Args;
use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;
use fixture_harness_app::AppError;
use fixture_harness_app::Payload;
use fixture_harness_app::app_compiler;
use fixture_harness_app::app_module;
use fixture_harness_app::heavy_load_definition;
use fixture_harness_config::ConfigError;
use fixture_harness_config::EnvOverrides;
use fixture_harness_config::HarnessConfig;
use fixture_harness_core::CaseStatus;
use fixture_harness_core::FixtureLifecycle;
use fixture_harness_core::JsonLinesObserver;
use fixture_harness_core::LifecycleObserver;
use fixture_harness_core::NoopObserver;
use fixture_harness_core::RunReport;
use fixture_harness_core::SequentialDriver;
use fixture_harness_core::generate;
use fixture_harness_registry::AccessPolicy;
use thiserror::Error;

// ============================================================================
// SECTION: CLI Types
// ============================================================================

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(name = "fixture-harness", version, disable_help_subcommand = true)]
struct Cli {
    /// Selected subcommand to execute.
    #[command(subcommand)]
    command: Commands,
}

/// Supported CLI subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate and run the heavy-load suites.
    Run(RunCommand),
    /// Configuration utilities.
    Config {
        /// Selected config subcommand.
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

/// Configuration for the `run` command.
#[derive(Args, Debug)]
struct RunCommand {
    /// Optional config file path (defaults to fixture-harness.toml or env override).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Number of suites to generate.
    #[arg(long, value_name = "COUNT")]
    suites: Option<usize>,
    /// Label prefix for generated suites.
    #[arg(long, value_name = "LABEL")]
    label: Option<String>,
    /// Skip remaining cases after the first failure.
    #[arg(long, action = ArgAction::SetTrue)]
    fail_fast: bool,
    /// Append lifecycle events as JSON lines to this file.
    #[arg(long, value_name = "PATH")]
    event_log: Option<PathBuf>,
    /// Report format written to stdout.
    #[arg(long, value_enum, default_value = "text")]
    format: OutputFormat,
}

/// Config subcommands.
#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Load, validate, and print the resolved configuration.
    Check(ConfigCheckCommand),
}

/// Configuration for the `config check` command.
#[derive(Args, Debug)]
struct ConfigCheckCommand {
    /// Optional config file path (defaults to fixture-harness.toml or env override).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

/// Report output formats.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum OutputFormat {
    /// Failure lines followed by a one-line summary.
    Text,
    /// The full run report as pretty JSON.
    Json,
}

/// Runner settings supplied on the command line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct FlagOverrides {
    /// Suite count override.
    suites: Option<usize>,
    /// Suite label override.
    label: Option<String>,
    /// Forces fail-fast when set.
    fail_fast: bool,
}

impl RunCommand {
    /// Returns the runner overrides carried by flags.
    fn overrides(&self) -> FlagOverrides {
        FlagOverrides {
            suites: self.suites,
            label: self.label.clone(),
            fail_fast: self.fail_fast,
        }
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// CLI failures.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error)]
enum CliError {
    /// Configuration could not be resolved.
    #[error("config load failed: {0}")]
    Config(#[from] ConfigError),
    /// The app module or compiler could not be built.
    #[error("app setup failed: {0}")]
    App(#[from] AppError),
    /// The event log could not be opened.
    #[error("event log unavailable: {0}")]
    EventLog(String),
    /// A report or config could not be encoded.
    #[error("encoding failed: {0}")]
    Encode(String),
    /// Writing to an output stream failed.
    #[error("failed to write {stream}: {error}")]
    Output {
        /// Stream name.
        stream: &'static str,
        /// Underlying I/O error.
        error: String,
    },
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
    match cli.command {
        Commands::Run(command) => command_run(&command),
        Commands::Config {
            command,
        } => command_config(command),
    }
}

// ============================================================================
// SECTION: Run Command
// ============================================================================

/// Executes the `run` command.
fn command_run(command: &RunCommand) -> CliResult<ExitCode> {
    let config = resolve_config(command.config.as_deref(), &command.overrides())?;
    let event_log = open_event_log(command.event_log.as_deref())?;
    let report = run_suites(&config, observer_for(event_log.as_ref()))?;
    if let Some(log) = &event_log {
        let failures = log.write_failures();
        if failures > 0 {
            write_stderr_line(&format!("warning: {failures} lifecycle events were not logged"))?;
        }
    }
    match command.format {
        OutputFormat::Text => {
            for line in render_text(&report) {
                write_stdout_line(&line)?;
            }
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&report)
                .map_err(|err| CliError::Encode(err.to_string()))?;
            write_stdout_line(&json)?;
        }
    }
    Ok(if report.is_success() { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

/// Registers the configured suites and runs them to completion.
fn run_suites(
    config: &HarnessConfig,
    observer: Arc<dyn LifecycleObserver>,
) -> CliResult<RunReport> {
    let payload = Payload {
        string_bytes: config.payload.string_bytes,
        list_len: config.payload.list_len,
        object_fields: config.payload.object_fields,
    };
    let policy = AccessPolicy::from_lists(
        config.registry.allowlist.clone(),
        config.registry.denylist.clone(),
    );
    let module = Arc::new(app_module(payload, policy)?);
    let lifecycle = FixtureLifecycle::with_observer(app_compiler()?, observer);
    let mut driver = SequentialDriver::new(lifecycle).with_fail_fast(config.runner.fail_fast);
    generate(
        &mut driver,
        &heavy_load_definition(module),
        config.runner.suite_count,
        &config.runner.suite_label,
    );
    Ok(driver.run())
}

/// Renders failure lines followed by the summary line.
fn render_text(report: &RunReport) -> Vec<String> {
    let mut lines: Vec<String> = report
        .cases
        .iter()
        .filter_map(|outcome| match &outcome.status {
            CaseStatus::Failed {
                message,
            } => Some(format!("FAILED {} :: {}: {message}", outcome.suite, outcome.case)),
            CaseStatus::Passed | CaseStatus::Skipped => None,
        })
        .collect();
    lines.push(format!(
        "cases: {} passed: {} failed: {} skipped: {} leaked views: {}",
        report.total(),
        report.passed,
        report.failed,
        report.skipped,
        report.leaked_views
    ));
    lines
}

// ============================================================================
// SECTION: Config Commands
// ============================================================================

/// Dispatches config subcommands.
fn command_config(command: ConfigCommand) -> CliResult<ExitCode> {
    match command {
        ConfigCommand::Check(command) => command_config_check(&command),
    }
}

/// Executes the config check command.
fn command_config_check(command: &ConfigCheckCommand) -> CliResult<ExitCode> {
    let config = resolve_config(command.config.as_deref(), &FlagOverrides::default())?;
    let rendered = toml::to_string(&config).map_err(|err| CliError::Encode(err.to_string()))?;
    write_stdout_line("config ok")?;
    write_stdout_line(rendered.trim_end())?;
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Resolves settings from the file, the environment, and flags, in that order.
fn resolve_config(path: Option<&Path>, flags: &FlagOverrides) -> CliResult<HarnessConfig> {
    let mut config = HarnessConfig::load(path)?;
    config.apply_overrides(&EnvOverrides::from_env()?);
    apply_flag_overrides(&mut config, flags);
    config.validate()?;
    Ok(config)
}

/// Applies flag overrides on top of file and environment values.
fn apply_flag_overrides(config: &mut HarnessConfig, flags: &FlagOverrides) {
    if let Some(suites) = flags.suites {
        config.runner.suite_count = suites;
    }
    if let Some(label) = &flags.label {
        config.runner.suite_label.clone_from(label);
    }
    if flags.fail_fast {
        config.runner.fail_fast = true;
    }
}

/// Event log writer type.
type EventLog = JsonLinesObserver<BufWriter<File>>;

/// Opens the JSON-lines event log when a path is given.
fn open_event_log(path: Option<&Path>) -> CliResult<Option<Arc<EventLog>>> {
    let Some(path) = path else {
        return Ok(None);
    };
    let file = File::create(path).map_err(|err| CliError::EventLog(err.to_string()))?;
    Ok(Some(Arc::new(JsonLinesObserver::new(BufWriter::new(file)))))
}

/// Returns the lifecycle observer for an optional event log.
fn observer_for(event_log: Option<&Arc<EventLog>>) -> Arc<dyn LifecycleObserver> {
    match event_log {
        Some(log) => {
            let observer: Arc<dyn LifecycleObserver> = Arc::<EventLog>::clone(log);
            observer
        }
        None => Arc::new(NoopObserver),
    }
}

/// Writes a line to stdout.
fn write_stdout_line(message: &str) -> CliResult<()> {
    let mut stdout = std::io::stdout();
    writeln!(&mut stdout, "{message}").map_err(|err| CliError::Output {
        stream: "stdout",
        error: err.to_string(),
    })
}

/// Writes a line to stderr.
fn write_stderr_line(message: &str) -> CliResult<()> {
    let mut stderr = std::io::stderr();
    writeln!(&mut stderr, "{message}").map_err(|err| CliError::Output {
        stream: "stderr",
        error: err.to_string(),
    })
}

/// Emits an error message to stderr and returns a failure exit code.
fn emit_error(message: &str) -> ExitCode {
    let _ = write_stderr_line(message);
    ExitCode::FAILURE
}
