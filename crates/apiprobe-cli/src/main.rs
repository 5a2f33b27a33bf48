// crates/apiprobe-cli/src/main.rs
// ============================================================================
// Module: apiprobe CLI Entry Point
// Description: Command dispatcher for the contract-to-test pipeline.
// Purpose: Wire config, spec, generation, execution, and reporting together.
// Dependencies: clap, apiprobe-config, apiprobe-spec, apiprobe-gen,
//               apiprobe-engine, apiprobe-report
// ============================================================================

//! ## Overview
//! The `apiprobe` binary drives the whole pipeline: `init` scaffolds a test
//! project, `generate` turns a contract into executable artifacts, `run`
//! executes the artifact suite and writes the configured reports, and
//! `validate` checks configuration plus contract shape without running
//! anything. Fatal stage errors terminate with a message on stderr and a
//! non-zero exit; failing tests surface through reports and the exit code.

// ============================================================================
// SECTION: Modules
// ============================================================================

#[cfg(test)]
mod main_tests;

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::fs;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use apiprobe_config::AuthKind;
use apiprobe_config::ReportFormatName;
use apiprobe_config::TestConfig;
use apiprobe_config::load_config;
use apiprobe_config::write_default_config;
use apiprobe_core::TestResult;
use apiprobe_engine::AuthScheme;
use apiprobe_engine::ComposeRunner;
use apiprobe_engine::EngineSettings;
use apiprobe_engine::ExecutionContext;
use apiprobe_engine::ExecutionMode;
use apiprobe_engine::ResultHook;
use apiprobe_engine::RunnerCommand;
use apiprobe_engine::TestEngine;
use apiprobe_gen::BatsRenderer;
use apiprobe_gen::ComposeContext;
use apiprobe_gen::GenerateOptions;
use apiprobe_gen::TargetInfo;
use apiprobe_gen::TestGenerator;
use apiprobe_report::ReportFormat;
use apiprobe_report::ReportOptions;
use apiprobe_report::write_reports;
use apiprobe_spec::GitSource;
use apiprobe_spec::SpecClient;
use apiprobe_spec::SpecSource;
use apiprobe_spec::extract_schemas;
use apiprobe_spec::parse_endpoints;
use apiprobe_spec::resolve_refs;
use apiprobe_spec::validate_document;
use clap::Args;
use clap::Parser;
use clap::Subcommand;
use serde_json::Value;

// ============================================================================
// SECTION: CLI Types
// ============================================================================

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(name = "apiprobe", version, about = "Contract-driven API test pipeline")]
struct Cli {
    /// Selected subcommand to execute.
    #[command(subcommand)]
    command: Commands,
}

/// Supported CLI subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Initialize a new apiprobe test project.
    Init(InitCommand),
    /// Generate test artifacts from the configured contract.
    Generate(GenerateCommand),
    /// Run the generated artifact suite.
    Run(RunCommand),
    /// Validate configuration and contract without running tests.
    Validate(ValidateCommand),
}

/// Arguments for `apiprobe init`.
#[derive(Args, Debug)]
struct InitCommand {
    /// Directory to create the project in.
    project_name: String,
}

/// Arguments for `apiprobe generate`.
#[derive(Args, Debug)]
struct GenerateCommand {
    /// Path to the configuration file.
    #[arg(long, short = 'c', value_name = "PATH")]
    config: Option<PathBuf>,
    /// Environment overlay to apply.
    #[arg(long, short = 'e', value_name = "NAME")]
    env: Option<String>,
}

/// Arguments for `apiprobe run`.
#[derive(Args, Debug)]
struct RunCommand {
    /// Path to the configuration file.
    #[arg(long, short = 'c', value_name = "PATH")]
    config: Option<PathBuf>,
    /// Environment overlay to apply.
    #[arg(long, short = 'e', value_name = "NAME")]
    env: Option<String>,
    /// Delegate the whole suite to the container orchestrator.
    #[arg(long)]
    docker: bool,
    /// Run artifacts under the bounded worker pool.
    #[arg(long)]
    parallel: bool,
    /// Print each result as it is recorded.
    #[arg(long, short = 'v')]
    verbose: bool,
}

/// Arguments for `apiprobe validate`.
#[derive(Args, Debug)]
struct ValidateCommand {
    /// Path to the configuration file.
    #[arg(long, short = 'c', value_name = "PATH")]
    config: Option<PathBuf>,
}

// ============================================================================
// SECTION: Error Type
// ============================================================================

/// Fatal CLI error carrying a user-facing message.
#[derive(Debug)]
struct CliError {
    /// Message printed to stderr.
    message: String,
}

impl CliError {
    /// Creates an error from a message.
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Wraps a displayable error.
    fn wrap(err: impl fmt::Display) -> Self {
        Self::new(err.to_string())
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// CLI result alias.
type CliResult<T> = Result<T, CliError>;

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// Process entry point.
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
        Commands::Init(command) => command_init(&command),
        Commands::Generate(command) => command_generate(&command),
        Commands::Run(command) => command_run(&command),
        Commands::Validate(command) => command_validate(&command),
    }
}

// ============================================================================
// SECTION: Init Command
// ============================================================================

/// Creates a new project skeleton with starter configuration.
fn command_init(command: &InitCommand) -> CliResult<ExitCode> {
    let project_path = PathBuf::from(&command.project_name);
    if project_path.exists() {
        return Err(CliError::new(format!(
            "directory '{}' already exists",
            command.project_name
        )));
    }

    for subdir in ["config", "config/environments", "generated", "reports"] {
        let dir = project_path.join(subdir);
        fs::create_dir_all(&dir)
            .map_err(|err| CliError::new(format!("create {}: {err}", dir.display())))?;
    }
    write_default_config(&project_path).map_err(CliError::wrap)?;

    write_stdout_line(&format!("Created apiprobe project: {}", command.project_name))
        .map_err(CliError::wrap)?;
    write_stdout_line("Edit config/test-config.yaml to configure your API")
        .map_err(CliError::wrap)?;
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Generate Command
// ============================================================================

/// Generates the artifact suite from the configured contract.
fn command_generate(command: &GenerateCommand) -> CliResult<ExitCode> {
    let config = load_and_validate(command.config.as_deref(), command.env.as_deref())?;
    let document = load_contract(&config)?;
    validate_document(&document).map_err(CliError::wrap)?;
    let resolved = resolve_refs(&document).map_err(CliError::wrap)?;

    let endpoints = parse_endpoints(&resolved);
    let schemas = extract_schemas(&resolved);
    let generator = TestGenerator::new(BatsRenderer::new());
    let generated = generator
        .generate(&endpoints, &schemas, &target_info(&config), &generate_options(&config))
        .map_err(CliError::wrap)?;

    write_stdout_line(&format!(
        "Generated {} test artifacts in {}",
        generated.artifacts.len(),
        config.test_generation.output_dir.display()
    ))
    .map_err(CliError::wrap)?;
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Run Command
// ============================================================================

/// Executes the artifact suite and writes the configured reports.
fn command_run(command: &RunCommand) -> CliResult<ExitCode> {
    let config = load_and_validate(command.config.as_deref(), command.env.as_deref())?;
    let context = execution_context(&config)?;
    let settings = EngineSettings {
        max_parallel: config.execution.max_parallel,
        timeout: Duration::from_secs(config.execution.timeout),
        retry_failed: config.execution.retry_failed,
    };
    let mode = select_mode(&config, command)?;

    let engine = TestEngine::new(RunnerCommand::default(), settings);
    let hook = |result: &TestResult| {
        let _ = write_stdout_line(&format_result_line(result));
    };
    let hook_ref: ResultHook<'_> = &hook;
    let summary = engine
        .execute(
            &config.test_generation.output_dir,
            &mode,
            &context,
            command.verbose.then_some(hook_ref),
        )
        .map_err(CliError::wrap)?;

    let options = ReportOptions {
        suite_name: &config.api.name,
        output_dir: &config.reporting.output_dir,
    };
    let mut stdout = std::io::stdout();
    write_reports(&summary, &report_formats(&config), &options, &mut stdout)
        .map_err(CliError::wrap)?;

    if summary.success {
        write_stdout_line("All tests passed").map_err(CliError::wrap)?;
        Ok(ExitCode::SUCCESS)
    } else {
        write_stdout_line(&format!("{} test(s) failed", summary.failed))
            .map_err(CliError::wrap)?;
        Ok(ExitCode::FAILURE)
    }
}

/// Selects the execution mode from flags and configuration.
fn select_mode(config: &TestConfig, command: &RunCommand) -> CliResult<ExecutionMode> {
    if command.docker {
        if !config.docker.enabled {
            return Err(CliError::new("docker is not enabled in configuration"));
        }
        ensure_compose_file(config)?;
        return Ok(ExecutionMode::Container(ComposeRunner::new(
            config.docker.compose_file.clone(),
        )));
    }
    if command.parallel || config.execution.parallel {
        return Ok(ExecutionMode::Parallel);
    }
    Ok(ExecutionMode::Sequential)
}

/// Renders the orchestration file when it does not exist yet.
fn ensure_compose_file(config: &TestConfig) -> CliResult<()> {
    if config.docker.compose_file.exists() {
        return Ok(());
    }
    let compose = ComposeContext {
        api_name: config.api.name.clone(),
        services: config.docker.services.clone(),
        build_context: config.docker.build_context.clone(),
    };
    TestGenerator::new(BatsRenderer::new())
        .generate_compose(&config.docker.compose_file, &compose)
        .map_err(CliError::wrap)
}

/// Formats one per-result progress line.
fn format_result_line(result: &TestResult) -> String {
    let verdict = if result.success { "PASS" } else { "FAIL" };
    format!("{verdict} {} ({:.2}s)", result.artifact, result.duration.as_secs_f64())
}

// ============================================================================
// SECTION: Validate Command
// ============================================================================

/// Validates configuration and contract shape without running tests.
fn command_validate(command: &ValidateCommand) -> CliResult<ExitCode> {
    let config = load_and_validate(command.config.as_deref(), None)?;
    let document = load_contract(&config)?;
    validate_document(&document).map_err(CliError::wrap)?;

    write_stdout_line("Configuration and OpenAPI specification are valid")
        .map_err(CliError::wrap)?;
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Pipeline Wiring
// ============================================================================

/// Loads and semantically validates the configuration.
fn load_and_validate(path: Option<&Path>, environment: Option<&str>) -> CliResult<TestConfig> {
    let config = load_config(path, environment).map_err(CliError::wrap)?;
    apiprobe_config::validate(&config).map_err(CliError::wrap)?;
    Ok(config)
}

/// Fetches and decodes the configured contract.
fn load_contract(config: &TestConfig) -> CliResult<Value> {
    let source = spec_source(config)?;
    let client = SpecClient::new().map_err(CliError::wrap)?;
    client.load(&source).map_err(CliError::wrap)
}

/// Maps the configuration onto a loader source descriptor.
fn spec_source(config: &TestConfig) -> CliResult<SpecSource> {
    let git = config.openapi.spec_git.as_ref().map(|spec| GitSource {
        repo: spec.repo.clone(),
        path: spec.path.clone(),
        branch: spec.branch.clone(),
        token: spec.token.clone(),
    });
    SpecSource::from_parts(
        config.openapi.spec_url.clone(),
        config.openapi.spec_file.clone(),
        git,
    )
    .map_err(CliError::wrap)
}

/// Maps the configuration onto renderer target facts.
fn target_info(config: &TestConfig) -> TargetInfo {
    TargetInfo {
        base_url: config.target_api.base_url.clone(),
        timeout_secs: config.target_api.timeout,
    }
}

/// Maps the configuration onto generation options.
fn generate_options(config: &TestConfig) -> GenerateOptions {
    GenerateOptions {
        output_dir: config.test_generation.output_dir.clone(),
        templates: config.test_generation.templates.clone(),
        exclude_endpoints: config.test_generation.exclude_endpoints.clone(),
        include_only: config.test_generation.include_only.clone(),
        custom_tests: config.test_generation.custom_tests.clone(),
        write_test_data: true,
    }
}

/// Maps the configuration onto the immutable execution context.
fn execution_context(config: &TestConfig) -> CliResult<ExecutionContext> {
    let auth = match &config.target_api.auth {
        None => None,
        Some(auth) => Some(match auth.kind {
            AuthKind::Bearer => AuthScheme::Bearer {
                token: required_auth_field(auth.token.as_deref(), "token")?,
            },
            AuthKind::Basic => AuthScheme::Basic {
                username: required_auth_field(auth.username.as_deref(), "username")?,
                password: required_auth_field(auth.password.as_deref(), "password")?,
            },
            AuthKind::ApiKey => AuthScheme::ApiKey {
                key: required_auth_field(auth.api_key.as_deref(), "api_key")?,
                header: auth.api_key_header.clone().unwrap_or_else(|| "X-API-Key".to_string()),
            },
        }),
    };
    Ok(ExecutionContext {
        base_url: config.target_api.base_url.clone(),
        auth,
        request_timeout: Duration::from_secs(config.target_api.timeout),
        max_retries: config.target_api.retries,
    })
}

/// Extracts a required auth field or fails with its name.
fn required_auth_field(value: Option<&str>, field: &str) -> CliResult<String> {
    match value {
        Some(value) if !value.is_empty() => Ok(value.to_string()),
        _ => Err(CliError::new(format!("target_api.auth: missing required field '{field}'"))),
    }
}

/// Maps configured report format names onto report writers.
fn report_formats(config: &TestConfig) -> Vec<ReportFormat> {
    config
        .reporting
        .format
        .iter()
        .map(|name| match name {
            ReportFormatName::Console => ReportFormat::Console,
            ReportFormatName::Json => ReportFormat::Json,
            ReportFormatName::Junit => ReportFormat::Junit,
            ReportFormatName::Html => ReportFormat::Html,
        })
        .collect()
}

// ============================================================================
// SECTION: Output Helpers
// ============================================================================

/// Writes a single line to stdout.
fn write_stdout_line(message: &str) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    writeln!(&mut stdout, "{message}")
}

/// Writes a single line to stderr.
fn write_stderr_line(message: &str) -> std::io::Result<()> {
    let mut stderr = std::io::stderr();
    writeln!(&mut stderr, "{message}")
}

/// Emits an error message to stderr and returns a failure exit code.
fn emit_error(message: &str) -> ExitCode {
    let _ = write_stderr_line(&format!("Error: {message}"));
    ExitCode::FAILURE
}
