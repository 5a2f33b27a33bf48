// crates/apiprobe-config/src/model.rs
// ============================================================================
// Module: Configuration Model
// Description: Typed configuration sections and semantic validation.
// Purpose: Mirror the YAML configuration surface as serde types.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! One struct per YAML section, with serde defaults matching the values
//! the pipeline assumes when a knob is omitted. [`validate`] enforces the
//! cross-field invariants: a configured spec source, sane bounds, and
//! per-kind auth completeness.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::Deserialize;
use serde::Serialize;

use crate::ConfigError;

// ============================================================================
// SECTION: Top-Level Config
// ============================================================================

/// Complete test configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestConfig {
    /// API identity metadata.
    pub api: ApiInfo,
    /// Contract source selection.
    pub openapi: OpenApiSection,
    /// Target-API connection settings.
    pub target_api: TargetApi,
    /// Artifact generation settings.
    pub test_generation: TestGeneration,
    /// Execution settings.
    pub execution: ExecutionSection,
    /// Response validation settings.
    #[serde(default)]
    pub validation: ValidationSection,
    /// Container settings.
    #[serde(default)]
    pub docker: DockerSection,
    /// Reporting settings.
    #[serde(default)]
    pub reporting: ReportingSection,
}

/// API identity metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiInfo {
    /// Display name of the API under test.
    pub name: String,
    /// Version label of the API under test.
    pub version: String,
    /// Optional description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

// ============================================================================
// SECTION: Contract Source
// ============================================================================

/// Contract source selection; exactly one entry is expected.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OpenApiSection {
    /// Remote contract URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spec_url: Option<String>,
    /// Local contract path.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spec_file: Option<PathBuf>,
    /// Git-hosted contract descriptor.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spec_git: Option<GitSpec>,
}

/// Git-hosted contract descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GitSpec {
    /// Clone URL of the repository.
    pub repo: String,
    /// Repository-relative contract path.
    pub path: String,
    /// Branch to check out.
    #[serde(default = "default_branch")]
    pub branch: String,
    /// Optional access token.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

/// Default branch checked out for git sources.
fn default_branch() -> String {
    "main".to_string()
}

// ============================================================================
// SECTION: Target API
// ============================================================================

/// Target-API connection settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetApi {
    /// Base URL of the API under test.
    pub base_url: String,
    /// Per-request timeout in seconds.
    #[serde(default = "default_request_timeout")]
    pub timeout: u64,
    /// Artifact-level retry budget published to artifacts.
    #[serde(default = "default_retries")]
    pub retries: u32,
    /// Extra request headers for artifact authors.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub headers: BTreeMap<String, String>,
    /// Optional auth scheme.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth: Option<AuthConfig>,
}

/// Default per-request timeout in seconds.
const fn default_request_timeout() -> u64 {
    30
}

/// Default artifact-level retry budget.
const fn default_retries() -> u32 {
    3
}

/// Auth scheme kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthKind {
    /// Bearer-token auth.
    Bearer,
    /// Basic username/password auth.
    Basic,
    /// API-key auth.
    ApiKey,
}

/// Auth configuration; the fields required depend on the kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Selected auth kind.
    #[serde(rename = "type")]
    pub kind: AuthKind,
    /// Bearer token.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    /// Basic-auth username.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// Basic-auth password.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    /// API key value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Header the API key is sent in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key_header: Option<String>,
}

// ============================================================================
// SECTION: Generation
// ============================================================================

/// Artifact generation settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestGeneration {
    /// Directory artifacts are written into.
    pub output_dir: PathBuf,
    /// Templates rendered per tag group.
    #[serde(default = "default_templates")]
    pub templates: Vec<String>,
    /// Pre-written tests copied into the output directory.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub custom_tests: Vec<PathBuf>,
    /// Paths removed when no inclusion list is configured.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exclude_endpoints: Vec<String>,
    /// When non-empty, only these paths are kept.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub include_only: Vec<String>,
}

/// Default template list.
fn default_templates() -> Vec<String> {
    vec!["basic".to_string()]
}

// ============================================================================
// SECTION: Execution
// ============================================================================

/// Execution settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionSection {
    /// Environment label selecting a configuration overlay.
    pub environment: String,
    /// Whether bounded-parallel mode is the default.
    #[serde(default)]
    pub parallel: bool,
    /// Upper bound on simultaneously running artifacts.
    #[serde(default = "default_max_parallel")]
    pub max_parallel: usize,
    /// Per-artifact timeout in seconds.
    #[serde(default = "default_execution_timeout")]
    pub timeout: u64,
    /// Additional whole-mode re-invocations after a failing pass.
    #[serde(default)]
    pub retry_failed: u32,
    /// Hint to artifact authors that runs must stay side-effect free.
    #[serde(default)]
    pub read_only: bool,
}

/// Default parallel worker bound.
const fn default_max_parallel() -> usize {
    4
}

/// Default per-artifact timeout in seconds.
const fn default_execution_timeout() -> u64 {
    300
}

// ============================================================================
// SECTION: Validation, Docker, Reporting
// ============================================================================

/// Response validation settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationSection {
    /// Whether warnings are escalated to failures.
    #[serde(default)]
    pub strict_mode: bool,
    /// Whether response bodies are validated.
    #[serde(default = "default_true")]
    pub validate_responses: bool,
    /// Whether schemas are validated.
    #[serde(default = "default_true")]
    pub validate_schemas: bool,
    /// Whether contract compliance is checked.
    #[serde(default = "default_true")]
    pub check_contract_compliance: bool,
}

impl Default for ValidationSection {
    fn default() -> Self {
        Self {
            strict_mode: false,
            validate_responses: true,
            validate_schemas: true,
            check_contract_compliance: true,
        }
    }
}

/// Container settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DockerSection {
    /// Whether containerized execution is available.
    #[serde(default)]
    pub enabled: bool,
    /// Orchestration file path.
    #[serde(default = "default_compose_file")]
    pub compose_file: PathBuf,
    /// Services the test container depends on.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub services: Vec<String>,
    /// Optional image build context.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build_context: Option<String>,
}

impl Default for DockerSection {
    fn default() -> Self {
        Self {
            enabled: false,
            compose_file: default_compose_file(),
            services: Vec::new(),
            build_context: None,
        }
    }
}

/// Default orchestration file path.
fn default_compose_file() -> PathBuf {
    PathBuf::from("docker-compose.yml")
}

/// Report format names accepted in configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormatName {
    /// Console summary.
    Console,
    /// JSON report file.
    Json,
    /// JUnit-XML report file.
    Junit,
    /// HTML report file.
    Html,
}

/// Reporting settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportingSection {
    /// Formats emitted per run.
    #[serde(default = "default_formats")]
    pub format: Vec<ReportFormatName>,
    /// Directory report files land in.
    #[serde(default = "default_report_dir")]
    pub output_dir: PathBuf,
    /// Whether request logs are included by artifact authors.
    #[serde(default = "default_true")]
    pub include_request_logs: bool,
    /// Whether response logs are included by artifact authors.
    #[serde(default = "default_true")]
    pub include_response_logs: bool,
}

impl Default for ReportingSection {
    fn default() -> Self {
        Self {
            format: default_formats(),
            output_dir: default_report_dir(),
            include_request_logs: true,
            include_response_logs: true,
        }
    }
}

/// Default report format list.
fn default_formats() -> Vec<ReportFormatName> {
    vec![ReportFormatName::Console]
}

/// Default report directory.
fn default_report_dir() -> PathBuf {
    PathBuf::from("reports")
}

/// Shared serde default for enabled flags.
const fn default_true() -> bool {
    true
}

// ============================================================================
// SECTION: Semantic Validation
// ============================================================================

/// Validates the cross-field configuration invariants.
///
/// # Errors
///
/// Returns [`ConfigError::Invalid`] naming the first violation.
pub fn validate(config: &TestConfig) -> Result<(), ConfigError> {
    let openapi = &config.openapi;
    if openapi.spec_url.is_none() && openapi.spec_file.is_none() && openapi.spec_git.is_none() {
        return Err(ConfigError::Invalid(
            "openapi: no specification source configured".to_string(),
        ));
    }

    if config.target_api.base_url.is_empty() {
        return Err(ConfigError::Invalid("target_api.base_url: must not be empty".to_string()));
    }
    if config.target_api.timeout == 0 {
        return Err(ConfigError::Invalid("target_api.timeout: must be at least 1".to_string()));
    }
    if config.execution.max_parallel == 0 {
        return Err(ConfigError::Invalid(
            "execution.max_parallel: must be at least 1".to_string(),
        ));
    }
    if config.execution.timeout == 0 {
        return Err(ConfigError::Invalid("execution.timeout: must be at least 1".to_string()));
    }
    if config.reporting.format.is_empty() {
        return Err(ConfigError::Invalid(
            "reporting.format: at least one format is required".to_string(),
        ));
    }

    if let Some(auth) = &config.target_api.auth {
        validate_auth(auth)?;
    }
    Ok(())
}

/// Validates per-kind auth field completeness.
fn validate_auth(auth: &AuthConfig) -> Result<(), ConfigError> {
    match auth.kind {
        AuthKind::Bearer => {
            if auth.token.as_deref().is_none_or(str::is_empty) {
                return Err(ConfigError::Invalid(
                    "target_api.auth: bearer auth requires a token".to_string(),
                ));
            }
        }
        AuthKind::Basic => {
            if auth.username.as_deref().is_none_or(str::is_empty)
                || auth.password.as_deref().is_none_or(str::is_empty)
            {
                return Err(ConfigError::Invalid(
                    "target_api.auth: basic auth requires username and password".to_string(),
                ));
            }
        }
        AuthKind::ApiKey => {
            if auth.api_key.as_deref().is_none_or(str::is_empty) {
                return Err(ConfigError::Invalid(
                    "target_api.auth: api_key auth requires a key value".to_string(),
                ));
            }
        }
    }
    Ok(())
}
