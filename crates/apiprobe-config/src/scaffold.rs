// crates/apiprobe-config/src/scaffold.rs
// ============================================================================
// Module: Project Scaffolding
// Description: Default configuration files for a new test project.
// Purpose: Write the starter config and per-environment overlays.
// Dependencies: serde_json, serde_yaml, std::fs
// ============================================================================

//! ## Overview
//! Scaffolding writes a complete starter `config/test-config.yaml` plus
//! `local`, `staging`, and `production` overlay files. Overlays are
//! partial documents merged over the base at load time, so they are built
//! as raw values rather than typed sections.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::path::PathBuf;

use serde_json::json;

use crate::ConfigError;
use crate::model::ApiInfo;
use crate::model::DockerSection;
use crate::model::ExecutionSection;
use crate::model::OpenApiSection;
use crate::model::ReportFormatName;
use crate::model::ReportingSection;
use crate::model::TargetApi;
use crate::model::TestConfig;
use crate::model::TestGeneration;
use crate::model::ValidationSection;

// ============================================================================
// SECTION: Starter Config
// ============================================================================

/// Builds the starter configuration written by project scaffolding.
#[must_use]
pub fn starter_config() -> TestConfig {
    TestConfig {
        api: ApiInfo {
            name: "My API".to_string(),
            version: "1.0.0".to_string(),
            description: Some("API description".to_string()),
        },
        openapi: OpenApiSection {
            spec_url: Some("https://api.example.com/openapi.json".to_string()),
            spec_file: None,
            spec_git: None,
        },
        target_api: TargetApi {
            base_url: "https://api.example.com".to_string(),
            timeout: 30,
            retries: 3,
            headers: BTreeMap::from([(
                "Content-Type".to_string(),
                "application/json".to_string(),
            )]),
            auth: None,
        },
        test_generation: TestGeneration {
            output_dir: PathBuf::from("generated/tests"),
            templates: vec![
                "basic".to_string(),
                "crud".to_string(),
                "error_handling".to_string(),
            ],
            custom_tests: Vec::new(),
            exclude_endpoints: Vec::new(),
            include_only: Vec::new(),
        },
        execution: ExecutionSection {
            environment: "local".to_string(),
            parallel: true,
            max_parallel: 4,
            timeout: 300,
            retry_failed: 1,
            read_only: false,
        },
        validation: ValidationSection::default(),
        docker: DockerSection::default(),
        reporting: ReportingSection {
            format: vec![ReportFormatName::Console, ReportFormatName::Json],
            output_dir: PathBuf::from("reports"),
            include_request_logs: true,
            include_response_logs: true,
        },
    }
}

// ============================================================================
// SECTION: Writing
// ============================================================================

/// Writes the starter configuration and environment overlays.
///
/// Expects `<project_root>/config` to exist; creates the `environments`
/// subdirectory.
///
/// # Errors
///
/// Returns [`ConfigError::Parse`] when serialization or writing fails.
pub fn write_default_config(project_root: &Path) -> Result<(), ConfigError> {
    let config_dir = project_root.join("config");
    let environments_dir = config_dir.join("environments");
    fs::create_dir_all(&environments_dir)
        .map_err(|err| ConfigError::Parse(format!("{}: {err}", environments_dir.display())))?;

    let base = serde_yaml::to_string(&starter_config())
        .map_err(|err| ConfigError::Parse(err.to_string()))?;
    write_file(&config_dir.join("test-config.yaml"), &base)?;

    for (name, overlay) in environment_overlays() {
        let body =
            serde_yaml::to_string(&overlay).map_err(|err| ConfigError::Parse(err.to_string()))?;
        write_file(&environments_dir.join(format!("{name}.yaml")), &body)?;
    }
    Ok(())
}

/// Builds the partial per-environment overlay documents.
fn environment_overlays() -> Vec<(&'static str, serde_json::Value)> {
    vec![
        (
            "local",
            json!({
                "target_api": {"base_url": "http://localhost:5000"},
                "docker": {"enabled": true, "services": ["api", "database"]}
            }),
        ),
        (
            "staging",
            json!({
                "target_api": {
                    "base_url": "https://staging-api.example.com",
                    "timeout": 60,
                    "headers": {"Authorization": "Bearer ${STAGING_TOKEN}"}
                }
            }),
        ),
        (
            "production",
            json!({
                "target_api": {
                    "base_url": "https://api.example.com",
                    "timeout": 120,
                    "headers": {"Authorization": "Bearer ${PROD_TOKEN}"}
                },
                "execution": {"read_only": true}
            }),
        ),
    ]
}

/// Writes one scaffolded file.
fn write_file(path: &Path, body: &str) -> Result<(), ConfigError> {
    fs::write(path, body).map_err(|err| ConfigError::Parse(format!("{}: {err}", path.display())))
}
