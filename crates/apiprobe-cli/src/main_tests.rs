// crates/apiprobe-cli/src/main_tests.rs
// ============================================================================
// Module: CLI Unit Tests
// Description: Unit coverage for configuration-to-pipeline mapping.
// Purpose: Pin the wiring between the typed config and pipeline inputs.
// Dependencies: apiprobe-cli, apiprobe-config, tempfile
// ============================================================================

//! ## Overview
//! Unit tests for the mapping helpers in the command dispatcher: spec
//! source selection, execution-context construction, report format
//! mapping, and project initialization.

// ============================================================================
// SECTION: Imports
// ============================================================================

use apiprobe_config::AuthConfig;
use apiprobe_config::AuthKind;
use apiprobe_config::GitSpec;
use apiprobe_config::starter_config;
use apiprobe_engine::AuthScheme;
use apiprobe_report::ReportFormat;
use apiprobe_spec::SpecSource;
use tempfile::tempdir;

use crate::InitCommand;
use crate::command_init;
use crate::execution_context;
use crate::format_result_line;
use crate::report_formats;
use crate::spec_source;

// ============================================================================
// SECTION: Mapping Tests
// ============================================================================

/// Tests the configured URL maps onto a URL source.
#[test]
fn spec_source_maps_url() {
    let config = starter_config();
    let source = spec_source(&config).expect("source");
    assert!(matches!(source, SpecSource::Url(url)
        if url == "https://api.example.com/openapi.json"));
}

/// Tests the git descriptor maps fields and branch default through.
#[test]
fn spec_source_maps_git() {
    let mut config = starter_config();
    config.openapi.spec_url = None;
    config.openapi.spec_git = Some(GitSpec {
        repo: "https://github.com/acme/contracts".to_string(),
        path: "openapi.yaml".to_string(),
        branch: "main".to_string(),
        token: Some("sekrit".to_string()),
    });
    let source = spec_source(&config).expect("source");
    assert!(matches!(source, SpecSource::Git(git)
        if git.repo == "https://github.com/acme/contracts"
            && git.branch == "main"
            && git.token.as_deref() == Some("sekrit")));
}

/// Tests bearer auth maps onto the bearer scheme.
#[test]
fn execution_context_maps_bearer() {
    let mut config = starter_config();
    config.target_api.auth = Some(AuthConfig {
        kind: AuthKind::Bearer,
        token: Some("tok".to_string()),
        username: None,
        password: None,
        api_key: None,
        api_key_header: None,
    });
    let context = execution_context(&config).expect("context");
    assert_eq!(
        context.auth,
        Some(AuthScheme::Bearer {
            token: "tok".to_string()
        })
    );
    assert_eq!(context.base_url, "https://api.example.com");
}

/// Tests the API-key header falls back to its default.
#[test]
fn execution_context_defaults_api_key_header() {
    let mut config = starter_config();
    config.target_api.auth = Some(AuthConfig {
        kind: AuthKind::ApiKey,
        token: None,
        username: None,
        password: None,
        api_key: Some("k-1".to_string()),
        api_key_header: None,
    });
    let context = execution_context(&config).expect("context");
    assert_eq!(
        context.auth,
        Some(AuthScheme::ApiKey {
            key: "k-1".to_string(),
            header: "X-API-Key".to_string()
        })
    );
}

/// Tests incomplete auth fails with the missing field name.
#[test]
fn execution_context_rejects_incomplete_auth() {
    let mut config = starter_config();
    config.target_api.auth = Some(AuthConfig {
        kind: AuthKind::Basic,
        token: None,
        username: Some("probe".to_string()),
        password: None,
        api_key: None,
        api_key_header: None,
    });
    let err = execution_context(&config).expect_err("incomplete auth");
    assert!(err.to_string().contains("password"));
}

/// Tests configured format names map onto report writers in order.
#[test]
fn report_formats_map_in_order() {
    let config = starter_config();
    assert_eq!(report_formats(&config), vec![ReportFormat::Console, ReportFormat::Json]);
}

/// Tests the per-result progress line shape.
#[test]
fn result_line_shape() {
    let result = apiprobe_core::TestResult {
        artifact: "basic_pets.bats".to_string(),
        success: true,
        output: String::new(),
        duration: std::time::Duration::from_millis(1500),
        exit_code: 0,
        error_message: None,
    };
    assert_eq!(format_result_line(&result), "PASS basic_pets.bats (1.50s)");
}

// ============================================================================
// SECTION: Init Tests
// ============================================================================

/// Tests init scaffolds the project tree.
#[test]
fn init_scaffolds_project_tree() {
    let dir = tempdir().expect("temp dir");
    let project = dir.path().join("petstore-tests");
    let command = InitCommand {
        project_name: project.display().to_string(),
    };
    command_init(&command).expect("init");

    assert!(project.join("config").join("test-config.yaml").exists());
    assert!(project.join("config").join("environments").join("local.yaml").exists());
    assert!(project.join("generated").exists());
    assert!(project.join("reports").exists());
}

/// Tests init refuses an existing directory.
#[test]
fn init_refuses_existing_directory() {
    let dir = tempdir().expect("temp dir");
    let command = InitCommand {
        project_name: dir.path().display().to_string(),
    };
    let err = command_init(&command).expect_err("existing dir");
    assert!(err.to_string().contains("already exists"));
}
