// crates/apiprobe-gen/tests/generate.rs
// ============================================================================
// Module: Generation Tests
// Description: Integration coverage for artifact rendering and writing.
// Purpose: Pin artifact naming, content shape, and determinism.
// Dependencies: apiprobe-gen, apiprobe-core, serde_json, tempfile
// ============================================================================

//! ## Overview
//! Runs the generator against a small model and checks the files it
//! writes: suite naming per (template, tag) pair, helpers content, bats
//! test blocks, synthesized payloads, and render determinism.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::path::PathBuf;

use apiprobe_core::Endpoint;
use apiprobe_core::Method;
use apiprobe_core::Schema;
use apiprobe_gen::ArtifactRenderer;
use apiprobe_gen::BatsRenderer;
use apiprobe_gen::GenerateOptions;
use apiprobe_gen::RenderContext;
use apiprobe_gen::RenderError;
use apiprobe_gen::TargetInfo;
use apiprobe_gen::TestGenerator;
use serde_json::json;
use tempfile::tempdir;

// ============================================================================
// SECTION: Fixtures
// ============================================================================

/// Builds an endpoint with responses, tags, and an optional request body.
fn endpoint(
    method: Method,
    path: &str,
    tags: &[&str],
    responses: &[(&str, &str)],
    request_schema: Option<serde_json::Value>,
) -> Endpoint {
    Endpoint {
        path: path.to_string(),
        method,
        operation_id: None,
        summary: None,
        description: None,
        parameters: Vec::new(),
        request_body: request_schema.map(|schema| {
            json!({"content": {"application/json": {"schema": schema}}})
        }),
        responses: responses
            .iter()
            .map(|(status, description)| {
                ((*status).to_string(), json!({"description": description}))
            })
            .collect::<BTreeMap<_, _>>(),
        tags: tags.iter().map(|tag| (*tag).to_string()).collect(),
        security: Vec::new(),
    }
}

/// Returns the default target fixture.
fn target() -> TargetInfo {
    TargetInfo {
        base_url: "http://localhost:8080".to_string(),
        timeout_secs: 30,
    }
}

/// Returns the model fixture used across tests.
fn model() -> (Vec<Endpoint>, BTreeMap<String, Schema>) {
    let endpoints = vec![
        endpoint(Method::Get, "/pets", &["pets"], &[("200", "ok"), ("500", "boom")], None),
        endpoint(
            Method::Post,
            "/pets",
            &["pets"],
            &[("201", "created"), ("400", "bad request")],
            Some(json!({
                "type": "object",
                "properties": {"name": {"type": "string"}, "age": {"type": "integer"}}
            })),
        ),
        endpoint(Method::Get, "/health", &[], &[("200", "ok")], None),
    ];
    let mut schemas = BTreeMap::new();
    schemas.insert(
        "Pet".to_string(),
        Schema::from_definition(
            "Pet",
            &json!({
                "type": "object",
                "properties": {"id": {"type": "string"}, "name": {"type": "string"}}
            }),
        ),
    );
    (endpoints, schemas)
}

// ============================================================================
// SECTION: Generation Tests
// ============================================================================

/// Tests one suite is written per (template, tag) pair plus helpers.
#[test]
fn writes_one_suite_per_template_and_tag() {
    let dir = tempdir().expect("temp dir");
    let (endpoints, schemas) = model();
    let options = GenerateOptions {
        output_dir: dir.path().to_path_buf(),
        templates: vec!["basic".to_string(), "error_handling".to_string()],
        exclude_endpoints: Vec::new(),
        include_only: Vec::new(),
        custom_tests: Vec::new(),
        write_test_data: false,
    };
    let generated = TestGenerator::new(BatsRenderer::new())
        .generate(&endpoints, &schemas, &target(), &options)
        .expect("generate");

    let names: Vec<String> = generated
        .artifacts
        .iter()
        .filter_map(|path| path.file_name())
        .map(|name| name.to_string_lossy().into_owned())
        .collect();
    assert_eq!(
        names,
        vec![
            "basic_default.bats".to_string(),
            "basic_pets.bats".to_string(),
            "error_handling_default.bats".to_string(),
            "error_handling_pets.bats".to_string(),
        ]
    );
    assert!(generated.helpers.exists());
}

/// Tests rendered suites contain one bats block per derived case.
#[test]
fn basic_suite_contains_case_blocks() {
    let dir = tempdir().expect("temp dir");
    let (endpoints, schemas) = model();
    let options = GenerateOptions {
        output_dir: dir.path().to_path_buf(),
        templates: vec!["basic".to_string()],
        exclude_endpoints: Vec::new(),
        include_only: Vec::new(),
        custom_tests: Vec::new(),
        write_test_data: false,
    };
    TestGenerator::new(BatsRenderer::new())
        .generate(&endpoints, &schemas, &target(), &options)
        .expect("generate");

    let suite = std::fs::read_to_string(dir.path().join("basic_pets.bats")).expect("suite");
    assert!(suite.starts_with("#!/usr/bin/env bats\n"));
    assert!(suite.contains("load helpers"));
    assert!(suite.contains("@test \"GET /pets returns ok\""));
    assert!(suite.contains("@test \"GET /pets returns 500\""));
    assert!(suite.contains("@test \"POST /pets returns created\""));
    assert!(suite.contains("assert_status 201"));
}

/// Tests request bodies render as synthesized JSON payloads.
#[test]
fn request_body_payload_is_synthesized() {
    let renderer = BatsRenderer::new();
    let (endpoints, schemas) = model();
    let context = RenderContext {
        tag: "pets",
        endpoints: endpoints.iter().collect(),
        schemas: &schemas,
        target: &target(),
    };
    let suite = renderer.render_suite("basic", &context).expect("render");
    assert!(suite.contains(r#"'{"age":42,"name":"Test Name"}'"#));
}

/// Tests rendering is deterministic across invocations.
#[test]
fn rendering_is_deterministic() {
    let renderer = BatsRenderer::new();
    let (endpoints, schemas) = model();
    let context = RenderContext {
        tag: "pets",
        endpoints: endpoints.iter().collect(),
        schemas: &schemas,
        target: &target(),
    };
    let first = renderer.render_suite("basic", &context).expect("first");
    let second = renderer.render_suite("basic", &context).expect("second");
    assert_eq!(first, second);
}

/// Tests unknown templates are rejected.
#[test]
fn unknown_template_is_rejected() {
    let renderer = BatsRenderer::new();
    let (endpoints, schemas) = model();
    let context = RenderContext {
        tag: "pets",
        endpoints: endpoints.iter().collect(),
        schemas: &schemas,
        target: &target(),
    };
    let err = renderer.render_suite("fuzz", &context).expect_err("unknown template");
    assert!(matches!(err, RenderError::UnknownTemplate(name) if name == "fuzz"));
}

/// Tests helpers embed the configured base URL and timeout defaults.
#[test]
fn helpers_embed_target_defaults() {
    let helpers = BatsRenderer::new().render_helpers(&target()).expect("helpers");
    assert!(helpers.contains("API_BASE_URL:=http://localhost:8080"));
    assert!(helpers.contains("TIMEOUT:=30"));
    assert!(helpers.contains("api_request()"));
    assert!(helpers.contains("assert_status()"));
}

/// Tests test-data documents are written per schema.
#[test]
fn writes_test_data_documents() {
    let dir = tempdir().expect("temp dir");
    let (endpoints, schemas) = model();
    let options = GenerateOptions {
        output_dir: dir.path().to_path_buf(),
        templates: vec!["basic".to_string()],
        exclude_endpoints: Vec::new(),
        include_only: Vec::new(),
        custom_tests: Vec::new(),
        write_test_data: true,
    };
    TestGenerator::new(BatsRenderer::new())
        .generate(&endpoints, &schemas, &target(), &options)
        .expect("generate");

    let data = std::fs::read_to_string(dir.path().join("test-data").join("Pet.json"))
        .expect("test data");
    let value: serde_json::Value = serde_json::from_str(&data).expect("json");
    assert_eq!(value, json!({"id": "test-id-123", "name": "Test Name"}));
}

/// Tests excluded endpoints produce no suite content.
#[test]
fn excluded_endpoints_are_absent() {
    let dir = tempdir().expect("temp dir");
    let (endpoints, schemas) = model();
    let options = GenerateOptions {
        output_dir: dir.path().to_path_buf(),
        templates: vec!["basic".to_string()],
        exclude_endpoints: vec!["/pets".to_string()],
        include_only: Vec::new(),
        custom_tests: Vec::new(),
        write_test_data: false,
    };
    let generated = TestGenerator::new(BatsRenderer::new())
        .generate(&endpoints, &schemas, &target(), &options)
        .expect("generate");
    let names: Vec<String> = generated
        .artifacts
        .iter()
        .filter_map(|path| path.file_name())
        .map(|name| name.to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["basic_default.bats".to_string()]);
}

/// Tests custom tests are copied into the output directory.
#[test]
fn custom_tests_are_copied() {
    let dir = tempdir().expect("temp dir");
    let custom = dir.path().join("custom_smoke.bats");
    std::fs::write(&custom, "#!/usr/bin/env bats\n").expect("write custom");

    let output: PathBuf = dir.path().join("generated");
    let (endpoints, schemas) = model();
    let options = GenerateOptions {
        output_dir: output.clone(),
        templates: vec!["basic".to_string()],
        exclude_endpoints: Vec::new(),
        include_only: Vec::new(),
        custom_tests: vec![custom],
        write_test_data: false,
    };
    TestGenerator::new(BatsRenderer::new())
        .generate(&endpoints, &schemas, &target(), &options)
        .expect("generate");
    assert!(output.join("custom_smoke.bats").exists());
}
