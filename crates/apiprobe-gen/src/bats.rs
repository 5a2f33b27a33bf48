// crates/apiprobe-gen/src/bats.rs
// ============================================================================
// Module: Bats Renderer
// Description: Built-in renderer emitting curl-based bats suites.
// Purpose: Produce executable shell-test artifacts for tag groups.
// Dependencies: apiprobe-core, serde_json
// ============================================================================

//! ## Overview
//! The built-in renderer turns derived test cases into bats suites that
//! drive the target API with curl. Suites source a shared `helpers.bash`
//! and read their runtime contract (base URL, auth, timeout) from the
//! environment published by the execution engine.
//!
//! Three templates are recognized: `basic` renders every derived case,
//! `crud` renders the success cases of data-mutating and read endpoints,
//! and `error_handling` renders only the error cases.
//! Invariants:
//! - Output is deterministic: endpoints arrive pre-sorted from the model
//!   builder and response maps iterate ascending.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use apiprobe_core::CaseKind;
use apiprobe_core::Endpoint;
use apiprobe_core::Method;
use apiprobe_core::Schema;
use apiprobe_core::TestCase;
use apiprobe_core::derive_cases;
use apiprobe_core::synthesis::synthesize;
use apiprobe_core::synthesis::synthesize_string;
use serde_json::Value;

use crate::renderer::ArtifactRenderer;
use crate::renderer::ComposeContext;
use crate::renderer::RenderContext;
use crate::renderer::RenderError;
use crate::renderer::TargetInfo;

// ============================================================================
// SECTION: Templates
// ============================================================================

/// Template rendering every derived case.
pub const TEMPLATE_BASIC: &str = "basic";
/// Template rendering success cases of CRUD-shaped endpoints.
pub const TEMPLATE_CRUD: &str = "crud";
/// Template rendering only error cases.
pub const TEMPLATE_ERROR_HANDLING: &str = "error_handling";

/// Methods considered CRUD-shaped for the `crud` template.
const CRUD_METHODS: [Method; 5] =
    [Method::Get, Method::Post, Method::Put, Method::Patch, Method::Delete];

// ============================================================================
// SECTION: Renderer
// ============================================================================

/// Built-in curl/bats artifact renderer.
#[derive(Debug, Default, Clone, Copy)]
pub struct BatsRenderer;

impl BatsRenderer {
    /// Creates a new bats renderer.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Selects the cases a template renders for one endpoint.
    fn cases_for(template: &str, endpoint: &Endpoint) -> Result<Vec<TestCase>, RenderError> {
        let cases = derive_cases(endpoint);
        match template {
            TEMPLATE_BASIC => Ok(cases),
            TEMPLATE_CRUD => {
                if CRUD_METHODS.contains(&endpoint.method) {
                    Ok(cases.into_iter().filter(|case| case.kind == CaseKind::Success).collect())
                } else {
                    Ok(Vec::new())
                }
            }
            TEMPLATE_ERROR_HANDLING => {
                Ok(cases.into_iter().filter(|case| case.kind == CaseKind::Error).collect())
            }
            other => Err(RenderError::UnknownTemplate(other.to_string())),
        }
    }
}

impl ArtifactRenderer for BatsRenderer {
    fn render_suite(
        &self,
        template: &str,
        context: &RenderContext<'_>,
    ) -> Result<String, RenderError> {
        let mut out = String::new();
        out.push_str("#!/usr/bin/env bats\n");
        out.push_str(&format!(
            "# {template} suite for tag '{}', generated by apiprobe. Do not edit.\n\n",
            context.tag
        ));
        out.push_str("load helpers\n");

        for endpoint in &context.endpoints {
            for case in Self::cases_for(template, endpoint)? {
                out.push('\n');
                out.push_str(&render_case(endpoint, &case));
            }
        }
        Ok(out)
    }

    fn render_helpers(&self, target: &TargetInfo) -> Result<String, RenderError> {
        let mut out = String::new();
        out.push_str("#!/usr/bin/env bash\n");
        out.push_str("# Shared helpers for apiprobe-generated bats suites.\n\n");
        out.push_str(&format!(
            ": \"${{API_BASE_URL:={}}}\"\n: \"${{TIMEOUT:={}}}\"\n\n",
            target.base_url, target.timeout_secs
        ));
        out.push_str("api_request() {\n");
        out.push_str("  local method=\"$1\"\n");
        out.push_str("  local path=\"$2\"\n");
        out.push_str("  local payload=\"${3:-}\"\n");
        out.push_str(
            "  local args=(-s -o \"$BATS_TMPDIR/apiprobe_body\" -w \"%{http_code}\" \
             -X \"$method\" --max-time \"$TIMEOUT\")\n",
        );
        out.push_str(
            "  if [ -n \"${AUTH_TOKEN:-}\" ]; then args+=(-H \"Authorization: Bearer \
             ${AUTH_TOKEN}\"); fi\n",
        );
        out.push_str(
            "  if [ -n \"${AUTH_USERNAME:-}\" ]; then args+=(-u \
             \"${AUTH_USERNAME}:${AUTH_PASSWORD:-}\"); fi\n",
        );
        out.push_str(
            "  if [ -n \"${API_KEY:-}\" ]; then args+=(-H \"${API_KEY_HEADER:-X-API-Key}: \
             ${API_KEY}\"); fi\n",
        );
        out.push_str(
            "  if [ -n \"$payload\" ]; then args+=(-H \"Content-Type: application/json\" \
             -d \"$payload\"); fi\n",
        );
        out.push_str("  status_code=\"$(curl \"${args[@]}\" \"${API_BASE_URL}${path}\")\"\n");
        out.push_str("}\n\n");
        out.push_str("assert_status() {\n");
        out.push_str("  [ \"$status_code\" -eq \"$1\" ]\n");
        out.push_str("}\n");
        Ok(out)
    }

    fn render_compose(&self, compose: &ComposeContext) -> Result<String, RenderError> {
        let mut out = String::new();
        out.push_str("# Container orchestration for apiprobe test runs.\n");
        out.push_str("services:\n");
        out.push_str("  api-testing:\n");
        out.push_str(&format!(
            "    build:\n      context: {}\n",
            compose.build_context.as_deref().unwrap_or(".")
        ));
        out.push_str(&format!(
            "    labels:\n      com.apiprobe.suite: \"{}\"\n",
            compose.api_name
        ));
        out.push_str("    environment:\n");
        out.push_str("      - API_BASE_URL\n");
        out.push_str("      - TIMEOUT\n");
        if !compose.services.is_empty() {
            out.push_str("    depends_on:\n");
            for service in &compose.services {
                out.push_str(&format!("      - {service}\n"));
            }
        }
        Ok(out)
    }
}

// ============================================================================
// SECTION: Case Rendering
// ============================================================================

/// Renders one bats test block for a derived case.
fn render_case(endpoint: &Endpoint, case: &TestCase) -> String {
    let mut out = String::new();
    out.push_str(&format!("@test \"{}\" {{\n", escape_test_name(&case.name)));
    let path = example_path(&case.path);
    match request_payload(endpoint) {
        Some(payload) => {
            out.push_str(&format!("  api_request {} \"{path}\" '{payload}'\n", case.method));
        }
        None => {
            out.push_str(&format!("  api_request {} \"{path}\"\n", case.method));
        }
    }
    out.push_str(&format!("  assert_status {}\n", case.expected_status));
    out.push_str("}\n");
    out
}

/// Synthesizes the JSON payload for an endpoint's request body, if any.
fn request_payload(endpoint: &Endpoint) -> Option<String> {
    let schema = endpoint
        .request_body
        .as_ref()?
        .get("content")?
        .get("application/json")?
        .get("schema")?;
    serde_json::to_string(&synthesize(schema)).ok()
}

/// Substitutes path template parameters with synthesized example values.
fn example_path(path: &str) -> String {
    let mut out = String::with_capacity(path.len());
    let mut rest = path;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let Some(close) = rest[open..].find('}') else {
            out.push_str(&rest[open..]);
            return out;
        };
        let name = &rest[open + 1..open + close];
        out.push_str(&synthesize_string(name));
        rest = &rest[open + close + 1..];
    }
    out.push_str(rest);
    out
}

/// Escapes double quotes in a bats test name.
fn escape_test_name(name: &str) -> String {
    name.replace('"', "\\\"")
}

/// Synthesized example documents for every named schema, used for
/// test-data files.
#[must_use]
pub fn schema_examples(schemas: &BTreeMap<String, Schema>) -> Vec<(String, Value)> {
    schemas
        .iter()
        .map(|(name, schema)| (name.clone(), synthesize(&schema.schema)))
        .collect()
}
