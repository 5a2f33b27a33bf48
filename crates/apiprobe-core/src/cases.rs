// crates/apiprobe-core/src/cases.rs
// ============================================================================
// Module: Test Case Derivation
// Description: Derivation of concrete test cases from endpoint records.
// Purpose: Produce one success case and per-error-status cases per endpoint.
// Dependencies: crate::model, serde, serde_json
// ============================================================================

//! ## Overview
//! Case derivation scans an endpoint's response map in ascending status-key
//! order. The first numeric 2xx key yields the single success case; every
//! numeric 4xx/5xx key yields one error case. Endpoints without any 2xx
//! response silently derive no success case.
//! Invariants:
//! - Derivation is deterministic for a fixed endpoint.
//! - Non-numeric status keys (`default`, `2XX`) never produce cases.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;

use crate::model::Endpoint;
use crate::model::Method;

// ============================================================================
// SECTION: Test Case
// ============================================================================

/// Classification of a derived test case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaseKind {
    /// Case asserting a declared 2xx outcome.
    Success,
    /// Case asserting a declared 4xx/5xx outcome.
    Error,
}

/// One concrete test case derived from an endpoint.
///
/// # Invariants
/// - At most one `Success` case exists per endpoint.
/// - `expected_status` matches the response-map key the case was derived
///   from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestCase {
    /// Human-readable case name.
    pub name: String,
    /// HTTP method under test.
    pub method: Method,
    /// Path template under test.
    pub path: String,
    /// Expected response status code.
    pub expected_status: u16,
    /// Expected JSON response schema, when declared.
    pub response_schema: Option<Value>,
    /// Case classification.
    pub kind: CaseKind,
}

// ============================================================================
// SECTION: Derivation
// ============================================================================

/// Derives the test cases for one endpoint.
///
/// The success case binds to the first 2xx status in ascending key order;
/// every 4xx/5xx status contributes one error case.
#[must_use]
pub fn derive_cases(endpoint: &Endpoint) -> Vec<TestCase> {
    let mut cases = Vec::new();

    for (status_key, definition) in &endpoint.responses {
        if !status_key.starts_with('2') {
            continue;
        }
        let Ok(status) = status_key.parse::<u16>() else {
            continue;
        };
        let outcome = response_description(definition).unwrap_or("success");
        cases.push(TestCase {
            name: format!("{} {} returns {outcome}", endpoint.method, endpoint.path),
            method: endpoint.method,
            path: endpoint.path.clone(),
            expected_status: status,
            response_schema: response_schema(definition),
            kind: CaseKind::Success,
        });
        break;
    }

    for (status_key, definition) in &endpoint.responses {
        if !status_key.starts_with('4') && !status_key.starts_with('5') {
            continue;
        }
        let Ok(status) = status_key.parse::<u16>() else {
            continue;
        };
        cases.push(TestCase {
            name: format!("{} {} returns {status_key}", endpoint.method, endpoint.path),
            method: endpoint.method,
            path: endpoint.path.clone(),
            expected_status: status,
            response_schema: response_schema(definition),
            kind: CaseKind::Error,
        });
    }

    cases
}

/// Extracts the JSON response schema from one response definition.
#[must_use]
pub fn response_schema(definition: &Value) -> Option<Value> {
    definition
        .get("content")
        .and_then(|content| content.get("application/json"))
        .and_then(|media| media.get("schema"))
        .cloned()
}

/// Returns the declared description of one response definition.
fn response_description(definition: &Value) -> Option<&str> {
    definition.get("description").and_then(Value::as_str)
}
