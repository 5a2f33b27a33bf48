// crates/apiprobe-report/src/json.rs
// ============================================================================
// Module: JSON Report
// Description: JSON projection of one run's summary and results.
// Purpose: Emit a machine-readable summary object plus per-result array.
// Dependencies: apiprobe-core, serde, serde_json
// ============================================================================

//! ## Overview
//! The JSON report carries a `summary` object and a `results` array; field
//! names form the stable machine-readable contract consumed by CI
//! integrations. Durations serialize as fractional seconds.

// ============================================================================
// SECTION: Imports
// ============================================================================

use apiprobe_core::ExecutionResults;
use apiprobe_core::TestResult;
use serde::Serialize;

use crate::ReportError;

// ============================================================================
// SECTION: Wire Types
// ============================================================================

/// Top-level JSON report document.
#[derive(Debug, Serialize)]
struct JsonReport<'a> {
    /// Aggregated run summary.
    summary: JsonSummary,
    /// Per-artifact results, in run order.
    results: Vec<JsonResult<'a>>,
}

/// Aggregated summary object.
#[derive(Debug, Serialize)]
struct JsonSummary {
    /// Number of executed artifacts.
    total_tests: usize,
    /// Number of passing artifacts.
    passed_tests: usize,
    /// Number of failing artifacts.
    failed_tests: usize,
    /// Run duration in fractional seconds.
    total_duration: f64,
    /// Whether every artifact passed.
    success: bool,
}

/// One per-artifact result entry.
#[derive(Debug, Serialize)]
struct JsonResult<'a> {
    /// Executed artifact identifier.
    test_file: &'a str,
    /// Whether the artifact passed.
    success: bool,
    /// Artifact duration in fractional seconds.
    duration: f64,
    /// Runner exit code.
    exit_code: i32,
    /// Failure detail, when present.
    error_message: Option<&'a str>,
}

impl<'a> JsonResult<'a> {
    /// Projects one result onto the wire shape.
    fn from_result(result: &'a TestResult) -> Self {
        Self {
            test_file: &result.artifact,
            success: result.success,
            duration: result.duration.as_secs_f64(),
            exit_code: result.exit_code,
            error_message: result.error_message.as_deref(),
        }
    }
}

// ============================================================================
// SECTION: Renderer
// ============================================================================

/// Renders the JSON report document.
///
/// # Errors
///
/// Returns [`ReportError::Serialize`] when serialization fails.
pub fn render(results: &ExecutionResults) -> Result<Vec<u8>, ReportError> {
    let report = JsonReport {
        summary: JsonSummary {
            total_tests: results.total,
            passed_tests: results.passed,
            failed_tests: results.failed,
            total_duration: results.total_duration.as_secs_f64(),
            success: results.success,
        },
        results: results.results.iter().map(JsonResult::from_result).collect(),
    };
    serde_json::to_vec_pretty(&report).map_err(|err| ReportError::Serialize(err.to_string()))
}
