// crates/apiprobe-core/src/results.rs
// ============================================================================
// Module: Execution Results
// Description: Per-artifact test results and the aggregated run summary.
// Purpose: Record terminal execution outcomes and fold them into a summary.
// Dependencies: std::time
// ============================================================================

//! ## Overview
//! A [`TestResult`] is created exactly once per executed artifact, one per
//! terminal state of the engine's per-artifact state machine, and never
//! mutated afterwards. [`ExecutionResults`] folds an ordered result list
//! into pass/fail counts; the run succeeds only when nothing failed.
//! Invariants:
//! - `success == (exit_code == 0)` for results produced from a completed
//!   process.
//! - Timed-out and errored artifacts always carry exit code 1 and a
//!   descriptive message.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::time::Duration;

// ============================================================================
// SECTION: Test Result
// ============================================================================

/// Terminal outcome of one executed test artifact.
#[derive(Debug, Clone, PartialEq)]
pub struct TestResult {
    /// Identifier of the executed artifact, usually its path.
    pub artifact: String,
    /// Whether the artifact passed.
    pub success: bool,
    /// Captured artifact output.
    pub output: String,
    /// Wall-clock duration of the run.
    pub duration: Duration,
    /// Numeric exit code reported by the runner.
    pub exit_code: i32,
    /// Failure detail, when the artifact did not pass.
    pub error_message: Option<String>,
}

impl TestResult {
    /// Builds the result for an artifact whose process ran to completion.
    ///
    /// Success is solely determined by a zero exit code.
    #[must_use]
    pub fn completed(
        artifact: &str,
        exit_code: i32,
        output: String,
        stderr: String,
        duration: Duration,
    ) -> Self {
        let success = exit_code == 0;
        Self {
            artifact: artifact.to_string(),
            success,
            output,
            duration,
            exit_code,
            error_message: if success { None } else { Some(stderr) },
        }
    }

    /// Builds the result for an artifact that exceeded its timeout.
    #[must_use]
    pub fn timed_out(artifact: &str, timeout: Duration, duration: Duration) -> Self {
        Self {
            artifact: artifact.to_string(),
            success: false,
            output: String::new(),
            duration,
            exit_code: 1,
            error_message: Some(format!("test timed out after {} seconds", timeout.as_secs())),
        }
    }

    /// Builds the result for an artifact whose run failed before completion.
    #[must_use]
    pub fn errored(artifact: &str, message: &str, duration: Duration) -> Self {
        Self {
            artifact: artifact.to_string(),
            success: false,
            output: String::new(),
            duration,
            exit_code: 1,
            error_message: Some(message.to_string()),
        }
    }
}

// ============================================================================
// SECTION: Aggregation
// ============================================================================

/// Aggregated outcome of one execution run.
///
/// # Invariants
/// - `total == results.len()` and `passed + failed == total`.
/// - `success` holds exactly when `failed == 0`.
/// - Computed once per run; read-only afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutionResults {
    /// Number of executed artifacts.
    pub total: usize,
    /// Number of passing artifacts.
    pub passed: usize,
    /// Number of failing artifacts.
    pub failed: usize,
    /// Wall-clock duration of the whole run.
    pub total_duration: Duration,
    /// Ordered per-artifact results.
    pub results: Vec<TestResult>,
    /// Whether every artifact passed.
    pub success: bool,
}

impl ExecutionResults {
    /// Folds per-artifact results into the run summary.
    #[must_use]
    pub fn aggregate(results: Vec<TestResult>, total_duration: Duration) -> Self {
        let total = results.len();
        let passed = results.iter().filter(|result| result.success).count();
        let failed = total - passed;
        Self {
            total,
            passed,
            failed,
            total_duration,
            results,
            success: failed == 0,
        }
    }

    /// Returns the failing results, in run order.
    #[must_use]
    pub fn failures(&self) -> Vec<&TestResult> {
        self.results.iter().filter(|result| !result.success).collect()
    }
}
