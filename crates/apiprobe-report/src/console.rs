// crates/apiprobe-report/src/console.rs
// ============================================================================
// Module: Console Report
// Description: Human-readable run summary for terminal output.
// Purpose: Stream a summary block and failing-test detail to a writer.
// Dependencies: apiprobe-core, std::io
// ============================================================================

//! ## Overview
//! The console report prints a bordered summary block, enumerates the
//! failing artifacts with their captured error text, and closes with the
//! overall verdict. Output goes to a caller-supplied writer so the format
//! stays testable and free of direct stdout access.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io;
use std::io::Write;

use apiprobe_core::ExecutionResults;

use crate::artifact_file_name;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Border line width for the summary block.
const BORDER: &str = "==================================================";

// ============================================================================
// SECTION: Writer
// ============================================================================

/// Streams the console report into a writer.
///
/// # Errors
///
/// Returns the underlying I/O error when the writer fails.
pub fn write(results: &ExecutionResults, out: &mut dyn Write) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "{BORDER}")?;
    writeln!(out, "apiprobe Test Report")?;
    writeln!(out, "{BORDER}")?;
    writeln!(out, "Total Tests: {}", results.total)?;
    writeln!(out, "Passed: {}", results.passed)?;
    writeln!(out, "Failed: {}", results.failed)?;
    writeln!(out, "Duration: {:.2}s", results.total_duration.as_secs_f64())?;
    writeln!(out, "{BORDER}")?;

    if results.failed > 0 {
        writeln!(out)?;
        writeln!(out, "Failed Tests:")?;
        for result in results.failures() {
            writeln!(out, "  FAIL {}", artifact_file_name(&result.artifact))?;
            if let Some(message) = &result.error_message {
                writeln!(out, "    Error: {}", message.trim_end())?;
            }
        }
    }

    writeln!(out)?;
    writeln!(out, "Overall Result: {}", if results.success { "PASS" } else { "FAIL" })
}
