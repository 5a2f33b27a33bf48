// crates/apiprobe-report/src/junit.rs
// ============================================================================
// Module: JUnit Report
// Description: JUnit-XML projection of one run.
// Purpose: Emit one testcase element per result for CI consumption.
// Dependencies: apiprobe-core
// ============================================================================

//! ## Overview
//! The JUnit report emits one `testsuite` element with one `testcase` per
//! result, named by the artifact's file stem, and a `failure` child when
//! the artifact did not pass. All attribute text is XML-escaped.

// ============================================================================
// SECTION: Imports
// ============================================================================

use apiprobe_core::ExecutionResults;

use crate::artifact_stem;

// ============================================================================
// SECTION: Renderer
// ============================================================================

/// Renders the JUnit-XML report document.
#[must_use]
pub fn render(results: &ExecutionResults, suite_name: &str) -> String {
    let mut out = String::new();
    out.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    out.push_str(&format!(
        "<testsuite name=\"{}\" tests=\"{}\" failures=\"{}\" time=\"{:.2}\">\n",
        escape_xml(suite_name),
        results.total,
        results.failed,
        results.total_duration.as_secs_f64(),
    ));

    for result in &results.results {
        out.push_str(&format!(
            "  <testcase name=\"{}\" time=\"{:.2}\">\n",
            escape_xml(artifact_stem(&result.artifact)),
            result.duration.as_secs_f64(),
        ));
        if !result.success {
            let message = result.error_message.as_deref().unwrap_or("Test failed");
            out.push_str(&format!("    <failure message=\"{}\"/>\n", escape_xml(message)));
        }
        out.push_str("  </testcase>\n");
    }

    out.push_str("</testsuite>\n");
    out
}

/// Escapes text for use in XML attribute values.
fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            other => out.push(other),
        }
    }
    out
}
