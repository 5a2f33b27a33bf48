// crates/apiprobe-report/src/html.rs
// ============================================================================
// Module: HTML Report
// Description: Styled HTML projection of one run.
// Purpose: Emit a browsable summary plus per-result cards.
// Dependencies: apiprobe-core
// ============================================================================

//! ## Overview
//! The HTML report carries a styled summary block and one card per result,
//! color-coded by outcome. All interpolated text is HTML-escaped so
//! captured output cannot inject markup.

// ============================================================================
// SECTION: Imports
// ============================================================================

use apiprobe_core::ExecutionResults;

use crate::artifact_file_name;

// ============================================================================
// SECTION: Style
// ============================================================================

/// Inline stylesheet for the report document.
const STYLE: &str = "\
        body { font-family: Arial, sans-serif; margin: 20px; }\n\
        .summary { background-color: #f0f0f0; padding: 15px; border-radius: 5px; }\n\
        .pass { color: green; }\n\
        .fail { color: red; }\n\
        .test-result { margin: 10px 0; padding: 10px; border-left: 4px solid #ccc; }\n\
        .test-result.pass { border-left-color: green; }\n\
        .test-result.fail { border-left-color: red; }\n";

// ============================================================================
// SECTION: Renderer
// ============================================================================

/// Renders the HTML report document.
#[must_use]
pub fn render(results: &ExecutionResults, suite_name: &str) -> String {
    let title = escape_html(suite_name);
    let mut out = String::new();
    out.push_str("<!DOCTYPE html>\n<html>\n<head>\n");
    out.push_str(&format!("    <title>{title} Test Report</title>\n"));
    out.push_str("    <style>\n");
    out.push_str(STYLE);
    out.push_str("    </style>\n</head>\n<body>\n");
    out.push_str(&format!("    <h1>{title} Test Report</h1>\n"));
    out.push_str("    <div class=\"summary\">\n        <h2>Summary</h2>\n");
    out.push_str(&format!("        <p>Total Tests: {}</p>\n", results.total));
    out.push_str(&format!("        <p class=\"pass\">Passed: {}</p>\n", results.passed));
    out.push_str(&format!("        <p class=\"fail\">Failed: {}</p>\n", results.failed));
    out.push_str(&format!(
        "        <p>Duration: {:.2}s</p>\n    </div>\n",
        results.total_duration.as_secs_f64()
    ));
    out.push_str("    <h2>Test Results</h2>\n");

    for result in &results.results {
        let class = if result.success { "pass" } else { "fail" };
        out.push_str(&format!("    <div class=\"test-result {class}\">\n"));
        out.push_str(&format!(
            "        <h3>{}</h3>\n",
            escape_html(artifact_file_name(&result.artifact))
        ));
        out.push_str(&format!(
            "        <p>Duration: {:.2}s</p>\n",
            result.duration.as_secs_f64()
        ));
        out.push_str(&format!(
            "        <p>Status: {}</p>\n",
            if result.success { "PASS" } else { "FAIL" }
        ));
        if let Some(message) = &result.error_message
            && !result.success
        {
            out.push_str(&format!("        <p>Error: {}</p>\n", escape_html(message)));
        }
        out.push_str("    </div>\n");
    }

    out.push_str("</body>\n</html>\n");
    out
}

/// Escapes text for safe interpolation into HTML.
fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}
