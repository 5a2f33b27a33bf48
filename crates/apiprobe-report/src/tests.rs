// crates/apiprobe-report/src/tests.rs
// ============================================================================
// Module: Report Unit Tests
// Description: Unit coverage for the individual report renderers.
// Purpose: Pin report content, escaping, and writer independence.
// Dependencies: apiprobe-report, apiprobe-core, serde_json, tempfile
// ============================================================================

//! ## Overview
//! Renders each format from a fixed result set and checks the emitted
//! content, including escaping of hostile failure text and the multi-format
//! dispatch behavior.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::time::Duration;

use apiprobe_core::ExecutionResults;
use apiprobe_core::TestResult;
use tempfile::tempdir;

use crate::ReportFormat;
use crate::ReportOptions;
use crate::console;
use crate::html;
use crate::json;
use crate::junit;
use crate::write_reports;

// ============================================================================
// SECTION: Fixtures
// ============================================================================

/// Builds the result-set fixture used across renderer tests.
fn fixture() -> ExecutionResults {
    let results = vec![
        TestResult {
            artifact: "generated/tests/basic_pets.bats".to_string(),
            success: true,
            output: "ok".to_string(),
            duration: Duration::from_millis(1500),
            exit_code: 0,
            error_message: None,
        },
        TestResult {
            artifact: "generated/tests/basic_users.bats".to_string(),
            success: false,
            output: String::new(),
            duration: Duration::from_millis(500),
            exit_code: 1,
            error_message: Some("expected 200 & got <500>".to_string()),
        },
    ];
    ExecutionResults::aggregate(results, Duration::from_secs(2))
}

// ============================================================================
// SECTION: Console Tests
// ============================================================================

/// Tests the console report carries the summary and failure detail.
#[test]
fn console_report_content() {
    let mut buffer = Vec::new();
    console::write(&fixture(), &mut buffer).expect("console write");
    let text = String::from_utf8(buffer).expect("utf8");
    assert!(text.contains("Total Tests: 2"));
    assert!(text.contains("Passed: 1"));
    assert!(text.contains("Failed: 1"));
    assert!(text.contains("FAIL basic_users.bats"));
    assert!(text.contains("Error: expected 200 & got <500>"));
    assert!(text.contains("Overall Result: FAIL"));
}

/// Tests a clean run reports PASS without a failure section.
#[test]
fn console_report_passing_run() {
    let summary = ExecutionResults::aggregate(
        vec![TestResult {
            artifact: "a.bats".to_string(),
            success: true,
            output: String::new(),
            duration: Duration::from_millis(10),
            exit_code: 0,
            error_message: None,
        }],
        Duration::from_millis(10),
    );
    let mut buffer = Vec::new();
    console::write(&summary, &mut buffer).expect("console write");
    let text = String::from_utf8(buffer).expect("utf8");
    assert!(text.contains("Overall Result: PASS"));
    assert!(!text.contains("Failed Tests:"));
}

// ============================================================================
// SECTION: JSON Tests
// ============================================================================

/// Tests the JSON report shape and field names.
#[test]
fn json_report_shape() {
    let bytes = json::render(&fixture()).expect("render json");
    let value: serde_json::Value = serde_json::from_slice(&bytes).expect("parse json");
    assert_eq!(value["summary"]["total_tests"], serde_json::json!(2));
    assert_eq!(value["summary"]["passed_tests"], serde_json::json!(1));
    assert_eq!(value["summary"]["failed_tests"], serde_json::json!(1));
    assert_eq!(value["summary"]["success"], serde_json::json!(false));
    assert_eq!(value["results"][0]["test_file"], "generated/tests/basic_pets.bats");
    assert_eq!(value["results"][1]["exit_code"], serde_json::json!(1));
    assert_eq!(value["results"][1]["error_message"], "expected 200 & got <500>");
}

// ============================================================================
// SECTION: JUnit Tests
// ============================================================================

/// Tests the JUnit report carries one testcase per result.
#[test]
fn junit_report_cases() {
    let xml = junit::render(&fixture(), "Petstore");
    assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
    assert!(xml.contains("<testsuite name=\"Petstore\" tests=\"2\" failures=\"1\""));
    assert!(xml.contains("<testcase name=\"basic_pets\""));
    assert!(xml.contains("<testcase name=\"basic_users\""));
    assert_eq!(xml.matches("<testcase").count(), 2);
    assert_eq!(xml.matches("<failure").count(), 1);
}

/// Tests failure messages are XML-escaped.
#[test]
fn junit_report_escapes_messages() {
    let xml = junit::render(&fixture(), "Petstore");
    assert!(xml.contains("expected 200 &amp; got &lt;500&gt;"));
    assert!(!xml.contains("got <500>"));
}

// ============================================================================
// SECTION: HTML Tests
// ============================================================================

/// Tests the HTML report carries the summary and escaped detail.
#[test]
fn html_report_content() {
    let html = html::render(&fixture(), "Petstore");
    assert!(html.contains("<title>Petstore Test Report</title>"));
    assert!(html.contains("<p>Total Tests: 2</p>"));
    assert!(html.contains("test-result pass"));
    assert!(html.contains("test-result fail"));
    assert!(html.contains("expected 200 &amp; got &lt;500&gt;"));
}

// ============================================================================
// SECTION: Dispatch Tests
// ============================================================================

/// Tests multi-format dispatch writes every requested file.
#[test]
fn write_reports_emits_requested_formats() {
    let dir = tempdir().expect("temp dir");
    let options = ReportOptions {
        suite_name: "Petstore",
        output_dir: dir.path(),
    };
    let mut console_buffer = Vec::new();
    let written = write_reports(
        &fixture(),
        &[ReportFormat::Console, ReportFormat::Json, ReportFormat::Junit, ReportFormat::Html],
        &options,
        &mut console_buffer,
    )
    .expect("write reports");

    assert_eq!(written.len(), 3);
    assert!(dir.path().join("test-report.json").exists());
    assert!(dir.path().join("test-report.xml").exists());
    assert!(dir.path().join("test-report.html").exists());
    assert!(!console_buffer.is_empty());
}

/// Tests console-only runs create no report directory content.
#[test]
fn console_only_writes_no_files() {
    let dir = tempdir().expect("temp dir");
    let reports = dir.path().join("reports");
    let options = ReportOptions {
        suite_name: "Petstore",
        output_dir: &reports,
    };
    let mut console_buffer = Vec::new();
    let written =
        write_reports(&fixture(), &[ReportFormat::Console], &options, &mut console_buffer)
            .expect("write reports");
    assert!(written.is_empty());
    assert!(!reports.exists());
}
