// crates/apiprobe-report/src/lib.rs
// ============================================================================
// Module: apiprobe Report
// Description: Projection of execution results into report formats.
// Purpose: Emit console, JSON, JUnit-XML, and HTML views of one run.
// Dependencies: apiprobe-core, serde, serde_json, thiserror
// ============================================================================

//! ## Overview
//! Reporting is a pure projection of an [`ExecutionResults`] value. Each
//! writer is independent and order-insensitive; any subset of formats may
//! be requested in one run. File formats land in the report directory as
//! `test-report.json`, `test-report.xml`, and `test-report.html`; the
//! console format streams to a caller-supplied writer.
//! Invariants:
//! - Writers never mutate the results value.
//! - XML and HTML output is escaped; captured failure text cannot break
//!   the document structure.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod console;
pub mod html;
pub mod json;
pub mod junit;

#[cfg(test)]
mod tests;

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;
use std::io;
use std::path::Path;
use std::path::PathBuf;

use apiprobe_core::ExecutionResults;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// JSON report filename.
pub const JSON_REPORT_FILE: &str = "test-report.json";
/// JUnit-XML report filename.
pub const JUNIT_REPORT_FILE: &str = "test-report.xml";
/// HTML report filename.
pub const HTML_REPORT_FILE: &str = "test-report.html";

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors raised while writing reports.
#[derive(Debug, Error)]
pub enum ReportError {
    /// A report target could not be written.
    #[error("report write failed for {target}: {message}")]
    Write {
        /// Report file path or stream name.
        target: String,
        /// Underlying failure detail.
        message: String,
    },
    /// Result serialization failed.
    #[error("report serialization failed: {0}")]
    Serialize(String),
}

impl ReportError {
    /// Builds a write error for a path-like target.
    fn write(target: &Path, err: &io::Error) -> Self {
        Self::Write {
            target: target.display().to_string(),
            message: err.to_string(),
        }
    }
}

// ============================================================================
// SECTION: Formats
// ============================================================================

/// Report formats supported in one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    /// Human-readable console summary.
    Console,
    /// JSON summary plus per-result array.
    Json,
    /// JUnit testsuite XML.
    Junit,
    /// Styled HTML document.
    Html,
}

/// Options shared across report writers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportOptions<'a> {
    /// Suite name embedded into reports.
    pub suite_name: &'a str,
    /// Directory file-format reports land in.
    pub output_dir: &'a Path,
}

// ============================================================================
// SECTION: Dispatch
// ============================================================================

/// Writes every requested report format.
///
/// File formats are written into the report directory; the console format
/// streams into `console_out`. Returns the file paths written.
///
/// # Errors
///
/// Returns [`ReportError`] when a writer fails.
pub fn write_reports(
    results: &ExecutionResults,
    formats: &[ReportFormat],
    options: &ReportOptions<'_>,
    console_out: &mut dyn io::Write,
) -> Result<Vec<PathBuf>, ReportError> {
    let needs_dir = formats.iter().any(|format| *format != ReportFormat::Console);
    if needs_dir {
        fs::create_dir_all(options.output_dir)
            .map_err(|err| ReportError::write(options.output_dir, &err))?;
    }

    let mut written = Vec::new();
    for format in formats {
        match format {
            ReportFormat::Console => {
                console::write(results, console_out).map_err(|err| ReportError::Write {
                    target: "console".to_string(),
                    message: err.to_string(),
                })?;
            }
            ReportFormat::Json => {
                let path = options.output_dir.join(JSON_REPORT_FILE);
                fs::write(&path, json::render(results)?)
                    .map_err(|err| ReportError::write(&path, &err))?;
                written.push(path);
            }
            ReportFormat::Junit => {
                let path = options.output_dir.join(JUNIT_REPORT_FILE);
                fs::write(&path, junit::render(results, options.suite_name))
                    .map_err(|err| ReportError::write(&path, &err))?;
                written.push(path);
            }
            ReportFormat::Html => {
                let path = options.output_dir.join(HTML_REPORT_FILE);
                fs::write(&path, html::render(results, options.suite_name))
                    .map_err(|err| ReportError::write(&path, &err))?;
                written.push(path);
            }
        }
    }
    Ok(written)
}

// ============================================================================
// SECTION: Shared Helpers
// ============================================================================

/// Returns the base filename of an artifact identifier.
pub(crate) fn artifact_file_name(artifact: &str) -> &str {
    Path::new(artifact).file_name().and_then(|name| name.to_str()).unwrap_or(artifact)
}

/// Returns the artifact identifier without directory or extension.
pub(crate) fn artifact_stem(artifact: &str) -> &str {
    Path::new(artifact).file_stem().and_then(|stem| stem.to_str()).unwrap_or(artifact)
}
