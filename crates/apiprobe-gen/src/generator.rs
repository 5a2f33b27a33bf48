// crates/apiprobe-gen/src/generator.rs
// ============================================================================
// Module: Test Generator
// Description: Filtering, grouping, and artifact writing.
// Purpose: Drive a renderer across tag groups and write executable files.
// Dependencies: apiprobe-core, serde_json, thiserror
// ============================================================================

//! ## Overview
//! The generator owns the pipeline side of artifact production. Endpoints
//! are filtered (a non-empty inclusion list replaces exclusion entirely),
//! grouped by tag, and handed to the renderer once per (template, tag)
//! pair. Output files are named `<template>_<snake_case(tag)>.bats` and
//! marked executable, alongside a shared `helpers.bash` and per-schema
//! test-data documents.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::Path;
use std::path::PathBuf;

use apiprobe_core::Endpoint;
use apiprobe_core::Schema;
use thiserror::Error;

use crate::bats::schema_examples;
use crate::renderer::ArtifactRenderer;
use crate::renderer::ComposeContext;
use crate::renderer::RenderContext;
use crate::renderer::RenderError;
use crate::renderer::TargetInfo;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors raised while generating artifacts.
#[derive(Debug, Error)]
pub enum GenerateError {
    /// Rendering failed.
    #[error(transparent)]
    Render(#[from] RenderError),
    /// A filesystem operation failed.
    #[error("write failed for {path}: {message}")]
    Io {
        /// Path the operation targeted.
        path: String,
        /// Underlying failure detail.
        message: String,
    },
}

impl GenerateError {
    /// Builds an I/O error for a path.
    fn io(path: &Path, err: &io::Error) -> Self {
        Self::Io {
            path: path.display().to_string(),
            message: err.to_string(),
        }
    }
}

// ============================================================================
// SECTION: Options
// ============================================================================

/// Options controlling one generation pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateOptions {
    /// Directory artifacts are written into.
    pub output_dir: PathBuf,
    /// Template identifiers to render, one suite per (template, tag).
    pub templates: Vec<String>,
    /// Paths removed from the endpoint set when no inclusion list is set.
    pub exclude_endpoints: Vec<String>,
    /// When non-empty, only these paths are kept and exclusion is ignored.
    pub include_only: Vec<String>,
    /// Extra pre-written test files copied into the output directory.
    pub custom_tests: Vec<PathBuf>,
    /// Whether per-schema test-data documents are written.
    pub write_test_data: bool,
}

/// Paths produced by one generation pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedArtifacts {
    /// Rendered suite files, in write order.
    pub artifacts: Vec<PathBuf>,
    /// Shared helpers file sourced by every suite.
    pub helpers: PathBuf,
}

// ============================================================================
// SECTION: Filtering and Grouping
// ============================================================================

/// Applies endpoint filtering with include-wins precedence.
///
/// A non-empty `include_only` keeps exactly the listed paths and ignores
/// `exclude` entirely; otherwise listed exclusions are removed.
#[must_use]
pub fn filter_endpoints(
    endpoints: Vec<Endpoint>,
    exclude: &[String],
    include_only: &[String],
) -> Vec<Endpoint> {
    if !include_only.is_empty() {
        return endpoints
            .into_iter()
            .filter(|endpoint| include_only.contains(&endpoint.path))
            .collect();
    }
    if !exclude.is_empty() {
        return endpoints
            .into_iter()
            .filter(|endpoint| !exclude.contains(&endpoint.path))
            .collect();
    }
    endpoints
}

/// Groups endpoints by tag.
///
/// Multi-tag endpoints appear in every matching group; untagged endpoints
/// fall into the synthetic `default` group.
#[must_use]
pub fn group_by_tag(endpoints: &[Endpoint]) -> BTreeMap<String, Vec<&Endpoint>> {
    let mut groups: BTreeMap<String, Vec<&Endpoint>> = BTreeMap::new();
    for endpoint in endpoints {
        for tag in endpoint.group_tags() {
            groups.entry(tag).or_default().push(endpoint);
        }
    }
    groups
}

/// Converts a tag into a snake_case filename fragment.
#[must_use]
pub fn snake_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let chars: Vec<char> = text.chars().collect();
    for (index, ch) in chars.iter().enumerate() {
        if !ch.is_alphanumeric() {
            if !out.ends_with('_') {
                out.push('_');
            }
            continue;
        }
        if ch.is_uppercase() {
            let after_lower =
                index > 0 && chars[index - 1].is_alphanumeric() && !chars[index - 1].is_uppercase();
            let before_lower =
                chars.get(index + 1).is_some_and(|next| next.is_lowercase()) && index > 0;
            if (after_lower || before_lower) && !out.is_empty() && !out.ends_with('_') {
                out.push('_');
            }
        }
        out.extend(ch.to_lowercase());
    }
    out
}

// ============================================================================
// SECTION: Generator
// ============================================================================

/// Drives a renderer across tag groups and writes the artifact files.
#[derive(Debug)]
pub struct TestGenerator<R> {
    /// Renderer implementation producing artifact text.
    renderer: R,
}

impl<R: ArtifactRenderer> TestGenerator<R> {
    /// Creates a generator over a renderer.
    pub const fn new(renderer: R) -> Self {
        Self {
            renderer,
        }
    }

    /// Generates all artifacts for one contract model.
    ///
    /// # Errors
    ///
    /// Returns [`GenerateError`] when rendering or writing fails.
    pub fn generate(
        &self,
        endpoints: &[Endpoint],
        schemas: &BTreeMap<String, Schema>,
        target: &TargetInfo,
        options: &GenerateOptions,
    ) -> Result<GeneratedArtifacts, GenerateError> {
        let filtered = filter_endpoints(
            endpoints.to_vec(),
            &options.exclude_endpoints,
            &options.include_only,
        );

        fs::create_dir_all(&options.output_dir)
            .map_err(|err| GenerateError::io(&options.output_dir, &err))?;

        let helpers = options.output_dir.join("helpers.bash");
        write_executable(&helpers, &self.renderer.render_helpers(target)?)?;

        let groups = group_by_tag(&filtered);
        let mut artifacts = Vec::new();
        for template in &options.templates {
            for (tag, group) in &groups {
                let context = RenderContext {
                    tag,
                    endpoints: group.clone(),
                    schemas,
                    target,
                };
                let content = self.renderer.render_suite(template, &context)?;
                let path =
                    options.output_dir.join(format!("{template}_{}.bats", snake_case(tag)));
                write_executable(&path, &content)?;
                artifacts.push(path);
            }
        }

        if options.write_test_data {
            write_test_data(&options.output_dir, schemas)?;
        }
        copy_custom_tests(&options.output_dir, &options.custom_tests)?;

        Ok(GeneratedArtifacts {
            artifacts,
            helpers,
        })
    }

    /// Renders and writes the container orchestration file.
    ///
    /// # Errors
    ///
    /// Returns [`GenerateError`] when rendering or writing fails.
    pub fn generate_compose(
        &self,
        path: &Path,
        compose: &ComposeContext,
    ) -> Result<(), GenerateError> {
        let content = self.renderer.render_compose(compose)?;
        fs::write(path, content).map_err(|err| GenerateError::io(path, &err))
    }
}

// ============================================================================
// SECTION: File Writing
// ============================================================================

/// Writes per-schema synthesized test-data documents.
fn write_test_data(
    output_dir: &Path,
    schemas: &BTreeMap<String, Schema>,
) -> Result<(), GenerateError> {
    if schemas.is_empty() {
        return Ok(());
    }
    let data_dir = output_dir.join("test-data");
    fs::create_dir_all(&data_dir).map_err(|err| GenerateError::io(&data_dir, &err))?;
    for (name, example) in schema_examples(schemas) {
        let path = data_dir.join(format!("{name}.json"));
        let body = serde_json::to_vec_pretty(&example)
            .map_err(|err| RenderError::Render(err.to_string()))?;
        fs::write(&path, body).map_err(|err| GenerateError::io(&path, &err))?;
    }
    Ok(())
}

/// Copies pre-written custom tests into the output directory.
fn copy_custom_tests(output_dir: &Path, custom_tests: &[PathBuf]) -> Result<(), GenerateError> {
    for source in custom_tests {
        if !source.exists() {
            continue;
        }
        let Some(file_name) = source.file_name() else {
            continue;
        };
        let destination = output_dir.join(file_name);
        fs::copy(source, &destination).map_err(|err| GenerateError::io(&destination, &err))?;
        make_executable(&destination).map_err(|err| GenerateError::io(&destination, &err))?;
    }
    Ok(())
}

/// Writes a file and marks it executable.
fn write_executable(path: &Path, content: &str) -> Result<(), GenerateError> {
    fs::write(path, content).map_err(|err| GenerateError::io(path, &err))?;
    make_executable(path).map_err(|err| GenerateError::io(path, &err))
}

/// Marks a file executable on unix targets.
#[cfg(unix)]
fn make_executable(path: &Path) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    let mut permissions = fs::metadata(path)?.permissions();
    permissions.set_mode(0o755);
    fs::set_permissions(path, permissions)
}

/// Marks a file executable on non-unix targets (no-op).
#[cfg(not(unix))]
fn make_executable(_path: &Path) -> io::Result<()> {
    Ok(())
}
