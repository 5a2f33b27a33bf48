// crates/apiprobe-gen/src/renderer.rs
// ============================================================================
// Module: Renderer Boundary
// Description: Context types and the artifact-renderer trait.
// Purpose: Define the seam between grouping logic and text generation.
// Dependencies: apiprobe-core, thiserror
// ============================================================================

//! ## Overview
//! Renderers consume an endpoint/schema context for one tag group and
//! return literal artifact text. The pipeline treats that text as opaque
//! beyond its filename and executability; renderers never touch the disk.
//! Invariants:
//! - A renderer must produce byte-identical output for identical contexts.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use apiprobe_core::Endpoint;
use apiprobe_core::Schema;
use thiserror::Error;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors raised while rendering artifact text.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The template identifier is not known to the renderer.
    #[error("unknown template: {0}")]
    UnknownTemplate(String),
    /// Rendering failed for a template-specific reason.
    #[error("template rendering failed: {0}")]
    Render(String),
}

// ============================================================================
// SECTION: Contexts
// ============================================================================

/// Target-API facts a renderer may embed into artifacts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetInfo {
    /// Base URL of the API under test.
    pub base_url: String,
    /// Per-request timeout, in seconds.
    pub timeout_secs: u64,
}

/// Context for rendering one (template, tag) suite.
#[derive(Debug)]
pub struct RenderContext<'a> {
    /// Tag the suite is grouped under.
    pub tag: &'a str,
    /// Endpoints belonging to the tag group.
    pub endpoints: Vec<&'a Endpoint>,
    /// Named schemas extracted from the contract.
    pub schemas: &'a BTreeMap<String, Schema>,
    /// Target-API facts.
    pub target: &'a TargetInfo,
}

/// Context for rendering the container orchestration file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposeContext {
    /// Name of the API under test, used for labels.
    pub api_name: String,
    /// Service names the test container depends on.
    pub services: Vec<String>,
    /// Optional image build context directory.
    pub build_context: Option<String>,
}

// ============================================================================
// SECTION: Renderer Trait
// ============================================================================

/// Turns endpoint/schema contexts into literal artifact text.
///
/// Implementations own only the text generation; grouping, filtering, and
/// file writing stay in [`crate::generator`].
pub trait ArtifactRenderer {
    /// Renders one test suite for a (template, tag) pair.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::UnknownTemplate`] for unrecognized template
    /// identifiers and [`RenderError::Render`] for template failures.
    fn render_suite(
        &self,
        template: &str,
        context: &RenderContext<'_>,
    ) -> Result<String, RenderError>;

    /// Renders the shared helpers file sourced by every suite.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Render`] when the helpers cannot be rendered.
    fn render_helpers(&self, target: &TargetInfo) -> Result<String, RenderError>;

    /// Renders the container orchestration file.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Render`] when the file cannot be rendered.
    fn render_compose(&self, compose: &ComposeContext) -> Result<String, RenderError>;
}
