// crates/apiprobe-gen/src/lib.rs
// ============================================================================
// Module: apiprobe Gen
// Description: Test-artifact generation from the canonical contract model.
// Purpose: Group, filter, render, and write executable test artifacts.
// Dependencies: apiprobe-core, serde_json, thiserror
// ============================================================================

//! ## Overview
//! The generation crate owns everything between the canonical model and the
//! artifact files on disk: endpoint filtering with include-wins precedence,
//! grouping by tag, the [`ArtifactRenderer`] trait boundary, and the
//! built-in [`BatsRenderer`] that emits curl-based bats suites. One artifact
//! is written per (template, tag) pair, named
//! `<template>_<snake_case(tag)>.bats` and marked executable.
//! Invariants:
//! - Rendering is deterministic for a fixed model and options.
//! - The pipeline owns grouping and filtering; renderers only turn a
//!   context into literal artifact text.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod bats;
pub mod generator;
pub mod renderer;

#[cfg(test)]
mod tests;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use bats::BatsRenderer;
pub use generator::GenerateError;
pub use generator::GenerateOptions;
pub use generator::GeneratedArtifacts;
pub use generator::TestGenerator;
pub use generator::filter_endpoints;
pub use generator::group_by_tag;
pub use renderer::ArtifactRenderer;
pub use renderer::ComposeContext;
pub use renderer::RenderContext;
pub use renderer::RenderError;
pub use renderer::TargetInfo;
