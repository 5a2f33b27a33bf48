// crates/apiprobe-spec/src/lib.rs
// ============================================================================
// Module: apiprobe Spec
// Description: Contract loading and canonical model building.
// Purpose: Turn heterogeneous OpenAPI sources into endpoint/schema records.
// Dependencies: apiprobe-core, reqwest, serde_json, serde_yaml, tempfile, url
// ============================================================================

//! ## Overview
//! This crate owns the front of the pipeline: [`SpecClient`] fetches raw
//! contract bytes from a URL, a local file, or a transient git checkout and
//! decodes them into a JSON document; the builder walks that document into
//! [`apiprobe_core::Endpoint`] and [`apiprobe_core::Schema`] records,
//! resolves same-document `$ref` pointers, and validates the document's
//! basic shape.
//! Invariants:
//! - Loading failures abort the pipeline before any test executes.
//! - Embedded git credentials never appear in error messages.
//! - External (cross-document) references pass through unresolved.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod builder;
pub mod source;


// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use builder::BuildError;
pub use builder::MAX_REF_DEPTH;
pub use builder::extract_schemas;
pub use builder::parse_endpoints;
pub use builder::resolve_refs;
pub use builder::validate_document;
pub use source::DocumentFormat;
pub use source::GitSource;
pub use source::MAX_SPEC_BYTES;
pub use source::SpecClient;
pub use source::SpecError;
pub use source::SpecSource;
