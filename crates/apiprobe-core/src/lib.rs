// crates/apiprobe-core/src/lib.rs
// ============================================================================
// Module: apiprobe Core
// Description: Canonical contract model, case derivation, and result types.
// Purpose: Provide the pure pipeline logic shared by every apiprobe crate.
// Dependencies: serde, serde_json, jsonschema, regex, thiserror
// ============================================================================

//! ## Overview
//! This crate holds the pure, I/O-free half of the apiprobe pipeline: the
//! canonical [`Endpoint`]/[`Schema`] model built from an OpenAPI document,
//! derivation of concrete [`TestCase`] values, deterministic test-data
//! synthesis, response validation, and aggregation of [`TestResult`] values
//! into an [`ExecutionResults`] summary.
//! Invariants:
//! - Nothing in this crate touches the network, the filesystem, or process
//!   state; every function is deterministic for a fixed input.
//! - Response maps are ordered ascending by status key, which defines the
//!   "first 2xx" selection used for success-case derivation.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod cases;
pub mod model;
pub mod results;
pub mod synthesis;
pub mod validation;


// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use cases::CaseKind;
pub use cases::TestCase;
pub use cases::derive_cases;
pub use model::Endpoint;
pub use model::Method;
pub use model::Parameter;
pub use model::ParameterLocation;
pub use model::Schema;
pub use results::ExecutionResults;
pub use results::TestResult;
pub use synthesis::synthesize;
pub use validation::ContractValidator;
pub use validation::FieldKind;
pub use validation::ResponseValidator;
pub use validation::SchemaValidator;
pub use validation::ValidationResult;
pub use validation::ValidationRule;
