// crates/apiprobe-config/src/lib.rs
// ============================================================================
// Module: apiprobe Config
// Description: Typed configuration model, loading, and validation.
// Purpose: Load the YAML test configuration with overlays and substitution.
// Dependencies: serde, serde_json, serde_yaml, thiserror
// ============================================================================

//! ## Overview
//! Configuration is a typed [`TestConfig`] deserialized from a YAML file.
//! Loading deep-merges an optional per-environment overlay file and
//! substitutes `${VAR}` environment references on string leaves before
//! typed deserialization; semantic validation then enforces the
//! cross-field invariants the type system cannot.
//! Invariants:
//! - Overlay merge is recursive on mappings and replace-wise elsewhere.
//! - Unset `${VAR}` references stay verbatim rather than failing.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod loader;
pub mod model;
pub mod scaffold;


// ============================================================================
// SECTION: Imports
// ============================================================================

use thiserror::Error;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors raised while loading or validating configuration.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file does not exist.
    #[error("configuration file not found: {0}")]
    NotFound(String),
    /// The configuration could not be read or parsed.
    #[error("configuration parse failed: {0}")]
    Parse(String),
    /// The configuration violates a semantic invariant.
    #[error("configuration invalid: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use loader::DEFAULT_CONFIG_PATH;
pub use loader::load_config;
pub use model::ApiInfo;
pub use model::AuthConfig;
pub use model::AuthKind;
pub use model::DockerSection;
pub use model::ExecutionSection;
pub use model::GitSpec;
pub use model::OpenApiSection;
pub use model::ReportFormatName;
pub use model::ReportingSection;
pub use model::TargetApi;
pub use model::TestConfig;
pub use model::TestGeneration;
pub use model::ValidationSection;
pub use model::validate;
pub use scaffold::starter_config;
pub use scaffold::write_default_config;
