// crates/apiprobe-config/src/loader.rs
// ============================================================================
// Module: Configuration Loader
// Description: YAML loading, environment overlays, and substitution.
// Purpose: Produce a typed configuration from the on-disk YAML surface.
// Dependencies: serde_yaml, std::env, std::fs
// ============================================================================

//! ## Overview
//! Loading happens in raw YAML value space: the base file is parsed, an
//! optional `environments/<name>.yaml` sibling overlay is deep-merged over
//! it, and `${VAR}` environment references on string leaves are
//! substituted; only then is the value deserialized into the typed model.
//! Invariants:
//! - Mappings merge key-wise and recursively; every other value kind is
//!   replaced by the overlay.
//! - A `${VAR}` reference to an unset variable stays verbatim.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;
use std::path::Path;
use std::path::PathBuf;

use serde_yaml::Value;

use crate::ConfigError;
use crate::model::TestConfig;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration file path, relative to the project root.
pub const DEFAULT_CONFIG_PATH: &str = "config/test-config.yaml";

/// Directory holding per-environment overlay files.
const ENVIRONMENTS_DIR: &str = "environments";

// ============================================================================
// SECTION: Loading
// ============================================================================

/// Loads the typed configuration, applying overlay and substitution.
///
/// # Errors
///
/// Returns [`ConfigError::NotFound`] for a missing base file and
/// [`ConfigError::Parse`] for read or parse failures.
pub fn load_config(
    path: Option<&Path>,
    environment: Option<&str>,
) -> Result<TestConfig, ConfigError> {
    let base_path = path.map_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH), Path::to_path_buf);
    if !base_path.exists() {
        return Err(ConfigError::NotFound(base_path.display().to_string()));
    }

    let mut value = parse_yaml_file(&base_path)?;
    if let Some(environment) = environment
        && let Some(overlay_path) = overlay_path(&base_path, environment)
    {
        let overlay = parse_yaml_file(&overlay_path)?;
        value = merge_values(value, overlay);
    }
    let value = substitute_env(value);

    serde_yaml::from_value(value).map_err(|err| ConfigError::Parse(err.to_string()))
}

/// Returns the overlay path for an environment, when the file exists.
fn overlay_path(base_path: &Path, environment: &str) -> Option<PathBuf> {
    let parent = base_path.parent()?;
    let candidate = parent.join(ENVIRONMENTS_DIR).join(format!("{environment}.yaml"));
    candidate.exists().then_some(candidate)
}

/// Reads and parses one YAML file into a raw value.
fn parse_yaml_file(path: &Path) -> Result<Value, ConfigError> {
    let text = fs::read_to_string(path)
        .map_err(|err| ConfigError::Parse(format!("{}: {err}", path.display())))?;
    serde_yaml::from_str(&text)
        .map_err(|err| ConfigError::Parse(format!("{}: {err}", path.display())))
}

// ============================================================================
// SECTION: Merge and Substitution
// ============================================================================

/// Deep-merges an overlay value over a base value.
pub(crate) fn merge_values(base: Value, overlay: Value) -> Value {
    match (base, overlay) {
        (Value::Mapping(mut base_map), Value::Mapping(overlay_map)) => {
            for (key, overlay_entry) in overlay_map {
                let merged = match base_map.remove(&key) {
                    Some(base_entry) => merge_values(base_entry, overlay_entry),
                    None => overlay_entry,
                };
                base_map.insert(key, merged);
            }
            Value::Mapping(base_map)
        }
        (_, overlay) => overlay,
    }
}

/// Substitutes `${VAR}` environment references on string leaves.
pub(crate) fn substitute_env(value: Value) -> Value {
    match value {
        Value::String(text) => Value::String(substitute_string(text)),
        Value::Mapping(map) => Value::Mapping(
            map.into_iter().map(|(key, entry)| (key, substitute_env(entry))).collect(),
        ),
        Value::Sequence(items) => {
            Value::Sequence(items.into_iter().map(substitute_env).collect())
        }
        other => other,
    }
}

/// Substitutes one string leaf when it is a full `${VAR}` reference.
fn substitute_string(text: String) -> String {
    let Some(name) = text.strip_prefix("${").and_then(|rest| rest.strip_suffix('}')) else {
        return text;
    };
    std::env::var(name).unwrap_or(text)
}
