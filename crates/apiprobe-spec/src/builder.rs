// crates/apiprobe-spec/src/builder.rs
// ============================================================================
// Module: Spec Model Builder
// Description: Canonical model extraction from a decoded OpenAPI document.
// Purpose: Produce endpoint/schema records, resolve refs, validate shape.
// Dependencies: apiprobe-core, serde_json, thiserror
// ============================================================================

//! ## Overview
//! The builder walks a decoded document into the canonical model. Endpoint
//! extraction visits every path entry and recognized HTTP-verb key in
//! deterministic (lexicographic) order, silently ignoring extension keys.
//! Schema extraction reads only the `components.schemas` table. Reference
//! resolution handles same-document `#/a/b/c` pointers and passes external
//! references through untouched.
//! Invariants:
//! - Unknown path-item keys are legal and never an error.
//! - Reference resolution is bounded by [`MAX_REF_DEPTH`] hops, so cyclic
//!   pointers fail closed instead of recursing forever.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use apiprobe_core::Endpoint;
use apiprobe_core::Method;
use apiprobe_core::Parameter;
use apiprobe_core::Schema;
use serde_json::Map;
use serde_json::Value;
use thiserror::Error;

// ============================================================================
// SECTION: Limits
// ============================================================================

/// Maximum number of reference hops followed during resolution.
pub const MAX_REF_DEPTH: usize = 32;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors raised while building the canonical model.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error)]
pub enum BuildError {
    /// A same-document pointer names a segment that does not exist.
    #[error("unresolved reference: {0}")]
    UnresolvedReference(String),
    /// Reference resolution exceeded [`MAX_REF_DEPTH`] hops.
    #[error("reference depth exceeded resolving {0}")]
    ReferenceDepthExceeded(String),
    /// The document violates the required OpenAPI shape.
    #[error("invalid specification: {field}: {reason}")]
    InvalidSpec {
        /// First offending field.
        field: String,
        /// Violation detail.
        reason: String,
    },
}

// ============================================================================
// SECTION: Validation
// ============================================================================

/// Validates the basic shape of a decoded document.
///
/// Requires top-level `openapi` (version prefix `3.`), `info` with a
/// `title`, and `paths`.
///
/// # Errors
///
/// Returns [`BuildError::InvalidSpec`] carrying the first offending field.
pub fn validate_document(document: &Value) -> Result<(), BuildError> {
    for field in ["openapi", "info", "paths"] {
        if document.get(field).is_none() {
            return Err(BuildError::InvalidSpec {
                field: field.to_string(),
                reason: "missing required field".to_string(),
            });
        }
    }

    let version = document.get("openapi").and_then(Value::as_str).unwrap_or("");
    if !version.starts_with("3.") {
        return Err(BuildError::InvalidSpec {
            field: "openapi".to_string(),
            reason: format!("unsupported version: {version}"),
        });
    }

    if document.get("info").and_then(|info| info.get("title")).is_none() {
        return Err(BuildError::InvalidSpec {
            field: "info.title".to_string(),
            reason: "missing required field".to_string(),
        });
    }
    Ok(())
}

// ============================================================================
// SECTION: Endpoint Extraction
// ============================================================================

/// Extracts every recognized `(path, method)` operation from the document.
///
/// Paths and verb keys are visited in lexicographic order, which keeps
/// extraction deterministic regardless of source-document key order.
#[must_use]
pub fn parse_endpoints(document: &Value) -> Vec<Endpoint> {
    let mut endpoints = Vec::new();
    let Some(paths) = document.get("paths").and_then(Value::as_object) else {
        return endpoints;
    };
    for (path, item) in paths {
        let Some(item) = item.as_object() else {
            continue;
        };
        for (key, operation) in item {
            let Some(method) = Method::from_key(key) else {
                continue;
            };
            let Some(operation) = operation.as_object() else {
                continue;
            };
            endpoints.push(build_endpoint(path, method, operation));
        }
    }
    endpoints
}

/// Builds one endpoint record from a raw operation object.
fn build_endpoint(path: &str, method: Method, operation: &Map<String, Value>) -> Endpoint {
    let parameters = operation
        .get("parameters")
        .and_then(Value::as_array)
        .map(|entries| {
            entries
                .iter()
                .filter_map(|entry| serde_json::from_value::<Parameter>(entry.clone()).ok())
                .collect()
        })
        .unwrap_or_default();
    let responses = operation
        .get("responses")
        .and_then(Value::as_object)
        .map(|entries| {
            entries
                .iter()
                .map(|(status, definition)| (status.clone(), definition.clone()))
                .collect::<BTreeMap<_, _>>()
        })
        .unwrap_or_default();
    let tags = operation
        .get("tags")
        .and_then(Value::as_array)
        .map(|entries| {
            entries.iter().filter_map(Value::as_str).map(str::to_string).collect()
        })
        .unwrap_or_default();
    let security = operation
        .get("security")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();

    Endpoint {
        path: path.to_string(),
        method,
        operation_id: text_field(operation, "operationId"),
        summary: text_field(operation, "summary"),
        description: text_field(operation, "description"),
        parameters,
        request_body: operation.get("requestBody").cloned(),
        responses,
        tags,
        security,
    }
}

/// Reads an optional string field off an operation object.
fn text_field(operation: &Map<String, Value>, field: &str) -> Option<String> {
    operation.get(field).and_then(Value::as_str).map(str::to_string)
}

// ============================================================================
// SECTION: Schema Extraction
// ============================================================================

/// Extracts the named schemas from the `components.schemas` table.
///
/// Schemas referenced elsewhere but absent from the table are not surfaced
/// as named entities.
#[must_use]
pub fn extract_schemas(document: &Value) -> BTreeMap<String, Schema> {
    let mut schemas = BTreeMap::new();
    let Some(definitions) = document
        .get("components")
        .and_then(|components| components.get("schemas"))
        .and_then(Value::as_object)
    else {
        return schemas;
    };
    for (name, definition) in definitions {
        schemas.insert(name.clone(), Schema::from_definition(name, definition));
    }
    schemas
}

// ============================================================================
// SECTION: Reference Resolution
// ============================================================================

/// Resolves same-document `$ref` pointers throughout the document.
///
/// External references are passed through unresolved; this is a deliberate
/// simplification, not a full resolver.
///
/// # Errors
///
/// Returns [`BuildError::UnresolvedReference`] when a pointer segment is
/// absent and [`BuildError::ReferenceDepthExceeded`] on cyclic pointers.
pub fn resolve_refs(document: &Value) -> Result<Value, BuildError> {
    resolve_value(document, document, 0)
}

/// Resolves one value, following internal references up to the depth cap.
fn resolve_value(value: &Value, root: &Value, ref_depth: usize) -> Result<Value, BuildError> {
    match value {
        Value::Object(map) => {
            if let Some(Value::String(pointer)) = map.get("$ref") {
                if let Some(rest) = pointer.strip_prefix('#') {
                    if ref_depth >= MAX_REF_DEPTH {
                        return Err(BuildError::ReferenceDepthExceeded(pointer.clone()));
                    }
                    let target = lookup_pointer(root, rest, pointer)?;
                    return resolve_value(target, root, ref_depth + 1);
                }
                return Ok(value.clone());
            }
            let mut resolved = Map::new();
            for (key, entry) in map {
                resolved.insert(key.clone(), resolve_value(entry, root, ref_depth)?);
            }
            Ok(Value::Object(resolved))
        }
        Value::Array(items) => {
            let mut resolved = Vec::with_capacity(items.len());
            for item in items {
                resolved.push(resolve_value(item, root, ref_depth)?);
            }
            Ok(Value::Array(resolved))
        }
        other => Ok(other.clone()),
    }
}

/// Walks a `#`-relative pointer segment by segment against the root.
fn lookup_pointer<'a>(
    root: &'a Value,
    rest: &str,
    original: &str,
) -> Result<&'a Value, BuildError> {
    let mut current = root;
    for segment in rest.split('/').skip(1) {
        current = match current {
            Value::Object(map) => map
                .get(segment)
                .ok_or_else(|| BuildError::UnresolvedReference(original.to_string()))?,
            Value::Array(items) => segment
                .parse::<usize>()
                .ok()
                .and_then(|index| items.get(index))
                .ok_or_else(|| BuildError::UnresolvedReference(original.to_string()))?,
            _ => return Err(BuildError::UnresolvedReference(original.to_string())),
        };
    }
    Ok(current)
}
