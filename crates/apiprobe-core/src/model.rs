// crates/apiprobe-core/src/model.rs
// ============================================================================
// Module: Contract Model
// Description: Canonical endpoint and schema records built from a contract.
// Purpose: Represent one OpenAPI operation and one named schema immutably.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! The contract model is produced once per pipeline run by the spec builder
//! and never mutated afterwards. [`Endpoint`] identity is the `(path, method)`
//! pair; [`Schema`] identity is its name in the document's
//! `components.schemas` table.
//! Invariants:
//! - [`Endpoint::responses`] is a `BTreeMap`, so status keys iterate in
//!   ascending order regardless of source-document key order.
//! - [`Schema`] values are copied out of the document and referenced by
//!   value afterwards.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::fmt;

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;

// ============================================================================
// SECTION: HTTP Method
// ============================================================================

/// HTTP methods recognized on a path item.
///
/// Keys outside this set are treated as path-item extension fields and
/// ignored by the spec builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    /// HTTP GET.
    Get,
    /// HTTP POST.
    Post,
    /// HTTP PUT.
    Put,
    /// HTTP PATCH.
    Patch,
    /// HTTP DELETE.
    Delete,
    /// HTTP HEAD.
    Head,
    /// HTTP OPTIONS.
    Options,
}

impl Method {
    /// All recognized methods, in path-item key order.
    pub const ALL: [Self; 7] = [
        Self::Get,
        Self::Post,
        Self::Put,
        Self::Patch,
        Self::Delete,
        Self::Head,
        Self::Options,
    ];

    /// Parses a path-item key into a method.
    ///
    /// Returns `None` for anything outside the recognized verb set, which
    /// callers must treat as an extension key rather than an error.
    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        match key.to_ascii_lowercase().as_str() {
            "get" => Some(Self::Get),
            "post" => Some(Self::Post),
            "put" => Some(Self::Put),
            "patch" => Some(Self::Patch),
            "delete" => Some(Self::Delete),
            "head" => Some(Self::Head),
            "options" => Some(Self::Options),
            _ => None,
        }
    }

    /// Returns the canonical uppercase method name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
            Self::Head => "HEAD",
            Self::Options => "OPTIONS",
        }
    }

    /// Returns the lowercase path-item key for this method.
    #[must_use]
    pub const fn as_key(self) -> &'static str {
        match self {
            Self::Get => "get",
            Self::Post => "post",
            Self::Put => "put",
            Self::Patch => "patch",
            Self::Delete => "delete",
            Self::Head => "head",
            Self::Options => "options",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// SECTION: Parameters
// ============================================================================

/// Location of an operation parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterLocation {
    /// Query-string parameter.
    Query,
    /// Path template parameter.
    Path,
    /// Request header parameter.
    Header,
    /// Cookie parameter.
    Cookie,
}

/// One declared operation parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    /// Parameter name.
    pub name: String,
    /// Where the parameter is carried.
    #[serde(rename = "in")]
    pub location: ParameterLocation,
    /// Whether the parameter must be supplied.
    #[serde(default)]
    pub required: bool,
    /// Raw parameter schema, when declared.
    #[serde(default)]
    pub schema: Option<Value>,
}

// ============================================================================
// SECTION: Endpoint
// ============================================================================

/// Synthetic tag assigned to endpoints that declare no tags.
pub const DEFAULT_TAG: &str = "default";

/// One `(path, method)` operation extracted from the contract.
///
/// # Invariants
/// - One instance exists per path+method pair in the source document.
/// - `responses` iterates ascending by status key; for the three-digit
///   numeric keys OpenAPI uses this equals ascending numeric order.
/// - Instances are immutable once built and live for one pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Endpoint {
    /// Path template, e.g. `/users/{id}`.
    pub path: String,
    /// HTTP method.
    pub method: Method,
    /// Optional operation identifier.
    pub operation_id: Option<String>,
    /// Optional one-line summary.
    pub summary: Option<String>,
    /// Optional long description.
    pub description: Option<String>,
    /// Declared parameters, in document order.
    pub parameters: Vec<Parameter>,
    /// Raw request-body definition, when declared.
    pub request_body: Option<Value>,
    /// Response definitions keyed by status-code string.
    pub responses: BTreeMap<String, Value>,
    /// Grouping tags declared on the operation.
    pub tags: Vec<String>,
    /// Raw security requirements declared on the operation.
    pub security: Vec<Value>,
}

impl Endpoint {
    /// Returns the tags used for artifact grouping.
    ///
    /// Untagged endpoints fall into the synthetic [`DEFAULT_TAG`] group.
    #[must_use]
    pub fn group_tags(&self) -> Vec<String> {
        if self.tags.is_empty() {
            vec![DEFAULT_TAG.to_string()]
        } else {
            self.tags.clone()
        }
    }

    /// Returns the path parameters declared on this endpoint.
    #[must_use]
    pub fn path_parameters(&self) -> Vec<&Parameter> {
        self.parameters
            .iter()
            .filter(|parameter| parameter.location == ParameterLocation::Path)
            .collect()
    }
}

// ============================================================================
// SECTION: Schema
// ============================================================================

/// One named schema from the document's `components.schemas` table.
///
/// # Invariants
/// - `required` and `properties` are copies of the raw tree's fields and
///   stay consistent with `schema`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    /// Name of the schema in the components table.
    pub name: String,
    /// Raw schema tree.
    pub schema: Value,
    /// Declared required property names.
    pub required: Vec<String>,
    /// Property name to sub-schema mapping.
    pub properties: BTreeMap<String, Value>,
}

impl Schema {
    /// Builds a schema record from a raw components-table entry.
    #[must_use]
    pub fn from_definition(name: &str, definition: &Value) -> Self {
        let required = definition
            .get("required")
            .and_then(Value::as_array)
            .map(|entries| {
                entries.iter().filter_map(Value::as_str).map(str::to_string).collect()
            })
            .unwrap_or_default();
        let properties = definition
            .get("properties")
            .and_then(Value::as_object)
            .map(|entries| {
                entries.iter().map(|(key, value)| (key.clone(), value.clone())).collect()
            })
            .unwrap_or_default();
        Self {
            name: name.to_string(),
            schema: definition.clone(),
            required,
            properties,
        }
    }
}
