// crates/apiprobe-core/src/synthesis.rs
// ============================================================================
// Module: Test Data Synthesis
// Description: Deterministic generation of representative schema instances.
// Purpose: Produce stable request payloads and schema example documents.
// Dependencies: serde_json
// ============================================================================

//! ## Overview
//! Synthesis walks a schema's declared properties and emits one literal per
//! property, driven by the declared type and a small set of name heuristics
//! for strings. The function is pure: the same schema always yields a
//! byte-identical instance, which keeps rendered artifacts reproducible and
//! testable against golden values.
//!
//! `required`, `enum`, bounds, `pattern`, and `format` are not honored
//! beyond the name heuristics; this is a known fidelity gap of the
//! deriver, not an oversight in callers.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde_json::Map;
use serde_json::Value;
use serde_json::json;

// ============================================================================
// SECTION: Synthesis
// ============================================================================

/// Synthesizes a representative instance for an object schema.
///
/// Properties are visited in ascending name order; schemas without a
/// `properties` table synthesize to an empty object.
#[must_use]
pub fn synthesize(schema: &Value) -> Value {
    let mut instance = Map::new();
    let Some(properties) = schema.get("properties").and_then(Value::as_object) else {
        return Value::Object(instance);
    };
    for (name, property) in properties {
        instance.insert(name.clone(), synthesize_property(name, property));
    }
    Value::Object(instance)
}

/// Synthesizes one property value from its name and sub-schema.
fn synthesize_property(name: &str, property: &Value) -> Value {
    let declared = property.get("type").and_then(Value::as_str).unwrap_or("string");
    match declared {
        "integer" => json!(42),
        "number" => json!(42.0),
        "boolean" => json!(true),
        "array" => json!(["item1", "item2"]),
        "object" => synthesize(property),
        _ => Value::String(synthesize_string(name)),
    }
}

/// Synthesizes a string literal for a property name.
///
/// Email-, name-, and identifier-like names get semantically hinted
/// defaults; everything else gets a `test_` prefixed placeholder.
#[must_use]
pub fn synthesize_string(name: &str) -> String {
    match name.to_lowercase().as_str() {
        "email" | "e-mail" => "test@example.com".to_string(),
        "name" | "title" => format!("Test {}", title_case(name)),
        "id" | "uuid" => "test-id-123".to_string(),
        _ => format!("test_{name}"),
    }
}

/// Title-cases a field name, uppercasing the letter after each word break.
fn title_case(name: &str) -> String {
    let mut output = String::with_capacity(name.len());
    let mut at_word_start = true;
    for ch in name.chars() {
        if ch.is_alphabetic() {
            if at_word_start {
                output.extend(ch.to_uppercase());
            } else {
                output.extend(ch.to_lowercase());
            }
            at_word_start = false;
        } else {
            output.push(ch);
            at_word_start = true;
        }
    }
    output
}
