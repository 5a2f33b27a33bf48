// crates/apiprobe-core/src/validation.rs
// ============================================================================
// Module: Response Validation
// Description: Schema, rule, and contract-compliance validation of responses.
// Purpose: Check observed API responses against declared contract shapes.
// Dependencies: jsonschema, regex, serde, serde_json
// ============================================================================

//! ## Overview
//! Validation is split across three layers: [`SchemaValidator`] delegates
//! JSON-Schema semantics to the `jsonschema` crate, [`ValidationRule`] is a
//! closed enum of custom rule kinds dispatched by exhaustive matching, and
//! [`ContractValidator`] checks an observed response against the response
//! definition the contract declares for its endpoint and status.
//! Invariants:
//! - Rule kinds carry typed payloads; there is no string-keyed dispatch.
//! - A [`ValidationResult`] is valid exactly when it carries no errors;
//!   warnings never affect validity.

// ============================================================================
// SECTION: Imports
// ============================================================================

use regex::Regex;
use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;

use crate::model::Method;

// ============================================================================
// SECTION: Validation Result
// ============================================================================

/// Outcome of one validation pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    /// Whether the validated value passed.
    pub valid: bool,
    /// Collected validation errors.
    pub errors: Vec<String>,
    /// Collected non-fatal warnings.
    pub warnings: Vec<String>,
}

impl ValidationResult {
    /// Builds a passing result with no findings.
    #[must_use]
    pub const fn ok() -> Self {
        Self {
            valid: true,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Builds a result from collected errors and warnings.
    #[must_use]
    pub fn from_findings(errors: Vec<String>, warnings: Vec<String>) -> Self {
        Self {
            valid: errors.is_empty(),
            errors,
            warnings,
        }
    }

    /// Folds another result's findings into this one.
    pub fn absorb(&mut self, other: Self) {
        self.errors.extend(other.errors);
        self.warnings.extend(other.warnings);
        self.valid = self.errors.is_empty();
    }
}

// ============================================================================
// SECTION: Field Kinds
// ============================================================================

/// JSON value kinds usable in field-type rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    /// JSON string.
    String,
    /// JSON integer.
    Integer,
    /// Any JSON number.
    Number,
    /// JSON boolean.
    Boolean,
    /// JSON array.
    Array,
    /// JSON object.
    Object,
    /// JSON null.
    Null,
}

impl FieldKind {
    /// Returns the kind's lowercase name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Array => "array",
            Self::Object => "object",
            Self::Null => "null",
        }
    }

    /// Checks whether a JSON value is of this kind.
    #[must_use]
    pub fn matches(self, value: &Value) -> bool {
        match self {
            Self::String => value.is_string(),
            Self::Integer => value.is_i64() || value.is_u64(),
            Self::Number => value.is_number(),
            Self::Boolean => value.is_boolean(),
            Self::Array => value.is_array(),
            Self::Object => value.is_object(),
            Self::Null => value.is_null(),
        }
    }

    /// Describes the kind of an observed JSON value.
    #[must_use]
    pub fn of(value: &Value) -> &'static str {
        match value {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
        }
    }
}

// ============================================================================
// SECTION: Validation Rules
// ============================================================================

/// Custom validation rule kinds.
///
/// # Invariants
/// - The set of kinds is closed; dispatch is exhaustive pattern matching.
/// - Rules applied to a non-object value pass vacuously, except
///   `RequiredField`, which fails on missing fields of object values only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ValidationRule {
    /// Requires a field to be present on the response object.
    RequiredField {
        /// Field that must be present.
        field: String,
    },
    /// Requires a field, when present, to be of a declared kind.
    FieldType {
        /// Field to inspect.
        field: String,
        /// Kind the field must have.
        expected: FieldKind,
    },
    /// Requires a numeric field, when present, to lie within bounds.
    ValueRange {
        /// Field to inspect.
        field: String,
        /// Inclusive lower bound.
        min: Option<f64>,
        /// Inclusive upper bound.
        max: Option<f64>,
    },
    /// Requires a string field, when present, to match a pattern.
    StringPattern {
        /// Field to inspect.
        field: String,
        /// Anchored-at-start regular expression.
        pattern: String,
    },
}

impl ValidationRule {
    /// Applies the rule to a response value.
    #[must_use]
    pub fn apply(&self, data: &Value) -> ValidationResult {
        match self {
            Self::RequiredField {
                field,
            } => apply_required_field(field, data),
            Self::FieldType {
                field,
                expected,
            } => apply_field_type(field, *expected, data),
            Self::ValueRange {
                field,
                min,
                max,
            } => apply_value_range(field, *min, *max, data),
            Self::StringPattern {
                field,
                pattern,
            } => apply_string_pattern(field, pattern, data),
        }
    }
}

/// Checks that a required field is present.
fn apply_required_field(field: &str, data: &Value) -> ValidationResult {
    if let Some(object) = data.as_object()
        && !object.contains_key(field)
    {
        return ValidationResult::from_findings(
            vec![format!("required field '{field}' is missing")],
            Vec::new(),
        );
    }
    ValidationResult::ok()
}

/// Checks a field's JSON kind.
fn apply_field_type(field: &str, expected: FieldKind, data: &Value) -> ValidationResult {
    if let Some(value) = data.get(field)
        && !expected.matches(value)
    {
        return ValidationResult::from_findings(
            vec![format!(
                "field '{field}' should be {}, got {}",
                expected.as_str(),
                FieldKind::of(value)
            )],
            Vec::new(),
        );
    }
    ValidationResult::ok()
}

/// Checks a numeric field against inclusive bounds.
fn apply_value_range(
    field: &str,
    min: Option<f64>,
    max: Option<f64>,
    data: &Value,
) -> ValidationResult {
    let Some(value) = data.get(field).and_then(Value::as_f64) else {
        return ValidationResult::ok();
    };
    let mut errors = Vec::new();
    if let Some(lower) = min
        && value < lower
    {
        errors.push(format!("field '{field}' value {value} is below minimum {lower}"));
    }
    if let Some(upper) = max
        && value > upper
    {
        errors.push(format!("field '{field}' value {value} is above maximum {upper}"));
    }
    ValidationResult::from_findings(errors, Vec::new())
}

/// Checks a string field against a regular expression.
fn apply_string_pattern(field: &str, pattern: &str, data: &Value) -> ValidationResult {
    let Some(value) = data.get(field).and_then(Value::as_str) else {
        return ValidationResult::ok();
    };
    let compiled = match Regex::new(pattern) {
        Ok(compiled) => compiled,
        Err(err) => {
            return ValidationResult::from_findings(
                vec![format!("invalid pattern for field '{field}': {err}")],
                Vec::new(),
            );
        }
    };
    if compiled.find(value).is_none_or(|found| found.start() != 0) {
        return ValidationResult::from_findings(
            vec![format!("field '{field}' does not match pattern {pattern}")],
            Vec::new(),
        );
    }
    ValidationResult::ok()
}

// ============================================================================
// SECTION: Schema Validator
// ============================================================================

/// JSON-Schema validation delegated to the `jsonschema` crate.
#[derive(Debug, Default, Clone, Copy)]
pub struct SchemaValidator;

impl SchemaValidator {
    /// Creates a new schema validator.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Validates a value against a JSON schema.
    ///
    /// Schema compilation failures are reported as validation errors rather
    /// than panics; the caller sees one finding per schema violation.
    #[must_use]
    pub fn validate(&self, data: &Value, schema: &Value) -> ValidationResult {
        let validator = match jsonschema::validator_for(schema) {
            Ok(validator) => validator,
            Err(err) => {
                return ValidationResult::from_findings(
                    vec![format!("schema error: {err}")],
                    Vec::new(),
                );
            }
        };
        let errors: Vec<String> =
            validator.iter_errors(data).map(|err| err.to_string()).collect();
        ValidationResult::from_findings(errors, Vec::new())
    }
}

// ============================================================================
// SECTION: Response Validator
// ============================================================================

/// Validates response data against an expected schema and custom rules.
#[derive(Debug, Default, Clone, Copy)]
pub struct ResponseValidator {
    /// Schema validation backend.
    schemas: SchemaValidator,
}

impl ResponseValidator {
    /// Creates a new response validator.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            schemas: SchemaValidator::new(),
        }
    }

    /// Validates response data against an optional schema and rule set.
    #[must_use]
    pub fn validate(
        &self,
        data: &Value,
        expected_schema: Option<&Value>,
        rules: &[ValidationRule],
    ) -> ValidationResult {
        let mut outcome = ValidationResult::ok();
        if let Some(schema) = expected_schema {
            outcome.absorb(self.schemas.validate(data, schema));
        }
        for rule in rules {
            outcome.absorb(rule.apply(data));
        }
        outcome
    }
}

// ============================================================================
// SECTION: Contract Validator
// ============================================================================

/// Validates observed responses against the contract document.
#[derive(Debug, Default, Clone, Copy)]
pub struct ContractValidator {
    /// Response validation backend.
    responses: ResponseValidator,
}

impl ContractValidator {
    /// Creates a new contract validator.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            responses: ResponseValidator::new(),
        }
    }

    /// Checks an observed response against the contract.
    ///
    /// Fails when the endpoint is absent from the document; warns when the
    /// endpoint declares no response definition for the observed status.
    #[must_use]
    pub fn check_compliance(
        &self,
        document: &Value,
        path: &str,
        method: Method,
        status: u16,
        response_data: &Value,
    ) -> ValidationResult {
        let Some(operation) = document
            .get("paths")
            .and_then(|paths| paths.get(path))
            .and_then(|item| item.get(method.as_key()))
        else {
            return ValidationResult::from_findings(
                vec![format!("endpoint {method} {path} not found in specification")],
                Vec::new(),
            );
        };

        let Some(definition) =
            operation.get("responses").and_then(|responses| responses.get(status.to_string()))
        else {
            return ValidationResult::from_findings(
                Vec::new(),
                vec![format!("no response definition found for status code {status}")],
            );
        };

        match crate::cases::response_schema(definition) {
            Some(schema) => self.responses.validate(response_data, Some(&schema), &[]),
            None => ValidationResult::ok(),
        }
    }
}
