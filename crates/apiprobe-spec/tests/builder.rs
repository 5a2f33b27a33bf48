// crates/apiprobe-spec/tests/builder.rs
// ============================================================================
// Module: Model Builder Tests
// Description: Integration coverage for extraction, refs, and validation.
// Purpose: Pin the canonical-model contract of the spec builder.
// Dependencies: apiprobe-spec, apiprobe-core, serde_json
// ============================================================================

//! ## Overview
//! Builds the canonical model from inline documents and checks endpoint
//! extraction, schema extraction, reference resolution (including the
//! unresolved and cyclic failure modes), and document validation.

// ============================================================================
// SECTION: Imports
// ============================================================================

use apiprobe_core::Method;
use apiprobe_core::ParameterLocation;
use apiprobe_spec::BuildError;
use apiprobe_spec::extract_schemas;
use apiprobe_spec::parse_endpoints;
use apiprobe_spec::resolve_refs;
use apiprobe_spec::validate_document;
use serde_json::Value;
use serde_json::json;

// ============================================================================
// SECTION: Fixtures
// ============================================================================

/// Returns a small but fully-populated contract document.
fn petstore() -> Value {
    json!({
        "openapi": "3.0.0",
        "info": {"title": "Petstore", "version": "1.0.0"},
        "paths": {
            "/pets": {
                "get": {
                    "operationId": "listPets",
                    "summary": "List pets",
                    "tags": ["pets"],
                    "responses": {
                        "200": {"description": "ok"},
                        "500": {"description": "boom"}
                    }
                },
                "post": {
                    "operationId": "createPet",
                    "requestBody": {
                        "content": {
                            "application/json": {
                                "schema": {"$ref": "#/components/schemas/Pet"}
                            }
                        }
                    },
                    "responses": {"201": {"description": "created"}}
                },
                "x-rate-limit": {"requests": 100},
                "parameters": []
            },
            "/pets/{petId}": {
                "get": {
                    "operationId": "getPet",
                    "parameters": [
                        {"name": "petId", "in": "path", "required": true,
                         "schema": {"type": "string"}}
                    ],
                    "responses": {"200": {"description": "ok"}}
                }
            }
        },
        "components": {
            "schemas": {
                "Pet": {
                    "type": "object",
                    "required": ["id", "name"],
                    "properties": {
                        "id": {"type": "integer"},
                        "name": {"type": "string"}
                    }
                }
            }
        }
    })
}

// ============================================================================
// SECTION: Extraction Tests
// ============================================================================

/// Tests every recognized verb key becomes one endpoint.
#[test]
fn extracts_one_endpoint_per_verb() {
    let endpoints = parse_endpoints(&petstore());
    assert_eq!(endpoints.len(), 3);
    let identities: Vec<(String, Method)> = endpoints
        .iter()
        .map(|endpoint| (endpoint.path.clone(), endpoint.method))
        .collect();
    assert!(identities.contains(&("/pets".to_string(), Method::Get)));
    assert!(identities.contains(&("/pets".to_string(), Method::Post)));
    assert!(identities.contains(&("/pets/{petId}".to_string(), Method::Get)));
}

/// Tests extension keys on a path item are silently ignored.
#[test]
fn extension_keys_are_ignored() {
    let endpoints = parse_endpoints(&petstore());
    assert!(endpoints.iter().all(|endpoint| endpoint.path != "x-rate-limit"));
}

/// Tests operation metadata is carried onto the record.
#[test]
fn carries_operation_metadata() {
    let endpoints = parse_endpoints(&petstore());
    let listing = endpoints
        .iter()
        .find(|endpoint| endpoint.operation_id.as_deref() == Some("listPets"))
        .expect("listPets");
    assert_eq!(listing.summary.as_deref(), Some("List pets"));
    assert_eq!(listing.tags, vec!["pets".to_string()]);
    assert_eq!(listing.responses.len(), 2);
}

/// Tests declared parameters are parsed with their location.
#[test]
fn parses_parameters() {
    let endpoints = parse_endpoints(&petstore());
    let item = endpoints
        .iter()
        .find(|endpoint| endpoint.path == "/pets/{petId}")
        .expect("item endpoint");
    assert_eq!(item.parameters.len(), 1);
    assert_eq!(item.parameters[0].name, "petId");
    assert_eq!(item.parameters[0].location, ParameterLocation::Path);
    assert!(item.parameters[0].required);
}

/// Tests only the components table surfaces named schemas.
#[test]
fn extracts_component_schemas() {
    let schemas = extract_schemas(&petstore());
    assert_eq!(schemas.len(), 1);
    let pet = schemas.get("Pet").expect("Pet schema");
    assert_eq!(pet.required, vec!["id".to_string(), "name".to_string()]);
    assert!(pet.properties.contains_key("name"));
}

/// Tests documents without a components table yield no schemas.
#[test]
fn no_components_table_yields_no_schemas() {
    let document = json!({"openapi": "3.0.0", "info": {"title": "t"}, "paths": {}});
    assert!(extract_schemas(&document).is_empty());
}

// ============================================================================
// SECTION: Reference Tests
// ============================================================================

/// Tests internal references resolve to their target subtree.
#[test]
fn resolves_internal_references() {
    let resolved = resolve_refs(&petstore()).expect("resolve");
    let schema = &resolved["paths"]["/pets"]["post"]["requestBody"]["content"]
        ["application/json"]["schema"];
    assert_eq!(schema["type"], json!("object"));
    assert!(schema.get("$ref").is_none());
}

/// Tests a missing pointer target fails instead of resolving silently.
#[test]
fn missing_reference_fails() {
    let document = json!({
        "openapi": "3.0.0",
        "info": {"title": "t"},
        "paths": {
            "/a": {"get": {"responses": {"200": {
                "content": {"application/json": {
                    "schema": {"$ref": "#/components/schemas/Missing"}
                }}
            }}}}
        }
    });
    let err = resolve_refs(&document).expect_err("unresolved");
    assert!(matches!(err, BuildError::UnresolvedReference(pointer)
        if pointer == "#/components/schemas/Missing"));
}

/// Tests external references pass through unresolved.
#[test]
fn external_references_pass_through() {
    let document = json!({
        "paths": {
            "/a": {"get": {"responses": {"200": {
                "content": {"application/json": {
                    "schema": {"$ref": "https://example.com/shared.yaml#/Pet"}
                }}
            }}}}
        }
    });
    let resolved = resolve_refs(&document).expect("resolve");
    let schema = &resolved["paths"]["/a"]["get"]["responses"]["200"]["content"]
        ["application/json"]["schema"];
    assert_eq!(schema["$ref"], json!("https://example.com/shared.yaml#/Pet"));
}

/// Tests cyclic references fail closed at the depth cap.
#[test]
fn cyclic_references_fail_closed() {
    let document = json!({
        "components": {
            "schemas": {
                "A": {"$ref": "#/components/schemas/B"},
                "B": {"$ref": "#/components/schemas/A"}
            }
        }
    });
    let err = resolve_refs(&document).expect_err("cycle");
    assert!(matches!(err, BuildError::ReferenceDepthExceeded(_)));
}

// ============================================================================
// SECTION: Validation Tests
// ============================================================================

/// Tests a well-formed document validates.
#[test]
fn valid_document_passes() {
    assert!(validate_document(&petstore()).is_ok());
}

/// Tests each missing top-level field is reported first.
#[test]
fn missing_top_level_fields_fail() {
    let err = validate_document(&json!({"info": {}, "paths": {}})).expect_err("no openapi");
    assert!(matches!(err, BuildError::InvalidSpec { field, .. } if field == "openapi"));

    let err = validate_document(&json!({"openapi": "3.0.0", "paths": {}}))
        .expect_err("no info");
    assert!(matches!(err, BuildError::InvalidSpec { field, .. } if field == "info"));

    let err = validate_document(&json!({"openapi": "3.0.0", "info": {"title": "t"}}))
        .expect_err("no paths");
    assert!(matches!(err, BuildError::InvalidSpec { field, .. } if field == "paths"));
}

/// Tests 2.x documents are rejected.
#[test]
fn unsupported_version_fails() {
    let document = json!({"openapi": "2.0", "info": {"title": "t"}, "paths": {}});
    let err = validate_document(&document).expect_err("old version");
    assert!(matches!(err, BuildError::InvalidSpec { field, .. } if field == "openapi"));
}

/// Tests a missing info title is rejected.
#[test]
fn missing_title_fails() {
    let document = json!({"openapi": "3.0.0", "info": {"version": "1"}, "paths": {}});
    let err = validate_document(&document).expect_err("no title");
    assert!(matches!(err, BuildError::InvalidSpec { field, .. } if field == "info.title"));
}
