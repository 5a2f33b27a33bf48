// crates/apiprobe-gen/src/tests.rs
// ============================================================================
// Module: Gen Unit Tests
// Description: Unit coverage for filtering, grouping, and name mangling.
// Purpose: Pin the pipeline-owned generation logic.
// Dependencies: apiprobe-gen, apiprobe-core
// ============================================================================

//! ## Overview
//! Unit tests for include/exclude precedence, tag grouping, and the
//! snake_case filename fragment conversion.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use apiprobe_core::Endpoint;
use apiprobe_core::Method;

use crate::generator::filter_endpoints;
use crate::generator::group_by_tag;
use crate::generator::snake_case;

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Builds a minimal endpoint fixture.
fn endpoint(path: &str, tags: &[&str]) -> Endpoint {
    Endpoint {
        path: path.to_string(),
        method: Method::Get,
        operation_id: None,
        summary: None,
        description: None,
        parameters: Vec::new(),
        request_body: None,
        responses: BTreeMap::new(),
        tags: tags.iter().map(|tag| (*tag).to_string()).collect(),
        security: Vec::new(),
    }
}

// ============================================================================
// SECTION: Filtering Tests
// ============================================================================

/// Tests exclusion removes listed paths when no inclusion list is set.
#[test]
fn exclusion_removes_listed_paths() {
    let endpoints = vec![endpoint("/a", &[]), endpoint("/b", &[])];
    let kept = filter_endpoints(endpoints, &["/a".to_string()], &[]);
    assert_eq!(kept.len(), 1);
    assert_eq!(kept[0].path, "/b");
}

/// Tests a non-empty inclusion list replaces exclusion entirely.
#[test]
fn inclusion_wins_over_exclusion() {
    let endpoints = vec![endpoint("/a", &[]), endpoint("/b", &[])];
    let kept = filter_endpoints(endpoints, &["/b".to_string()], &["/b".to_string()]);
    assert_eq!(kept.len(), 1);
    assert_eq!(kept[0].path, "/b");
}

/// Tests empty filters keep the full endpoint set.
#[test]
fn empty_filters_keep_everything() {
    let endpoints = vec![endpoint("/a", &[]), endpoint("/b", &[])];
    let kept = filter_endpoints(endpoints, &[], &[]);
    assert_eq!(kept.len(), 2);
}

// ============================================================================
// SECTION: Grouping Tests
// ============================================================================

/// Tests multi-tag endpoints appear in every matching group.
#[test]
fn multi_tag_endpoint_in_every_group() {
    let endpoints = vec![endpoint("/a", &["users", "admin"]), endpoint("/b", &["users"])];
    let groups = group_by_tag(&endpoints);
    assert_eq!(groups.len(), 2);
    assert_eq!(groups["users"].len(), 2);
    assert_eq!(groups["admin"].len(), 1);
}

/// Tests untagged endpoints fall into the default group.
#[test]
fn untagged_endpoint_in_default_group() {
    let endpoints = vec![endpoint("/health", &[])];
    let groups = group_by_tag(&endpoints);
    assert_eq!(groups.len(), 1);
    assert!(groups.contains_key("default"));
}

// ============================================================================
// SECTION: Name Mangling Tests
// ============================================================================

/// Tests camel-case tags convert to snake_case fragments.
#[test]
fn snake_case_handles_camel_case() {
    assert_eq!(snake_case("UserManagement"), "user_management");
    assert_eq!(snake_case("HTTPServer"), "http_server");
    assert_eq!(snake_case("pets"), "pets");
}

/// Tests separators collapse into single underscores.
#[test]
fn snake_case_handles_separators() {
    assert_eq!(snake_case("user management"), "user_management");
    assert_eq!(snake_case("user-management"), "user_management");
}
