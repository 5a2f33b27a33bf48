// crates/apiprobe-spec/tests/loader.rs
// ============================================================================
// Module: Spec Loader Tests
// Description: Integration coverage for url and file contract sources.
// Purpose: Pin fetch, sniffing, and failure behavior of the loader.
// Dependencies: apiprobe-spec, serde_json, tempfile, tiny_http
// ============================================================================

//! ## Overview
//! Loads contracts from a loopback HTTP server and from temporary files,
//! covering transport media-type sniffing, the JSON-then-YAML fallback,
//! and the not-found and decode failure modes.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::PathBuf;

use apiprobe_spec::SpecClient;
use apiprobe_spec::SpecError;
use apiprobe_spec::SpecSource;
use serde_json::json;
use tempfile::tempdir;
use tiny_http::Header;
use tiny_http::Response;
use tiny_http::Server;

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Serves one response with the given content type and body.
fn serve_once(content_type: &'static str, body: &'static str) -> String {
    let server = Server::http("127.0.0.1:0").expect("http server");
    let addr = server.server_addr();
    std::thread::spawn(move || {
        if let Ok(request) = server.recv() {
            let response = Response::from_string(body).with_header(
                Header::from_bytes("Content-Type", content_type).expect("header"),
            );
            let _ = request.respond(response);
        }
    });
    format!("http://{addr}/openapi")
}

// ============================================================================
// SECTION: URL Source Tests
// ============================================================================

/// Tests a JSON media type selects JSON decoding.
#[test]
fn loads_json_from_url() {
    let url = serve_once("application/json", r#"{"openapi": "3.0.0"}"#);
    let client = SpecClient::new().expect("client");
    let document = client.load(&SpecSource::Url(url)).expect("load");
    assert_eq!(document["openapi"], json!("3.0.0"));
}

/// Tests a YAML media type selects YAML decoding.
#[test]
fn loads_yaml_from_url() {
    let url = serve_once("application/yaml", "openapi: 3.0.0\ninfo:\n  title: Demo\n");
    let client = SpecClient::new().expect("client");
    let document = client.load(&SpecSource::Url(url)).expect("load");
    assert_eq!(document["info"]["title"], json!("Demo"));
}

/// Tests an ambiguous media type falls back to JSON-then-YAML decoding.
#[test]
fn ambiguous_media_type_falls_back() {
    let url = serve_once("text/plain", "openapi: 3.0.0\n");
    let client = SpecClient::new().expect("client");
    let document = client.load(&SpecSource::Url(url)).expect("load");
    assert_eq!(document["openapi"], json!("3.0.0"));
}

/// Tests a non-success status fails the fetch.
#[test]
fn error_status_fails_fetch() {
    let server = Server::http("127.0.0.1:0").expect("http server");
    let addr = server.server_addr();
    std::thread::spawn(move || {
        if let Ok(request) = server.recv() {
            let _ = request.respond(Response::from_string("gone").with_status_code(404));
        }
    });
    let client = SpecClient::new().expect("client");
    let err =
        client.load(&SpecSource::Url(format!("http://{addr}/openapi"))).expect_err("status");
    assert!(matches!(err, SpecError::FetchFailed(_)));
}

// ============================================================================
// SECTION: File Source Tests
// ============================================================================

/// Tests JSON contract files load without a format hint.
#[test]
fn loads_json_file() {
    let dir = tempdir().expect("temp dir");
    let path = dir.path().join("openapi.json");
    std::fs::write(&path, r#"{"openapi": "3.1.0", "info": {"title": "File"}}"#)
        .expect("write spec");
    let client = SpecClient::new().expect("client");
    let document = client.load(&SpecSource::File(path)).expect("load");
    assert_eq!(document["info"]["title"], json!("File"));
}

/// Tests YAML contract files load through the fallback decoder.
#[test]
fn loads_yaml_file() {
    let dir = tempdir().expect("temp dir");
    let path = dir.path().join("openapi.yaml");
    std::fs::write(&path, "openapi: 3.0.0\ninfo:\n  title: YamlFile\n").expect("write spec");
    let client = SpecClient::new().expect("client");
    let document = client.load(&SpecSource::File(path)).expect("load");
    assert_eq!(document["info"]["title"], json!("YamlFile"));
}

/// Tests a missing file fails with the not-found error.
#[test]
fn missing_file_fails_not_found() {
    let client = SpecClient::new().expect("client");
    let err = client
        .load(&SpecSource::File(PathBuf::from("/nonexistent/openapi.yaml")))
        .expect_err("missing");
    assert!(matches!(err, SpecError::NotFound(_)));
}

/// Tests a file valid in neither format fails with a decode error.
#[test]
fn undecodable_file_fails() {
    let dir = tempdir().expect("temp dir");
    let path = dir.path().join("openapi.txt");
    std::fs::write(&path, "{broken: [json\n\t- : :").expect("write spec");
    let client = SpecClient::new().expect("client");
    let err = client.load(&SpecSource::File(path)).expect_err("decode");
    assert!(matches!(err, SpecError::DecodeError(_)));
}
