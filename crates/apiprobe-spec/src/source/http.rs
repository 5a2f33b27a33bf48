// crates/apiprobe-spec/src/source/http.rs
// ============================================================================
// Module: URL Source
// Description: HTTP-backed contract source.
// Purpose: Fetch contract bytes via HTTP GET with format sniffing.
// Dependencies: reqwest
// ============================================================================

//! ## Overview
//! Fetches a contract over HTTP GET. The transport-declared media type is
//! preferred for format selection; absent or unrecognized media types leave
//! the format undetermined so the caller falls back to JSON-then-YAML
//! decoding.
//! Invariants:
//! - Non-success status codes fail closed.
//! - Response bodies are read through a size-capped reader.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Read;

use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;

use crate::source::DocumentFormat;
use crate::source::MAX_SPEC_BYTES;
use crate::source::SpecError;
use crate::source::enforce_max_bytes;

// ============================================================================
// SECTION: Fetch
// ============================================================================

/// Fetches contract bytes and the transport-declared format from a URL.
pub(crate) fn fetch(
    client: &Client,
    url: &str,
) -> Result<(Vec<u8>, Option<DocumentFormat>), SpecError> {
    let response =
        client.get(url).send().map_err(|err| SpecError::FetchFailed(err.to_string()))?;
    let status = response.status();
    if !status.is_success() {
        return Err(SpecError::FetchFailed(format!("status {status} fetching {url}")));
    }

    let format = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .and_then(sniff_media_type);

    let cap = u64::try_from(MAX_SPEC_BYTES).unwrap_or(u64::MAX);
    let mut bytes = Vec::new();
    response
        .take(cap.saturating_add(1))
        .read_to_end(&mut bytes)
        .map_err(|err| SpecError::FetchFailed(err.to_string()))?;
    enforce_max_bytes(bytes.len())?;
    Ok((bytes, format))
}

/// Maps a media type onto a payload format, when unambiguous.
fn sniff_media_type(media_type: &str) -> Option<DocumentFormat> {
    let lowered = media_type.to_ascii_lowercase();
    if lowered.contains("json") {
        return Some(DocumentFormat::Json);
    }
    if lowered.contains("yaml") {
        return Some(DocumentFormat::Yaml);
    }
    None
}
