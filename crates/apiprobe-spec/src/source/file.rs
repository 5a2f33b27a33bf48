// crates/apiprobe-spec/src/source/file.rs
// ============================================================================
// Module: File Source
// Description: Local-filesystem contract source.
// Purpose: Read contract bytes from a local path with existence checking.
// Dependencies: std::fs
// ============================================================================

//! ## Overview
//! Reads a contract from the local filesystem. Files carry no transport
//! media type, so format selection always falls back to JSON-then-YAML
//! decoding in the caller.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;
use std::path::Path;

use crate::source::SpecError;
use crate::source::enforce_max_bytes;

// ============================================================================
// SECTION: Fetch
// ============================================================================

/// Reads contract bytes from a local path.
pub(crate) fn fetch(path: &Path) -> Result<Vec<u8>, SpecError> {
    if !path.exists() {
        return Err(SpecError::NotFound(path.display().to_string()));
    }
    let bytes = fs::read(path).map_err(|err| SpecError::FetchFailed(err.to_string()))?;
    enforce_max_bytes(bytes.len())?;
    Ok(bytes)
}
