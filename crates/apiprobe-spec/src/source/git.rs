// crates/apiprobe-spec/src/source/git.rs
// ============================================================================
// Module: Git Source
// Description: Contract source backed by a transient git checkout.
// Purpose: Clone a repository shallowly and read one contract file from it.
// Dependencies: std::process, tempfile, url
// ============================================================================

//! ## Overview
//! Fetches a contract out of a version-controlled repository by cloning the
//! named branch into a temporary directory, reading the repository-relative
//! contract path, and dropping the checkout. An optional access token is
//! embedded into the clone URL.
//! Invariants:
//! - The checkout directory is removed on success and failure alike (it is
//!   a [`tempfile::TempDir`], deleted on drop).
//! - The token never appears in error messages; every surfaced string is
//!   passed through [`redact`].

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;
use std::process::Command;

use tempfile::TempDir;
use url::Url;

use crate::source::SpecError;
use crate::source::enforce_max_bytes;

// ============================================================================
// SECTION: Descriptor
// ============================================================================

/// Placeholder substituted for redacted credentials.
const REDACTED: &str = "***";

/// Repository descriptor for a git-hosted contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitSource {
    /// Clone URL of the repository.
    pub repo: String,
    /// Repository-relative path of the contract file.
    pub path: String,
    /// Branch to check out.
    pub branch: String,
    /// Optional access token embedded into the clone URL.
    pub token: Option<String>,
}

// ============================================================================
// SECTION: Fetch
// ============================================================================

/// Clones the repository and reads the contract file from the checkout.
pub(crate) fn fetch(source: &GitSource) -> Result<Vec<u8>, SpecError> {
    let checkout = TempDir::new()
        .map_err(|err| SpecError::FetchFailed(format!("checkout dir: {err}")))?;
    let clone_target = clone_url(&source.repo, source.token.as_deref())?;

    let output = Command::new("git")
        .args(["clone", "--depth", "1", "--branch", &source.branch])
        .arg(&clone_target)
        .arg(checkout.path())
        .output()
        .map_err(|err| {
            SpecError::FetchFailed(redact(&format!("git clone: {err}"), source.token.as_deref()))
        })?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(SpecError::FetchFailed(redact(
            &format!("git clone failed: {}", stderr.trim()),
            source.token.as_deref(),
        )));
    }

    let contract = checkout.path().join(&source.path);
    if !contract.exists() {
        return Err(SpecError::NotFound(format!(
            "specification not found in repository: {}",
            source.path
        )));
    }
    let bytes =
        fs::read(&contract).map_err(|err| SpecError::FetchFailed(err.to_string()))?;
    enforce_max_bytes(bytes.len())?;
    Ok(bytes)
}

/// Builds the clone URL, embedding the access token when present.
fn clone_url(repo: &str, token: Option<&str>) -> Result<String, SpecError> {
    let Some(token) = token else {
        return Ok(repo.to_string());
    };
    let mut parsed = Url::parse(repo).map_err(|err| {
        SpecError::FetchFailed(format!("repository URL is not token-compatible: {err}"))
    })?;
    parsed.set_username(token).map_err(|()| {
        SpecError::FetchFailed("repository URL cannot carry a credential".to_string())
    })?;
    Ok(parsed.to_string())
}

/// Removes the access token from a message destined for an error.
pub(crate) fn redact(message: &str, token: Option<&str>) -> String {
    match token {
        Some(token) if !token.is_empty() => message.replace(token, REDACTED),
        _ => message.to_string(),
    }
}
