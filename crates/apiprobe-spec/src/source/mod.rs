// crates/apiprobe-spec/src/source/mod.rs
// ============================================================================
// Module: Spec Sources
// Description: Source descriptors, decoding, and the loading client.
// Purpose: Fetch raw contract bytes and decode them into a JSON document.
// Dependencies: reqwest, serde_json, serde_yaml, thiserror
// ============================================================================

//! ## Overview
//! A [`SpecSource`] names exactly one place a contract lives: a URL, a local
//! file, or a git repository checkout. [`SpecClient::load`] fetches the raw
//! bytes, sniffs the format (transport media type first, then JSON with a
//! YAML fallback), and returns the decoded document.
//! Invariants:
//! - Payloads are capped at [`MAX_SPEC_BYTES`] and fail closed beyond it.
//! - Git checkouts are transient and removed on success and failure alike.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::PathBuf;
use std::time::Duration;

use serde_json::Value;
use thiserror::Error;

mod file;
pub(crate) mod git;
mod http;

pub use git::GitSource;

// ============================================================================
// SECTION: Limits
// ============================================================================

/// Maximum accepted size of a raw contract payload.
pub const MAX_SPEC_BYTES: usize = 8 * 1024 * 1024;

/// Timeout applied to remote contract fetches.
pub(crate) const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// User agent sent with remote contract fetches.
pub(crate) const USER_AGENT: &str = "apiprobe/0.1";

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors raised while loading a contract.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
/// - Messages never contain embedded credentials.
#[derive(Debug, Error)]
pub enum SpecError {
    /// No specification source was configured.
    #[error("no specification source configured")]
    SourceUnavailable,
    /// A network or process error occurred while fetching.
    #[error("failed to fetch specification: {0}")]
    FetchFailed(String),
    /// A local or repository-relative path does not exist.
    #[error("specification not found: {0}")]
    NotFound(String),
    /// The payload is neither valid JSON nor valid YAML.
    #[error("specification is neither valid JSON nor valid YAML: {0}")]
    DecodeError(String),
    /// The payload exceeds [`MAX_SPEC_BYTES`].
    #[error("specification exceeds size limit ({actual} > {limit} bytes)")]
    TooLarge {
        /// Enforced byte limit.
        limit: usize,
        /// Observed payload size.
        actual: usize,
    },
}

/// Fails closed when a payload exceeds the size cap.
pub(crate) const fn enforce_max_bytes(actual: usize) -> Result<(), SpecError> {
    if actual > MAX_SPEC_BYTES {
        return Err(SpecError::TooLarge {
            limit: MAX_SPEC_BYTES,
            actual,
        });
    }
    Ok(())
}

// ============================================================================
// SECTION: Source Descriptor
// ============================================================================

/// Transport-declared (or absent) payload format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    /// JSON payload.
    Json,
    /// YAML payload.
    Yaml,
}

/// One place a contract can be loaded from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpecSource {
    /// Remote contract fetched over HTTP GET.
    Url(String),
    /// Contract read from the local filesystem.
    File(PathBuf),
    /// Contract read out of a transient git checkout.
    Git(GitSource),
}

impl SpecSource {
    /// Selects the configured source from optional descriptor parts.
    ///
    /// Precedence follows declaration order: URL, then file, then git.
    ///
    /// # Errors
    ///
    /// Returns [`SpecError::SourceUnavailable`] when none is present.
    pub fn from_parts(
        url: Option<String>,
        path: Option<PathBuf>,
        git: Option<GitSource>,
    ) -> Result<Self, SpecError> {
        if let Some(url) = url {
            return Ok(Self::Url(url));
        }
        if let Some(path) = path {
            return Ok(Self::File(path));
        }
        if let Some(git) = git {
            return Ok(Self::Git(git));
        }
        Err(SpecError::SourceUnavailable)
    }
}

// ============================================================================
// SECTION: Decoding
// ============================================================================

/// Decodes raw payload bytes using the transport format hint.
///
/// Without a hint, JSON decoding is attempted first with a YAML fallback.
pub(crate) fn decode_document(
    bytes: &[u8],
    format: Option<DocumentFormat>,
) -> Result<Value, SpecError> {
    match format {
        Some(DocumentFormat::Json) => {
            serde_json::from_slice(bytes).map_err(|err| SpecError::DecodeError(err.to_string()))
        }
        Some(DocumentFormat::Yaml) => {
            serde_yaml::from_slice(bytes).map_err(|err| SpecError::DecodeError(err.to_string()))
        }
        None => serde_json::from_slice(bytes).or_else(|json_err| {
            serde_yaml::from_slice(bytes)
                .map_err(|yaml_err| SpecError::DecodeError(format!("{json_err}; {yaml_err}")))
        }),
    }
}

// ============================================================================
// SECTION: Spec Client
// ============================================================================

/// Contract loading client.
///
/// # Invariants
/// - One client is reused across fetches within a pipeline run.
pub struct SpecClient {
    /// Blocking HTTP client used for URL sources.
    http: reqwest::blocking::Client,
}

impl SpecClient {
    /// Creates a new loading client.
    ///
    /// # Errors
    ///
    /// Returns [`SpecError::FetchFailed`] when the HTTP client cannot be
    /// constructed.
    pub fn new() -> Result<Self, SpecError> {
        let http = reqwest::blocking::Client::builder()
            .timeout(FETCH_TIMEOUT)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|err| SpecError::FetchFailed(err.to_string()))?;
        Ok(Self {
            http,
        })
    }

    /// Loads and decodes the contract named by a source descriptor.
    ///
    /// # Errors
    ///
    /// Returns [`SpecError`] when fetching or decoding fails.
    pub fn load(&self, source: &SpecSource) -> Result<Value, SpecError> {
        match source {
            SpecSource::Url(target) => {
                let (bytes, format) = http::fetch(&self.http, target)?;
                decode_document(&bytes, format)
            }
            SpecSource::File(path) => {
                let bytes = file::fetch(path)?;
                decode_document(&bytes, None)
            }
            SpecSource::Git(descriptor) => {
                let bytes = git::fetch(descriptor)?;
                decode_document(&bytes, None)
            }
        }
    }
}
