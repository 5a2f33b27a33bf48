// crates/apiprobe-engine/src/context.rs
// ============================================================================
// Module: Execution Context
// Description: Immutable target-API context threaded into every worker.
// Purpose: Publish the environment contract rendered artifacts consume.
// Dependencies: std::time
// ============================================================================

//! ## Overview
//! Rendered artifacts read their target configuration from environment
//! variables. The engine never mutates the process-wide environment;
//! instead this immutable context is converted into variable pairs and
//! injected at the process-invocation boundary of each run, which
//! preserves the external contract while keeping workers free of shared
//! mutable state.
//! Invariants:
//! - Exactly one auth scheme is active at a time; schemes are mutually
//!   exclusive by construction.
//! - [`ExecutionContext::env_vars`] is pure and deterministic.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::time::Duration;

// ============================================================================
// SECTION: Environment Contract
// ============================================================================

/// Variable carrying the target base URL.
pub const ENV_BASE_URL: &str = "API_BASE_URL";
/// Variable carrying the bearer token.
pub const ENV_AUTH_TOKEN: &str = "AUTH_TOKEN";
/// Variable carrying the basic-auth username.
pub const ENV_AUTH_USERNAME: &str = "AUTH_USERNAME";
/// Variable carrying the basic-auth password.
pub const ENV_AUTH_PASSWORD: &str = "AUTH_PASSWORD";
/// Variable carrying the API key value.
pub const ENV_API_KEY: &str = "API_KEY";
/// Variable carrying the API key header name.
pub const ENV_API_KEY_HEADER: &str = "API_KEY_HEADER";
/// Variable carrying the per-request timeout, in seconds.
pub const ENV_TIMEOUT: &str = "TIMEOUT";
/// Variable carrying the artifact-level retry budget.
pub const ENV_MAX_RETRIES: &str = "MAX_RETRIES";

// ============================================================================
// SECTION: Auth Schemes
// ============================================================================

/// Mutually exclusive target-API auth schemes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthScheme {
    /// Bearer-token auth, published as a single token variable.
    Bearer {
        /// Token value.
        token: String,
    },
    /// Basic auth, published as a username/password pair.
    Basic {
        /// Username.
        username: String,
        /// Password.
        password: String,
    },
    /// API-key auth, published as key value and header name.
    ApiKey {
        /// Key value.
        key: String,
        /// Header the key is sent in.
        header: String,
    },
}

// ============================================================================
// SECTION: Execution Context
// ============================================================================

/// Immutable target-API context shared read-only by all workers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionContext {
    /// Base URL of the API under test.
    pub base_url: String,
    /// Optional auth scheme.
    pub auth: Option<AuthScheme>,
    /// Per-request timeout published to artifacts.
    pub request_timeout: Duration,
    /// Artifact-level retry budget published to artifacts.
    pub max_retries: u32,
}

impl ExecutionContext {
    /// Converts the context into the environment pairs artifacts consume.
    ///
    /// Pairs are emitted in a fixed order so invocations are reproducible.
    #[must_use]
    pub fn env_vars(&self) -> Vec<(&'static str, String)> {
        let mut vars = vec![(ENV_BASE_URL, self.base_url.clone())];
        match &self.auth {
            Some(AuthScheme::Bearer {
                token,
            }) => {
                vars.push((ENV_AUTH_TOKEN, token.clone()));
            }
            Some(AuthScheme::Basic {
                username,
                password,
            }) => {
                vars.push((ENV_AUTH_USERNAME, username.clone()));
                vars.push((ENV_AUTH_PASSWORD, password.clone()));
            }
            Some(AuthScheme::ApiKey {
                key,
                header,
            }) => {
                vars.push((ENV_API_KEY, key.clone()));
                vars.push((ENV_API_KEY_HEADER, header.clone()));
            }
            None => {}
        }
        vars.push((ENV_TIMEOUT, self.request_timeout.as_secs().to_string()));
        vars.push((ENV_MAX_RETRIES, self.max_retries.to_string()));
        vars
    }
}
