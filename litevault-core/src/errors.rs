//! errors.rs - Custom error types for the litevault-core library.
//!
//! This module defines a structured error enum for the library, providing
//! specific, actionable error types that can be handled programmatically.
//!
//! License: MIT OR APACHE 2.0

use thiserror::Error;

/// Reasons a compact token could not be inspected.
///
/// The expiry check collapses every one of these into "treat as expiring";
/// the variants exist so diagnostics and the CLI can say which step failed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("token is missing or blank")]
    Missing,

    #[error("expected 3 dot-separated segments, found {0}")]
    MalformedSegments(usize),

    #[error("payload segment is not valid base64url: {0}")]
    PayloadEncoding(String),

    #[error("payload is not a JSON object: {0}")]
    PayloadJson(String),

    #[error("payload has no numeric `exp` claim")]
    MissingExpiry,
}

/// This enum represents all possible error types in the `litevault-core` library.
///
/// By using `#[non_exhaustive]`, we signal to consumers of this library that
/// new variants may be added in future versions.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum LiteVaultError {
    #[error("Failed to compile redaction rule '{0}': {1}")]
    RuleCompilationError(String, regex::Error),

    #[error("Rule '{0}': pattern length ({1}) exceeds maximum allowed ({2})")]
    PatternLengthExceeded(String, usize, usize),

    #[error("Invalid compact token: {0}")]
    InvalidToken(#[from] TokenError),

    #[error("Session storage failed: {0}")]
    SessionStore(String),

    #[error("Failed to serialize data: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("An unexpected I/O error occurred: {0}")]
    IoError(#[from] std::io::Error),

    #[error("A critical system error occurred: {0}")]
    AnyhowWrapper(#[from] anyhow::Error),

    #[error("A fatal error occurred: {0}")]
    Fatal(String),
}
