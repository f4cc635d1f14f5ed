// litevault-core/src/lib.rs
//! # LiteVault Core Library
//!
//! `litevault-core` holds the platform-independent privacy plumbing of the
//! LiteVault client: scrubbing sensitive data out of log lines before they
//! leave the process, and deciding whether a compact session token should be
//! refreshed before it is attached to a request.
//!
//! ## Modules
//!
//! * `config`: `RedactionRule`s, the attribute allow-list and `RedactionConfig` loading/merging.
//! * `sanitizers`: Compiles rules into regexes and caches the result.
//! * `engine`: The `SanitizationEngine` trait.
//! * `engines`: The sequential `RegexEngine`.
//! * `redaction_match`: Per-replacement records and summaries with hashed samples.
//! * `redactor`: The infallible `Redactor` facade used by log pipelines.
//! * `logging`: Policy-filtered `RedactingLogger` and its sinks.
//! * `token`: Compact-token payload decoding and the expiry check.
//! * `session`: Session token storage and pre-emptive refresh.
//! * `http_log`: Header- and body-free request log lines.
//! * `errors`: `LiteVaultError` and `TokenError`.
//!
//! ## Usage Example
//!
//! ```rust
//! use litevault_core::{is_about_to_expire, Redactor};
//! use anyhow::Result;
//!
//! fn main() -> Result<()> {
//!     let redactor = Redactor::default_rules()?;
//!     let line = redactor.redact("Authorization: Bearer abc.def.ghi");
//!     assert_eq!(line, "Authorization: [REDACTED]");
//!
//!     // Tokens that cannot be read are treated as expiring.
//!     assert!(is_about_to_expire(Some("not-a-token"), 10));
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! Loading and compiling rules return `anyhow::Result` with context; typed
//! failures are `LiteVaultError` variants. The redaction and expiry checks
//! themselves never fail: a broken pipeline replaces the whole input and an
//! unreadable token counts as expiring.
//!
//! ---
//! License: MIT OR APACHE 2.0

pub mod config;
pub mod engine;
pub mod engines;
pub mod errors;
pub mod http_log;
pub mod logging;
pub mod redaction_match;
pub mod redactor;
pub mod sanitizers;
pub mod session;
pub mod token;

/// Rule configuration.
pub use config::{
    merge_rules,
    validate_rules,
    AttributePolicy,
    RedactionConfig,
    RedactionRule,
    RedactionSummaryItem,
    ReplacementStrategy,
    SensitiveKeyClass,
    MAX_PATTERN_LENGTH,
};

pub use errors::{LiteVaultError, TokenError};

pub use engine::SanitizationEngine;
pub use engines::regex_engine::RegexEngine;

pub use redaction_match::{redact_sensitive, RedactionMatch};

pub use redactor::{RedactedError, Redactor};

pub use logging::{
    format_event, LogCrateSink, LogPolicy, LogRecord, LogSeverity, LogSink, Logger, MemorySink,
    RedactingLogger,
};

pub use token::{
    bearer_header, decode_claims, expires_in_ms, is_about_to_expire, is_about_to_expire_at, TokenClaims,
    DEFAULT_BUFFER_SECONDS,
};

pub use session::{
    ensure_fresh_session, ensure_fresh_session_at, FileSessionStore, MemorySessionStore, SessionData, SessionStore,
    TokenRefresher,
};

pub use http_log::{build_message, build_url_label, find_trace_id};

pub use sanitizers::compiler::{compile_rules, CompiledRule, CompiledRules};
