// litevault-core/src/engine.rs
//! Defines the core SanitizationEngine trait.
//!
//! The `SanitizationEngine` trait provides a pluggable interface for
//! redaction methods. The `Redactor` and the CLI only talk to this trait,
//! so an engine can be swapped without touching either.
//!
//! License: MIT OR APACHE 2.0

use anyhow::Result;

use crate::config::{RedactionConfig, RedactionSummaryItem};
use crate::sanitizers::compiler::CompiledRules;

/// A trait that defines the core functionality of a sanitization engine.
pub trait SanitizationEngine: Send + Sync {
    /// Performs full sanitization on the provided content.
    ///
    /// Returns the sanitized content and a per-rule summary of what was
    /// replaced.
    ///
    /// # Arguments
    /// * `content` - The input string to sanitize.
    /// * `source_id` - The name or identifier of the source being processed.
    fn sanitize(&self, content: &str, source_id: &str) -> Result<(String, Vec<RedactionSummaryItem>)>;

    /// Analyzes the provided content for sensitive data without returning
    /// the redacted text.
    fn analyze_for_stats(&self, content: &str, source_id: &str) -> Result<Vec<RedactionSummaryItem>> {
        self.sanitize(content, source_id).map(|(_, summary)| summary)
    }

    /// Returns a reference to the `CompiledRules` used by the engine.
    fn compiled_rules(&self) -> &CompiledRules;

    /// Returns a reference to the engine's configuration.
    fn get_rules(&self) -> &RedactionConfig;
}
