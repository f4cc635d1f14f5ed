// litevault-core/src/redaction_match.rs
//! Match records and sensitive-content-safe debug logging for the redaction
//! pipeline.

use lazy_static::lazy_static;
use log::debug;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::config::RedactionSummaryItem;

lazy_static! {
    /// Whether debug logs may show matched content verbatim. Read once.
    static ref PII_DEBUG_ALLOWED: bool = {
        std::env::var("LITEVAULT_ALLOW_DEBUG_PII")
            .map(|s| s.eq_ignore_ascii_case("true"))
            .unwrap_or(false)
    };
}

/// One replacement performed by a rule.
///
/// The original text is only kept as a hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct RedactionMatch {
    pub rule_name: String,
    pub sample_hash: String,
    pub sanitized_string: String,
}

impl RedactionMatch {
    pub fn new(rule_name: &str, original: &str, sanitized: String) -> Self {
        Self {
            rule_name: rule_name.to_string(),
            sample_hash: canonical_sample_hash(rule_name, original),
            sanitized_string: sanitized,
        }
    }
}

pub fn redact_sensitive(s: &str) -> String {
    const MAX_LEN: usize = 8;
    if s.len() <= MAX_LEN {
        "[REDACTED]".to_string()
    } else {
        format!("[REDACTED: {} chars]", s.len())
    }
}

fn get_loggable_content(sensitive_content: &str) -> String {
    if *PII_DEBUG_ALLOWED {
        sensitive_content.to_string()
    } else {
        redact_sensitive(sensitive_content)
    }
}

pub fn log_redaction_action_debug(
    module_path: &str,
    original_sensitive_content: &str,
    sanitized_replacement: &str,
    rule_name: &str,
) {
    debug!(
        "{} Redaction action: Original='{}', Redacted='{}' for rule '{}'",
        module_path,
        get_loggable_content(original_sensitive_content),
        sanitized_replacement,
        rule_name
    );
}

pub fn canonical_sample_hash(rule_id: &str, snippet: &str) -> String {
    let normalized = snippet
        .trim()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");

    let mut hasher = Sha256::new();
    hasher.update(rule_id.as_bytes());
    hasher.update(b":");
    hasher.update(normalized.as_bytes());
    hex::encode(hasher.finalize())
}

/// Groups matches per rule, keeping first-seen rule order.
pub fn summarize_matches(matches: &[RedactionMatch]) -> Vec<RedactionSummaryItem> {
    let mut summary: Vec<RedactionSummaryItem> = Vec::new();
    for m in matches {
        match summary.iter_mut().find(|item| item.rule_name == m.rule_name) {
            Some(item) => {
                item.occurrences += 1;
                if !item.sample_hashes.contains(&m.sample_hash) {
                    item.sample_hashes.push(m.sample_hash.clone());
                }
            }
            None => summary.push(RedactionSummaryItem {
                rule_name: m.rule_name.clone(),
                occurrences: 1,
                sample_hashes: vec![m.sample_hash.clone()],
            }),
        }
    }
    summary
}
