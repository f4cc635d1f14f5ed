// litevault-core/src/engines/regex_engine.rs
//! A `SanitizationEngine` implementation that applies regular-expression
//! rules strictly in sequence.
//!
//! Each rule rewrites the output of the previous one, so the rule order
//! decides which rule claims a piece of text first.
//! License: MIT OR APACHE 2.0

use anyhow::{Context, Result};
use lazy_static::lazy_static;
use regex::{Captures, Regex};
use std::borrow::Cow;
use std::sync::Arc;

use crate::config::{RedactionConfig, RedactionSummaryItem, ReplacementStrategy, LEN_TOKEN, VALUE_GROUP};
use crate::engine::SanitizationEngine;
use crate::redaction_match::{log_redaction_action_debug, summarize_matches, RedactionMatch};
use crate::sanitizers::compiler::{get_or_compile_rules, CompiledRule, CompiledRules};

lazy_static! {
    static ref PLACEHOLDER: Regex =
        Regex::new(r"^\[REDACTED(?:_CODE|_JWT|(?:_TEXT)? len=\d+)?\]$").unwrap();
    static ref MASKED_EMAIL: Regex =
        Regex::new(r"^[A-Za-z0-9._%+-]\*\*\*@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").unwrap();
}

/// True when `value` is exactly one placeholder and nothing else.
pub fn is_placeholder(value: &str) -> bool {
    PLACEHOLDER.is_match(value)
}

/// True when `value` is exactly a masked address such as `j***@example.com`.
pub fn is_masked_email(value: &str) -> bool {
    MASKED_EMAIL.is_match(value)
}

#[derive(Debug)]
pub struct RegexEngine {
    compiled_rules: Arc<CompiledRules>,
    config: RedactionConfig,
}

impl RegexEngine {
    pub fn new(config: RedactionConfig) -> Result<Self> {
        let compiled_rules = get_or_compile_rules(&config)
            .context("Failed to compile redaction rules for RegexEngine")?;

        Ok(Self {
            compiled_rules,
            config,
        })
    }

    /// Runs the whole pipeline and returns the rewritten text and every
    /// replacement that changed something.
    pub fn redact_with_matches(&self, content: &str, source_id: &str) -> (String, Vec<RedactionMatch>) {
        let mut matches = Vec::new();
        let mut current = content.to_string();
        for rule in &self.compiled_rules.rules {
            current = apply_rule(rule, &current, source_id, &mut matches);
        }
        (current, matches)
    }
}

/// Applies a single rule to `input`.
fn apply_rule(
    rule: &CompiledRule,
    input: &str,
    source_id: &str,
    matches: &mut Vec<RedactionMatch>,
) -> String {
    let output = rule.regex.replace_all(input, |caps: &Captures<'_>| {
        let whole = caps.get(0).map_or("", |m| m.as_str());
        match render_replacement(rule, caps) {
            Some(replacement) if replacement != whole => {
                log_redaction_action_debug(source_id, whole, &replacement, &rule.name);
                matches.push(RedactionMatch::new(&rule.name, whole, replacement.clone()));
                replacement
            }
            _ => whole.to_string(),
        }
    });
    output.into_owned()
}

/// Builds the replacement for one match, or `None` to leave it untouched.
fn render_replacement(rule: &CompiledRule, caps: &Captures<'_>) -> Option<String> {
    let template: Cow<'_, str> = match rule.replacement {
        ReplacementStrategy::Literal => Cow::Borrowed(rule.replace_with.as_str()),
        ReplacementStrategy::LengthPreserving => {
            let value = caps.name(VALUE_GROUP)?.as_str();
            if is_placeholder(value) {
                return None;
            }
            let len = value.chars().count().to_string();
            Cow::Owned(rule.replace_with.replace(LEN_TOKEN, &len))
        }
    };
    let mut out = String::with_capacity(template.len());
    caps.expand(&template, &mut out);
    Some(out)
}

impl SanitizationEngine for RegexEngine {
    fn sanitize(&self, content: &str, source_id: &str) -> Result<(String, Vec<RedactionSummaryItem>)> {
        let (sanitized, matches) = self.redact_with_matches(content, source_id);
        Ok((sanitized, summarize_matches(&matches)))
    }

    fn compiled_rules(&self) -> &CompiledRules {
        &self.compiled_rules
    }

    fn get_rules(&self) -> &RedactionConfig {
        &self.config
    }
}
