//! compiler.rs - Manages the compilation and caching of redaction rules.
//!
//! This module provides a thread-safe, cached mechanism to convert a
//! `RedactionConfig` into `CompiledRules`, ordered the way the pipeline
//! applies them. It uses a global, shared cache to avoid redundant
//! compilation when several loggers are built from the same configuration.
//!
//! License: MIT OR APACHE 2.0

use anyhow::Result;
use lazy_static::lazy_static;
use log::{debug, warn};
use regex::{Regex, RegexBuilder};
use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, RwLock};

use crate::config::{RedactionConfig, RedactionRule, ReplacementStrategy, MAX_PATTERN_LENGTH};
use crate::errors::LiteVaultError;

/// Represents a single compiled redaction rule.
#[derive(Debug)]
pub struct CompiledRule {
    /// The compiled regular expression used for matching.
    pub regex: Regex,
    /// The replacement template for this rule.
    pub replace_with: String,
    pub replacement: ReplacementStrategy,
    /// The unique name of the redaction rule.
    pub name: String,
}

/// All compiled rules, in the order they are applied.
#[derive(Debug)]
pub struct CompiledRules {
    pub rules: Vec<CompiledRule>,
}

lazy_static! {
    /// A thread-safe, global cache for compiled rules.
    /// The key is a hash of the active rules.
    static ref COMPILED_RULES_CACHE: RwLock<HashMap<u64, Arc<CompiledRules>>> = RwLock::new(HashMap::new());
}

/// Hashes the active rules of a `RedactionConfig` to create a cache key.
///
/// Rules are hashed in pipeline order so two configs listing the same rules
/// differently share an entry.
fn hash_config(config: &RedactionConfig) -> u64 {
    let mut hasher = DefaultHasher::new();
    for rule in config.ordered_rules() {
        rule.hash(&mut hasher);
    }
    hasher.finish()
}

/// Compiles a list of `RedactionRule`s into `CompiledRules`.
///
/// Disabled rules (`enabled: false`) and rules without a pattern are skipped.
/// The result is sorted by `order`, then by name.
pub fn compile_rules(mut rules_to_compile: Vec<RedactionRule>) -> Result<CompiledRules, LiteVaultError> {
    debug!("Starting compilation of {} rules.", rules_to_compile.len());

    rules_to_compile.sort_by(|a, b| a.order.cmp(&b.order).then_with(|| a.name.cmp(&b.name)));

    let mut compiled_rules = Vec::new();
    let mut compilation_errors = Vec::new();

    for rule in rules_to_compile {
        if rule.enabled == Some(false) {
            debug!("Rule '{}' is disabled, skipping.", &rule.name);
            continue;
        }

        let Some(pattern) = rule.pattern.as_ref() else {
            warn!("Skipping rule '{}' because its pattern is missing.", &rule.name);
            continue;
        };

        if pattern.len() > MAX_PATTERN_LENGTH {
            compilation_errors.push(LiteVaultError::PatternLengthExceeded(
                rule.name,
                pattern.len(),
                MAX_PATTERN_LENGTH,
            ));
            continue;
        }

        let regex_result = RegexBuilder::new(pattern)
            .case_insensitive(rule.case_insensitive)
            .multi_line(rule.multiline)
            .dot_matches_new_line(rule.dot_matches_new_line)
            .size_limit(10 * (1 << 20))
            .build();

        match regex_result {
            Ok(regex) => {
                log::debug!(
                    target: "litevault_core::sanitizer",
                    "Rule '{}' compiled successfully.",
                    &rule.name
                );
                compiled_rules.push(CompiledRule {
                    regex,
                    replace_with: rule.replace_with,
                    replacement: rule.replacement,
                    name: rule.name,
                });
            }
            Err(e) => {
                compilation_errors.push(LiteVaultError::RuleCompilationError(rule.name, e));
            }
        }
    }

    if !compilation_errors.is_empty() {
        let error_message = compilation_errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<String>>()
            .join("\n");
        Err(LiteVaultError::Fatal(format!(
            "Failed to compile {} rule(s):\n{}",
            compilation_errors.len(),
            error_message
        )))
    } else {
        debug!("Finished compiling rules. Total compiled: {}.", compiled_rules.len());
        Ok(CompiledRules { rules: compiled_rules })
    }
}

/// Gets a `CompiledRules` instance from the cache or compiles them if not found.
pub fn get_or_compile_rules(config: &RedactionConfig) -> Result<Arc<CompiledRules>> {
    let cache_key = hash_config(config);

    {
        // A poisoned lock only means another thread panicked mid-insert;
        // the map itself is still usable.
        let cache = COMPILED_RULES_CACHE.read().unwrap_or_else(|e| e.into_inner());
        if let Some(rules) = cache.get(&cache_key) {
            debug!("Serving compiled rules from cache for key: {}", &cache_key);
            return Ok(Arc::clone(rules));
        }
    }

    debug!("Compiled rules not found in cache. Compiling now.");
    let compiled = compile_rules(config.rules.clone())?;
    let compiled_arc = Arc::new(compiled);

    COMPILED_RULES_CACHE
        .write()
        .unwrap_or_else(|e| e.into_inner())
        .insert(cache_key, Arc::clone(&compiled_arc));

    debug!("Successfully compiled and cached rules for key: {}", &cache_key);
    Ok(compiled_arc)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(name: &str, pattern: &str, order: u32) -> RedactionRule {
        RedactionRule {
            name: name.to_string(),
            pattern: Some(pattern.to_string()),
            order,
            ..Default::default()
        }
    }

    #[test]
    fn compiles_in_order() {
        let compiled = compile_rules(vec![rule("late", "b", 20), rule("early", "a", 10)]).unwrap();
        let names: Vec<&str> = compiled.rules.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["early", "late"]);
    }

    #[test]
    fn skips_disabled_rules() {
        let mut disabled = rule("off", "x", 1);
        disabled.enabled = Some(false);
        let compiled = compile_rules(vec![disabled, rule("on", "y", 2)]).unwrap();
        assert_eq!(compiled.rules.len(), 1);
        assert_eq!(compiled.rules[0].name, "on");
    }

    #[test]
    fn rejects_overlong_pattern() {
        let long = "a".repeat(MAX_PATTERN_LENGTH + 1);
        let err = compile_rules(vec![rule("long", &long, 1)]).unwrap_err();
        assert!(err.to_string().contains("exceeds maximum allowed"));
    }

    #[test]
    fn cache_returns_shared_instance() {
        let config = RedactionConfig {
            rules: vec![rule("cache_probe", "probe-[0-9]+", 1)],
            ..Default::default()
        };
        let first = get_or_compile_rules(&config).unwrap();
        let second = get_or_compile_rules(&config).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }
}
