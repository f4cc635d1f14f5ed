//! Configuration management for `litevault-core`.
//!
//! This module defines the core data structures for redaction rules and the
//! attribute key policy. It handles serialization/deserialization of YAML
//! configurations and provides utilities for loading, merging, and validating
//! these configs.
//!
//! License: MIT OR Apache-2.0

use anyhow::{anyhow, Context, Result};
use log::{debug, info, warn};
use regex::RegexBuilder;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::Path;

/// Maximum allowed length for a regex pattern string.
pub const MAX_PATTERN_LENGTH: usize = 500;

/// Name of the capture group whose length a length-preserving rule reports.
pub const VALUE_GROUP: &str = "value";

/// Token in `replace_with` that expands to the measured length of the value group.
pub const LEN_TOKEN: &str = "{len}";

/// How a rule turns a match into its replacement.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplacementStrategy {
    /// `replace_with` is a template; `$1` / `${name}` expand to capture groups.
    #[default]
    Literal,
    /// Like `Literal`, and `{len}` expands to the character length of the
    /// `value` capture so the log keeps the size of what was removed.
    LengthPreserving,
}

/// Represents a single redaction rule.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(default)]
pub struct RedactionRule {
    /// Unique identifier for the rule (e.g., "bearer_token").
    pub name: String,
    /// Human-readable description of what the rule targets.
    pub description: Option<String>,
    /// The regex pattern string.
    pub pattern: Option<String>,
    pub replacement: ReplacementStrategy,
    /// The replacement template.
    pub replace_with: String,
    /// Position in the pipeline. Lower values run first.
    pub order: u32,
    pub case_insensitive: bool,
    /// If true, enables multiline mode for the regex engine.
    pub multiline: bool,
    /// If true, the dot character `.` in regex will match newlines.
    pub dot_matches_new_line: bool,
    /// If true, the rule is disabled unless explicitly enabled.
    pub opt_in: bool,
    /// Explicit override for enabling/disabling the rule.
    pub enabled: Option<bool>,
    pub severity: Option<String>,
    pub tags: Option<Vec<String>>,
}

impl Default for RedactionRule {
    fn default() -> Self {
        Self {
            name: String::new(),
            description: None,
            pattern: None,
            replacement: ReplacementStrategy::Literal,
            replace_with: "[REDACTED]".to_string(),
            order: 1000,
            case_insensitive: false,
            multiline: false,
            dot_matches_new_line: false,
            opt_in: false,
            enabled: None,
            severity: None,
            tags: None,
        }
    }
}

/// Category a sensitive attribute key falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensitiveKeyClass {
    /// User-authored text; replaced with a length-preserving placeholder.
    RawText,
    /// One-time codes; replaced with `[REDACTED_CODE]`.
    Code,
    /// Credentials and identifiers; run through the text rules, then
    /// replaced wholesale if no rule fired.
    Secret,
}

/// Allow-lists of attribute keys whose values are always redacted.
///
/// Keys are compared case-insensitively.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(default)]
pub struct AttributePolicy {
    pub raw_text_keys: Vec<String>,
    pub code_keys: Vec<String>,
    pub secret_keys: Vec<String>,
}

impl Default for AttributePolicy {
    fn default() -> Self {
        let owned = |keys: &[&str]| keys.iter().map(|k| k.to_string()).collect();
        Self {
            raw_text_keys: owned(&["raw_text", "raw-text", "rawtext"]),
            code_keys: owned(&["code", "otp", "verification_code", "verificationcode"]),
            secret_keys: owned(&["token", "authorization", "cookie", "email", "identifier"]),
        }
    }
}

impl AttributePolicy {
    /// Returns the class of `key`, or `None` when the key is not sensitive.
    pub fn classify(&self, key: &str) -> Option<SensitiveKeyClass> {
        let key = key.to_lowercase();
        let contains = |keys: &[String]| keys.iter().any(|k| k.eq_ignore_ascii_case(&key));
        if contains(&self.raw_text_keys) {
            Some(SensitiveKeyClass::RawText)
        } else if contains(&self.code_keys) {
            Some(SensitiveKeyClass::Code)
        } else if contains(&self.secret_keys) {
            Some(SensitiveKeyClass::Secret)
        } else {
            None
        }
    }
}

fn default_enabled() -> bool {
    true
}

/// Represents the top-level redaction configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RedactionConfig {
    /// The ordered list of text rules.
    #[serde(default)]
    pub rules: Vec<RedactionRule>,
    /// Attribute key policy. `None` means the built-in allow-lists.
    #[serde(default)]
    pub attributes: Option<AttributePolicy>,
    /// When false the redactor passes everything through untouched.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

impl Default for RedactionConfig {
    fn default() -> Self {
        Self {
            rules: Vec::new(),
            attributes: None,
            enabled: true,
        }
    }
}

/// Per-rule outcome of a redaction pass.
///
/// Matched text is never kept; `sample_hashes` identify matches without
/// revealing them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedactionSummaryItem {
    pub rule_name: String,
    pub occurrences: usize,
    pub sample_hashes: Vec<String>,
}

impl RedactionConfig {
    /// Loads redaction rules from a YAML file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading custom rules from: {}", path.display());
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: RedactionConfig = serde_yml::from_str(&text)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;

        validate_rules(&config.rules)?;
        info!("Loaded {} rules from file {}.", config.rules.len(), path.display());

        Ok(config)
    }

    /// Loads default redaction rules from the embedded configuration.
    pub fn load_default_rules() -> Result<Self> {
        debug!("Loading default rules from embedded string...");
        let default_yaml = include_str!("../config/default_rules.yaml");
        let config: RedactionConfig =
            serde_yml::from_str(default_yaml).context("Failed to parse default rules")?;

        debug!("Loaded {} default rules.", config.rules.len());
        Ok(config)
    }

    /// The attribute policy in effect.
    pub fn attribute_policy(&self) -> AttributePolicy {
        self.attributes.clone().unwrap_or_default()
    }

    /// Rules in pipeline order: by `order`, then by name.
    pub fn ordered_rules(&self) -> Vec<&RedactionRule> {
        let mut rules: Vec<&RedactionRule> = self.rules.iter().collect();
        rules.sort_by(|a, b| a.order.cmp(&b.order).then_with(|| a.name.cmp(&b.name)));
        rules
    }

    /// Filters active rules based on enable/disable lists provided via CLI.
    pub fn set_active_rules(&mut self, enable_rules: &[String], disable_rules: &[String]) {
        let enable_set: HashSet<&str> = enable_rules.iter().map(String::as_str).collect();
        let disable_set: HashSet<&str> = disable_rules.iter().map(String::as_str).collect();

        debug!("Initial rules count before filtering: {}", self.rules.len());

        let all_rule_names: HashSet<&str> = self.rules.iter().map(|r| r.name.as_str()).collect();

        for rule_name in enable_set.difference(&all_rule_names) {
            warn!("Rule '{}' in `enable_rules` list does not exist.", rule_name);
        }

        for rule_name in disable_set.difference(&all_rule_names) {
            warn!("Rule '{}' in `disable_rules` list does not exist.", rule_name);
        }

        self.rules.retain(|rule| {
            let rule_name_str = rule.name.as_str();
            !disable_set.contains(rule_name_str)
                && (!rule.opt_in || enable_set.contains(rule_name_str))
        });

        debug!("Final active rules count after filtering: {}", self.rules.len());
    }
}

/// Merges user-defined rules and the attribute policy with defaults.
///
/// User rules replace default rules of the same name. A user attribute
/// policy replaces the default one wholesale, and a user config can switch
/// redaction off but never back on once the defaults disabled it.
pub fn merge_rules(
    default_config: RedactionConfig,
    user_config: Option<RedactionConfig>,
) -> RedactionConfig {
    debug!("merge_rules called. Initial default rules count: {}", default_config.rules.len());

    let mut final_rules_map: HashMap<String, RedactionRule> = default_config
        .rules
        .into_iter()
        .map(|rule| (rule.name.clone(), rule))
        .collect();

    let mut attributes = default_config.attributes;
    let mut enabled = default_config.enabled;

    if let Some(user_cfg) = user_config {
        debug!("User config provided. Merging {} user rules.", user_cfg.rules.len());
        for user_rule in user_cfg.rules {
            final_rules_map.insert(user_rule.name.clone(), user_rule);
        }

        if let Some(user_attributes) = user_cfg.attributes {
            debug!("Overriding attribute policy with user value.");
            attributes = Some(user_attributes);
        }

        enabled = enabled && user_cfg.enabled;
    }

    let mut final_rules: Vec<RedactionRule> = final_rules_map.into_values().collect();
    final_rules.sort_by(|a, b| a.order.cmp(&b.order).then_with(|| a.name.cmp(&b.name)));
    debug!("Final total rules after merge: {}", final_rules.len());

    RedactionConfig {
        rules: final_rules,
        attributes,
        enabled,
    }
}

/// Validates rule integrity (regex compilation, capture group references).
pub fn validate_rules(rules: &[RedactionRule]) -> Result<()> {
    let mut rule_names = HashSet::new();
    let mut errors = Vec::new();

    for rule in rules {
        if rule.name.is_empty() {
            errors.push("A rule has an empty `name` field.".to_string());
        } else if !rule_names.insert(rule.name.clone()) {
            errors.push(format!("Duplicate rule name found: '{}'.", rule.name));
        }

        let pattern = match &rule.pattern {
            Some(p) => p,
            None => {
                errors.push(format!("Rule '{}' is missing the `pattern` field.", rule.name));
                continue;
            }
        };

        if pattern.is_empty() {
            errors.push(format!("Rule '{}' has an empty `pattern` field.", rule.name));
            continue;
        }

        if pattern.len() > MAX_PATTERN_LENGTH {
            errors.push(format!(
                "Rule '{}': pattern length ({}) exceeds maximum allowed ({}).",
                rule.name,
                pattern.len(),
                MAX_PATTERN_LENGTH
            ));
            continue;
        }

        let regex = match RegexBuilder::new(pattern)
            .case_insensitive(rule.case_insensitive)
            .build()
        {
            Ok(regex) => regex,
            Err(e) => {
                errors.push(format!("Rule '{}' has an invalid regex pattern: {}", rule.name, e));
                continue;
            }
        };

        let group_names: HashSet<&str> = regex.capture_names().flatten().collect();

        if rule.replacement == ReplacementStrategy::LengthPreserving
            && !group_names.contains(VALUE_GROUP)
        {
            errors.push(format!(
                "Rule '{}': length-preserving rules need a `(?P<{}>...)` group.",
                rule.name, VALUE_GROUP
            ));
        }

        for reference in template_references(&rule.replace_with) {
            let known = match reference.parse::<usize>() {
                Ok(index) => index < regex.captures_len(),
                Err(_) => group_names.contains(reference.as_str()),
            };
            if !known {
                errors.push(format!(
                    "Rule '{}': replacement references non-existent capture group '{}'.",
                    rule.name, reference
                ));
            }
        }
    }

    if !errors.is_empty() {
        Err(anyhow!("Rule validation failed:\n{}", errors.join("\n")))
    } else {
        Ok(())
    }
}

/// Extracts `$n`, `$name` and `${name}` references from a replacement template.
fn template_references(template: &str) -> Vec<String> {
    let mut refs = Vec::new();
    let mut rest = template;
    while let Some(pos) = rest.find('$') {
        rest = &rest[pos + 1..];
        if let Some(stripped) = rest.strip_prefix('$') {
            rest = stripped;
            continue;
        }
        if let Some(braced) = rest.strip_prefix('{') {
            if let Some(end) = braced.find('}') {
                refs.push(braced[..end].to_string());
                rest = &braced[end + 1..];
            }
            continue;
        }
        let len = rest
            .char_indices()
            .find(|(_, c)| !(c.is_ascii_alphanumeric() || *c == '_'))
            .map(|(i, _)| i)
            .unwrap_or(rest.len());
        if len > 0 {
            refs.push(rest[..len].to_string());
        }
        rest = &rest[len..];
    }
    refs
}
