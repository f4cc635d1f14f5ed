// litevault-core/src/redactor.rs

//! `redactor.rs`
//! The infallible redaction facade used by log pipelines.
//!
//! `Redactor` wraps a `RegexEngine` and exposes the three shapes a log call
//! carries: free text, key/value attributes and an accompanying error. None
//! of its methods return an error; a fault inside the pattern pipeline makes
//! it replace the whole input instead of passing it through.

use anyhow::Result;
use log::{debug, warn};
use std::error::Error as StdError;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};

use crate::config::{AttributePolicy, RedactionConfig, RedactionSummaryItem, SensitiveKeyClass};
use crate::engines::regex_engine::{is_masked_email, is_placeholder, RegexEngine};
use crate::logging::LogRecord;
use crate::redaction_match::{summarize_matches, RedactionMatch};

/// Placeholder for code-like attribute values.
pub const CODE_PLACEHOLDER: &str = "[REDACTED_CODE]";
/// Placeholder for secrets no text rule recognised.
pub const SECRET_PLACEHOLDER: &str = "[REDACTED]";

/// Length-preserving placeholder for user-authored text.
pub fn raw_text_placeholder(value: &str) -> String {
    format!("[REDACTED_TEXT len={}]", value.chars().count())
}

/// What the fail-safe path emits in place of the whole input.
fn fail_safe_placeholder(value: &str) -> String {
    format!("[REDACTED len={}]", value.chars().count())
}

/// Runs `f`, replacing the whole of `message` if it panics.
fn guarded<F>(message: &str, f: F) -> (String, Vec<RedactionMatch>)
where
    F: FnOnce() -> (String, Vec<RedactionMatch>),
{
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(outcome) => outcome,
        Err(_) => {
            warn!("Redaction pipeline failed; replacing the whole message.");
            (fail_safe_placeholder(message), Vec::new())
        }
    }
}

/// An error reduced to its redacted message.
///
/// The original type, source chain and backtrace are dropped entirely.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedactedError {
    message: String,
}

impl RedactedError {
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for RedactedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl StdError for RedactedError {}

#[derive(Debug)]
pub struct Redactor {
    engine: Option<RegexEngine>,
    attributes: AttributePolicy,
}

impl Redactor {
    /// Builds a redactor from a validated configuration.
    ///
    /// A config with `enabled: false` yields a pass-through redactor.
    pub fn new(config: RedactionConfig) -> Result<Self> {
        let attributes = config.attribute_policy();
        if !config.enabled {
            debug!("Redaction disabled by configuration.");
            return Ok(Self { engine: None, attributes });
        }
        let engine = RegexEngine::new(config)?;
        Ok(Self {
            engine: Some(engine),
            attributes,
        })
    }

    /// Builds a redactor over the embedded default rules.
    pub fn default_rules() -> Result<Self> {
        Self::new(RedactionConfig::load_default_rules()?)
    }

    /// A redactor that returns everything unchanged.
    pub fn disabled() -> Self {
        Self {
            engine: None,
            attributes: AttributePolicy::default(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.engine.is_some()
    }

    pub fn engine(&self) -> Option<&RegexEngine> {
        self.engine.as_ref()
    }

    /// Redacts free text.
    pub fn redact(&self, message: &str) -> String {
        self.redact_matches(message, "redactor").0
    }

    /// Redacts free text and reports per-rule counts.
    ///
    /// Goes through the same fail-safe as `redact`; a failed run reports no
    /// matches.
    pub fn redact_with_summary(&self, message: &str, source_id: &str) -> (String, Vec<RedactionSummaryItem>) {
        let (redacted, matches) = self.redact_matches(message, source_id);
        (redacted, summarize_matches(&matches))
    }

    fn redact_matches(&self, message: &str, source_id: &str) -> (String, Vec<RedactionMatch>) {
        match &self.engine {
            Some(engine) => guarded(message, || engine.redact_with_matches(message, source_id)),
            None => (message.to_string(), Vec::new()),
        }
    }

    /// Redacts a key/value map, returning the same shape.
    ///
    /// Keys in the attribute policy are redacted wholesale; every other
    /// value still goes through the text rules.
    pub fn redact_attributes<I, K, V, M>(&self, attributes: I) -> M
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
        M: FromIterator<(String, String)>,
    {
        attributes
            .into_iter()
            .map(|(key, value)| {
                let key = key.as_ref();
                let value = self.redact_attribute(key, value.as_ref());
                (key.to_string(), value)
            })
            .collect()
    }

    /// Redacts a single attribute value in the context of its key.
    ///
    /// A secret value comes back as a single placeholder or a masked email,
    /// never as a partially rewritten string.
    pub fn redact_attribute(&self, key: &str, value: &str) -> String {
        if !self.is_enabled() {
            return value.to_string();
        }
        match self.attributes.classify(key) {
            Some(_) if is_placeholder(value) => value.to_string(),
            Some(SensitiveKeyClass::RawText) => raw_text_placeholder(value),
            Some(SensitiveKeyClass::Code) => CODE_PLACEHOLDER.to_string(),
            Some(SensitiveKeyClass::Secret) => {
                let redacted = self.redact(value);
                if is_placeholder(&redacted) || is_masked_email(&redacted) {
                    redacted
                } else {
                    SECRET_PLACEHOLDER.to_string()
                }
            }
            None => self.redact(value),
        }
    }

    /// Keeps only the redacted message of `error`.
    pub fn redact_error(&self, error: &dyn StdError) -> RedactedError {
        RedactedError {
            message: self.redact(&error.to_string()),
        }
    }

    /// Redacts every part of a log record.
    pub fn redact_record(&self, record: LogRecord) -> LogRecord {
        LogRecord {
            level: record.level,
            tag: record.tag,
            message: self.redact(&record.message),
            attributes: self.redact_attributes(&record.attributes),
            error: record.error.map(|e| self.redact(&e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::{BTreeMap, HashMap};

    fn redactor() -> Redactor {
        Redactor::default_rules().unwrap()
    }

    #[test]
    fn header_rule_consumes_bearer_line() {
        assert_eq!(redactor().redact("Authorization: Bearer abc.def.ghi"), "Authorization: [REDACTED]");
    }

    #[test]
    fn raw_text_json_keeps_length() {
        assert_eq!(
            redactor().redact(r#"{"raw_text": "hello world"}"#),
            r#"{"raw_text": "[REDACTED_TEXT len=11]"}"#
        );
    }

    #[test]
    fn email_keeps_first_char_and_domain() {
        let out = redactor().redact("contact me at jane.doe@example.com");
        assert_eq!(out, "contact me at j***@example.com");
    }

    #[test]
    fn attributes_code_key_gets_code_placeholder() {
        let mut attrs = HashMap::new();
        attrs.insert("code".to_string(), "123456".to_string());
        attrs.insert("other".to_string(), "fine".to_string());
        let out: HashMap<String, String> = redactor().redact_attributes(&attrs);
        assert_eq!(out["code"], "[REDACTED_CODE]");
        assert_eq!(out["other"], "fine");
    }

    #[test]
    fn attributes_raw_text_and_secrets() {
        let mut attrs = BTreeMap::new();
        attrs.insert("Raw_Text", "buy milk");
        attrs.insert("token", "opaque-session-value");
        attrs.insert("email", "jane@example.com");
        attrs.insert("note", "call pin: 1234 later");
        let out: BTreeMap<String, String> = redactor().redact_attributes(attrs);
        assert_eq!(out["Raw_Text"], "[REDACTED_TEXT len=8]");
        assert_eq!(out["token"], "[REDACTED]");
        assert_eq!(out["email"], "j***@example.com");
        assert_eq!(out["note"], "call pin=[REDACTED_CODE] later");
    }

    #[test]
    fn attributes_are_idempotent() {
        let r = redactor();
        let mut attrs = BTreeMap::new();
        attrs.insert("raw_text".to_string(), "some words".to_string());
        attrs.insert("otp".to_string(), "998877".to_string());
        attrs.insert("identifier".to_string(), "+15550001111".to_string());
        let once: BTreeMap<String, String> = r.redact_attributes(&attrs);
        let twice: BTreeMap<String, String> = r.redact_attributes(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn raw_text_starting_with_placeholder_is_still_redacted() {
        let out = redactor().redact(r#"{"raw_text": "[REDACTED] my diary: I love Sam"}"#);
        assert_eq!(out, r#"{"raw_text": "[REDACTED_TEXT len=31]"}"#);
        assert!(!out.contains("Sam"));
    }

    #[test]
    fn sensitive_attributes_starting_with_placeholder_are_still_redacted() {
        let mut attrs = BTreeMap::new();
        attrs.insert("token", "[REDACTED]sk_live_abcdef");
        attrs.insert("raw_text", "[REDACTED_TEXT private note");
        attrs.insert("otp", "[REDACTED]42");
        let out: BTreeMap<String, String> = redactor().redact_attributes(attrs);
        assert_eq!(out["token"], "[REDACTED]");
        assert_eq!(out["raw_text"], "[REDACTED_TEXT len=27]");
        assert_eq!(out["otp"], "[REDACTED_CODE]");
    }

    #[test]
    fn secret_attributes_collapse_to_one_placeholder() {
        let r = redactor();
        assert_eq!(r.redact_attribute("authorization", "Bearer abc.def.ghi"), "[REDACTED]");
        assert_eq!(r.redact_attribute("token", "abc.def.ghi"), "[REDACTED_JWT]");
        assert_eq!(r.redact_attribute("email", "j***@example.com"), "j***@example.com");
    }

    #[test]
    fn panicking_pipeline_replaces_whole_message() {
        let secret = "Authorization: hunter2";
        let (out, matches) = guarded(secret, || -> (String, Vec<RedactionMatch>) { panic!("pattern engine fault") });
        assert_eq!(out, "[REDACTED len=22]");
        assert!(!out.contains("hunter2"));
        assert!(matches.is_empty());
    }

    #[test]
    fn guarded_passes_through_successful_runs() {
        let (out, _) = guarded("ignored", || ("done".to_string(), Vec::new()));
        assert_eq!(out, "done");
    }

    #[test]
    fn summary_counts_rules_that_fired() {
        let (out, summary) = redactor().redact_with_summary("otp=123456 mail a@b.io", "test");
        assert_eq!(out, "otp=[REDACTED_CODE] mail a***@b.io");
        let names: Vec<&str> = summary.iter().map(|s| s.rule_name.as_str()).collect();
        assert_eq!(names, vec!["otp_code", "email"]);
    }

    #[test]
    fn error_keeps_only_redacted_message() {
        let err = std::io::Error::new(std::io::ErrorKind::Other, "refresh failed for jane@example.com");
        let redacted = redactor().redact_error(&err);
        assert_eq!(redacted.to_string(), "refresh failed for j***@example.com");
        assert!(redacted.source().is_none());
    }

    #[test]
    fn disabled_redactor_passes_through() {
        let r = Redactor::disabled();
        assert!(!r.is_enabled());
        assert_eq!(r.redact("Authorization: secret"), "Authorization: secret");
        assert_eq!(r.redact_attribute("code", "123456"), "123456");
    }

    #[test]
    fn config_can_disable_redaction() {
        let mut config = RedactionConfig::load_default_rules().unwrap();
        config.enabled = false;
        let r = Redactor::new(config).unwrap();
        assert_eq!(r.redact("otp=123456"), "otp=123456");
    }
}
