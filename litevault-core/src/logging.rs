// litevault-core/src/logging.rs
//! A policy-filtered, redacting logger.
//!
//! `RedactingLogger` sits between application code and a `LogSink`. Every
//! record is checked against the `LogPolicy`, redacted, and only then handed
//! to the sink. The default sink forwards to the `log` facade with the
//! record's tag as the log target.
//!
//! License: MIT OR APACHE 2.0

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::error::Error as StdError;
use std::sync::Mutex;

use crate::config::RedactionConfig;
use crate::redactor::Redactor;

/// Target used for analytics-style events.
pub const EVENT_TAG: &str = "Event";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogSeverity {
    Debug,
    Info,
    Warn,
    Error,
}

impl LogSeverity {
    pub fn to_level(self) -> log::Level {
        match self {
            LogSeverity::Debug => log::Level::Debug,
            LogSeverity::Info => log::Level::Info,
            LogSeverity::Warn => log::Level::Warn,
            LogSeverity::Error => log::Level::Error,
        }
    }
}

/// Build-mode logging policy.
///
/// `Debug` lets everything through unredacted; `Release` only lets warnings
/// and errors through and redacts them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogPolicy {
    Debug,
    #[default]
    Release,
}

impl LogPolicy {
    pub fn allows(self, level: LogSeverity) -> bool {
        match self {
            LogPolicy::Debug => true,
            LogPolicy::Release => level >= LogSeverity::Warn,
        }
    }

    pub fn redacts(self) -> bool {
        self == LogPolicy::Release
    }
}

/// A single log call. Built per call and dropped once the sink has it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord {
    pub level: LogSeverity,
    pub tag: String,
    pub message: String,
    pub attributes: BTreeMap<String, String>,
    /// Message of an accompanying error; nothing else about it is kept.
    pub error: Option<String>,
}

impl LogRecord {
    pub fn new(level: LogSeverity, tag: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level,
            tag: tag.into(),
            message: message.into(),
            attributes: BTreeMap::new(),
            error: None,
        }
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    pub fn with_error(mut self, error: Option<&dyn StdError>) -> Self {
        self.error = error.map(|e| e.to_string());
        self
    }

    /// Single-line rendering: message, then sorted attributes, then the error.
    pub fn render(&self) -> String {
        let mut line = self.message.clone();
        for (key, value) in &self.attributes {
            line.push(' ');
            line.push_str(key);
            line.push('=');
            line.push_str(value);
        }
        if let Some(error) = &self.error {
            line.push_str(" error=");
            line.push_str(error);
        }
        line
    }
}

/// Where redacted records end up.
pub trait LogSink: Send + Sync {
    fn emit(&self, record: &LogRecord);
}

/// Forwards records to the `log` facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogCrateSink;

impl LogSink for LogCrateSink {
    fn emit(&self, record: &LogRecord) {
        log::log!(target: record.tag.as_str(), record.level.to_level(), "{}", record.render());
    }
}

/// Keeps records in memory. Used by tests and by the CLI's dry runs.
#[derive(Debug, Default)]
pub struct MemorySink {
    records: Mutex<Vec<LogRecord>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<LogRecord> {
        self.records.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

impl LogSink for MemorySink {
    fn emit(&self, record: &LogRecord) {
        self.records
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(record.clone());
    }
}

pub trait Logger: Send + Sync {
    fn log(&self, record: LogRecord);

    fn event(&self, name: &str, attributes: &BTreeMap<String, String>);

    fn debug(&self, tag: &str, message: &str, error: Option<&dyn StdError>) {
        self.log(LogRecord::new(LogSeverity::Debug, tag, message).with_error(error));
    }

    fn info(&self, tag: &str, message: &str, error: Option<&dyn StdError>) {
        self.log(LogRecord::new(LogSeverity::Info, tag, message).with_error(error));
    }

    fn warn(&self, tag: &str, message: &str, error: Option<&dyn StdError>) {
        self.log(LogRecord::new(LogSeverity::Warn, tag, message).with_error(error));
    }

    fn error(&self, tag: &str, message: &str, error: Option<&dyn StdError>) {
        self.log(LogRecord::new(LogSeverity::Error, tag, message).with_error(error));
    }
}

/// Renders an event payload: `event=<name>` followed by sorted `key=value` pairs.
pub fn format_event(name: &str, attributes: &BTreeMap<String, String>) -> String {
    let mut payload = format!("event={}", name);
    for (key, value) in attributes {
        payload.push(' ');
        payload.push_str(key);
        payload.push('=');
        payload.push_str(value);
    }
    payload
}

pub struct RedactingLogger<S: LogSink = LogCrateSink> {
    policy: LogPolicy,
    redactor: Redactor,
    sink: S,
}

impl RedactingLogger<LogCrateSink> {
    /// Logger over the default rules, redacting only under `Release`.
    pub fn for_policy(policy: LogPolicy) -> Result<Self> {
        let mut config = RedactionConfig::load_default_rules()?;
        config.enabled = config.enabled && policy.redacts();
        Ok(Self::new(policy, Redactor::new(config)?, LogCrateSink))
    }
}

impl<S: LogSink> RedactingLogger<S> {
    pub fn new(policy: LogPolicy, redactor: Redactor, sink: S) -> Self {
        Self { policy, redactor, sink }
    }

    pub fn policy(&self) -> LogPolicy {
        self.policy
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }
}

impl<S: LogSink> Logger for RedactingLogger<S> {
    fn log(&self, record: LogRecord) {
        if !self.policy.allows(record.level) {
            return;
        }
        let safe = self.redactor.redact_record(record);
        self.sink.emit(&safe);
    }

    fn event(&self, name: &str, attributes: &BTreeMap<String, String>) {
        if !self.policy.allows(LogSeverity::Info) {
            return;
        }
        let safe: BTreeMap<String, String> = self.redactor.redact_attributes(attributes);
        let record = LogRecord::new(LogSeverity::Info, EVENT_TAG, format_event(name, &safe));
        self.sink.emit(&record);
    }
}
