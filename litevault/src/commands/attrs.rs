// litevault/src/commands/attrs.rs
//! `litevault attrs`: redact a key/value attribute map.

use anyhow::{anyhow, Context, Result};
use serde_json::Value;
use std::collections::BTreeMap;
use std::io::{self, Write};

use crate::cli::AttrsCommand;
use crate::commands::{build_redactor, read_input};

pub fn run(cmd: AttrsCommand) -> Result<()> {
    let attributes = if cmd.pairs.is_empty() {
        parse_json_object(&read_input(None)?)?
    } else {
        parse_pairs(&cmd.pairs)?
    };

    let redactor = build_redactor(&cmd.rules)?;
    let redacted: BTreeMap<String, String> = redactor.redact_attributes(&attributes);

    let mut stdout = io::stdout().lock();
    if cmd.pretty {
        serde_json::to_writer_pretty(&mut stdout, &redacted)?;
    } else {
        serde_json::to_writer(&mut stdout, &redacted)?;
    }
    writeln!(stdout)?;
    Ok(())
}

/// Splits `KEY=VALUE` arguments on the first `=`.
pub fn parse_pairs(pairs: &[String]) -> Result<BTreeMap<String, String>> {
    pairs
        .iter()
        .map(|pair| {
            pair.split_once('=')
                .map(|(key, value)| (key.to_string(), value.to_string()))
                .ok_or_else(|| anyhow!("Expected KEY=VALUE, got '{}'", pair))
        })
        .collect()
}

/// Reads a flat JSON object. Non-string values are kept as their JSON text.
pub fn parse_json_object(text: &str) -> Result<BTreeMap<String, String>> {
    let value: Value = serde_json::from_str(text.trim()).context("Failed to parse attributes as JSON")?;
    let Value::Object(map) = value else {
        return Err(anyhow!("Expected a JSON object of attributes"));
    };
    Ok(map
        .into_iter()
        .map(|(key, value)| {
            let text = match value {
                Value::String(s) => s,
                other => other.to_string(),
            };
            (key, text)
        })
        .collect())
}
