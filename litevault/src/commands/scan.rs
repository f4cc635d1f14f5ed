// litevault/src/commands/scan.rs
//! `litevault scan`: report what the rules would redact without printing
//! any of the content.

use anyhow::{Context, Result};
use is_terminal::IsTerminal;
use log::info;
use serde::Serialize;
use std::io::{self, Write};

use litevault_core::RedactionSummaryItem;

use crate::cli::ScanCommand;
use crate::commands::{build_redactor, error_msg, read_input};
use crate::ui::redaction_summary::{print_summary, total_occurrences};
use crate::ui::theme::ThemeMap;

/// JSON shape written by `--json-stdout`.
#[derive(Debug, Serialize)]
pub struct ScanReport {
    pub total_occurrences: usize,
    pub rules: Vec<RedactionSummaryItem>,
}

/// Runs the scan and returns whether the threshold (if any) was exceeded.
pub fn run(cmd: ScanCommand, theme_map: &ThemeMap) -> Result<bool> {
    let redactor = build_redactor(&cmd.rules)?;
    let input = read_input(cmd.input_file.as_deref())?;

    let (_, summary) = redactor.redact_with_summary(&input, "cli-scan");
    let total = total_occurrences(&summary);
    info!("Scan found {} matches across {} rules.", total, summary.len());

    if cmd.json_stdout {
        let report = ScanReport {
            total_occurrences: total,
            rules: summary,
        };
        let mut stdout = io::stdout().lock();
        serde_json::to_writer_pretty(&mut stdout, &report).context("Failed to write JSON report")?;
        writeln!(stdout)?;
    } else {
        let supports_color = io::stderr().is_terminal();
        print_summary(&summary, &mut io::stderr(), theme_map, supports_color)?;
    }

    match cmd.fail_over_threshold {
        Some(threshold) if total > threshold => {
            error_msg(
                format!("{} matches exceed the threshold of {}.", total, threshold),
                theme_map,
            );
            Ok(true)
        }
        _ => Ok(false),
    }
}
