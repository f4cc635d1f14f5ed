// litevault/src/commands/redact.rs
//! `litevault redact`: run the redaction rules over a file or stdin.

use anyhow::{bail, Context, Result};
use is_terminal::IsTerminal;
use log::{debug, info};
use std::fs;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use litevault_core::{RedactionSummaryItem, Redactor};

use crate::cli::RedactCommand;
use crate::commands::{build_redactor, info_msg, read_input};
use crate::ui::diff_viewer;
use crate::ui::redaction_summary::{self, merge_summaries};
use crate::ui::theme::ThemeMap;

pub const LINE_BUFFERED_CONFLICT: &str = "--line-buffered is incompatible with --diff and --input-file.";

/// Options for a single `redact` run.
pub struct RedactOptions {
    pub diff: bool,
    pub output_path: Option<PathBuf>,
    pub no_redaction_summary: bool,
    pub quiet: bool,
}

pub fn run(cmd: RedactCommand, theme_map: &ThemeMap, quiet: bool) -> Result<()> {
    if cmd.line_buffered && (cmd.diff || cmd.input_file.is_some()) {
        bail!(LINE_BUFFERED_CONFLICT);
    }

    let redactor = build_redactor(&cmd.rules)?;
    let opts = RedactOptions {
        diff: cmd.diff,
        output_path: cmd.output.clone(),
        no_redaction_summary: cmd.no_summary,
        quiet,
    };

    if cmd.line_buffered {
        if !quiet {
            info_msg("Using line-buffered mode.", theme_map);
        }
        let stdin = io::stdin();
        return run_line_buffered(&redactor, stdin.lock(), &opts, theme_map);
    }

    let input = read_input(cmd.input_file.as_deref())?;
    run_redact(&redactor, &input, &opts, theme_map)
}

/// Redacts `input` as one document.
pub fn run_redact(redactor: &Redactor, input: &str, opts: &RedactOptions, theme_map: &ThemeMap) -> Result<()> {
    info!("Starting redaction.");
    let (redacted, summary) = redactor.redact_with_summary(input, "cli-input");
    debug!(
        "Content redacted. Original length: {}, redacted length: {}",
        input.len(),
        redacted.len()
    );

    handle_primary_output(input, &redacted, opts, theme_map)?;
    handle_redaction_summary(&summary, opts, theme_map)?;
    info!("Redaction completed.");
    Ok(())
}

/// Redacts each line as it arrives and flushes it immediately.
pub fn run_line_buffered<R: BufRead>(
    redactor: &Redactor,
    reader: R,
    opts: &RedactOptions,
    theme_map: &ThemeMap,
) -> Result<()> {
    let mut writer: Box<dyn Write> = match &opts.output_path {
        Some(path) => Box::new(
            fs::File::create(path).with_context(|| format!("Failed to create output file: {}", path.display()))?,
        ),
        None => Box::new(io::stdout()),
    };

    let mut summary = Vec::new();
    for line in reader.lines() {
        let line = line.context("Failed to read line from stdin")?;
        let (redacted, line_summary) = redactor.redact_with_summary(&line, "cli-input");
        writeln!(writer, "{}", redacted)?;
        writer.flush()?;
        merge_summaries(&mut summary, line_summary);
    }
    handle_redaction_summary(&summary, opts, theme_map)
}

fn handle_primary_output(input: &str, redacted: &str, opts: &RedactOptions, theme_map: &ThemeMap) -> Result<()> {
    if let Some(path) = &opts.output_path {
        if !opts.quiet {
            info_msg(format!("Writing redacted content to file: {}", path.display()), theme_map);
        }
        let mut file = fs::File::create(path)
            .with_context(|| format!("Failed to create output file: {}", path.display()))?;
        if opts.diff {
            diff_viewer::print_diff(input, redacted, &mut file, theme_map, false)?;
        } else {
            write!(file, "{}", redacted)?;
        }
    } else {
        let stdout = io::stdout();
        let supports_color = stdout.is_terminal();
        let mut writer = stdout.lock();
        if opts.diff {
            diff_viewer::print_diff(input, redacted, &mut writer, theme_map, supports_color)?;
        } else {
            write!(writer, "{}", redacted)?;
        }
        writer.flush()?;
    }
    Ok(())
}

fn handle_redaction_summary(summary: &[RedactionSummaryItem], opts: &RedactOptions, theme_map: &ThemeMap) -> Result<()> {
    if !opts.no_redaction_summary && !opts.quiet {
        let stderr_supports_color = io::stderr().is_terminal();
        redaction_summary::print_summary(summary, &mut io::stderr(), theme_map, stderr_supports_color)?;
    }
    Ok(())
}
