// litevault/src/commands/mod.rs
//! Subcommand implementations and the helpers they share.

pub mod attrs;
pub mod redact;
pub mod rules;
pub mod scan;
pub mod session;
pub mod token;

use anyhow::{Context, Result};
use is_terminal::IsTerminal;
use log::{debug, info};
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use litevault_core::{merge_rules, FileSessionStore, RedactionConfig, Redactor};

use crate::cli::RuleArgs;
use crate::ui::output_format;
use crate::ui::theme::ThemeMap;

const USER_RULES_FILE: &str = "rules.yaml";

/// Helper for printing info messages to stderr.
pub fn info_msg(msg: impl AsRef<str>, theme: &ThemeMap) {
    let stderr_supports_color = io::stderr().is_terminal();
    let _ = output_format::print_info_message(&mut io::stderr(), msg.as_ref(), theme, stderr_supports_color);
}

/// Helper for printing error messages to stderr.
pub fn error_msg(msg: impl AsRef<str>, theme: &ThemeMap) {
    let stderr_supports_color = io::stderr().is_terminal();
    let _ = output_format::print_error_message(&mut io::stderr(), msg.as_ref(), theme, stderr_supports_color);
}

/// Helper for printing warning messages to stderr.
pub fn warn_msg(msg: impl AsRef<str>, theme: &ThemeMap) {
    let stderr_supports_color = io::stderr().is_terminal();
    let _ = output_format::print_warn_message(&mut io::stderr(), msg.as_ref(), theme, stderr_supports_color);
}

/// `<config dir>/litevault/rules.yaml`, if the platform has a config dir.
pub fn user_rules_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("litevault").join(USER_RULES_FILE))
}

/// Default rules merged with `--config` (or the user rules file when it
/// exists), then filtered by `--enable` / `--disable`.
pub fn load_config(args: &RuleArgs) -> Result<RedactionConfig> {
    let defaults = RedactionConfig::load_default_rules()?;

    let user_path = match &args.config {
        Some(path) => Some(path.clone()),
        None => user_rules_path().filter(|p| p.is_file()),
    };
    let user_config = match user_path {
        Some(path) => {
            info!("Merging rules from {}", path.display());
            Some(
                RedactionConfig::load_from_file(&path)
                    .with_context(|| format!("Failed to load rules from {}", path.display()))?,
            )
        }
        None => None,
    };

    let mut config = merge_rules(defaults, user_config);
    config.set_active_rules(&args.enable, &args.disable);
    debug!("{} rules active after filtering.", config.rules.len());
    Ok(config)
}

/// A `Redactor` over [`load_config`].
pub fn build_redactor(args: &RuleArgs) -> Result<Redactor> {
    Redactor::new(load_config(args)?).context("Failed to compile redaction rules")
}

/// Reads the whole of `path`, or stdin when `path` is `None`.
pub fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) => {
            info!("Reading input from file: {}", path.display());
            fs::read_to_string(path).with_context(|| format!("Failed to read input file {}", path.display()))
        }
        None => {
            info!("Reading input from stdin...");
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .context("Failed to read from stdin")?;
            Ok(buffer)
        }
    }
}

/// The session store at `path`, or at its default location.
pub fn open_store(path: Option<&Path>) -> Result<FileSessionStore> {
    let path = match path {
        Some(path) => path.to_path_buf(),
        None => FileSessionStore::default_path()?,
    };
    debug!("Using session store {}", path.display());
    Ok(FileSessionStore::new(path))
}
