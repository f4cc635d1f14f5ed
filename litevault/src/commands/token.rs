// litevault/src/commands/token.rs
//! `litevault token check`.

use anyhow::Result;
use chrono::{DateTime, Utc};
use is_terminal::IsTerminal;
use std::io::{self, Write};

use litevault_core::{decode_claims, is_about_to_expire, SessionStore};

use crate::cli::TokenCommand;
use crate::commands::{info_msg, open_store, read_input, warn_msg};
use crate::ui::output_format::write_styled;
use crate::ui::theme::{ThemeEntry, ThemeMap};

pub const EXPIRING: &str = "expiring";
pub const VALID: &str = "valid";

/// Returns true when the token is expiring.
pub fn run(cmd: TokenCommand, theme_map: &ThemeMap, quiet: bool) -> Result<bool> {
    let TokenCommand::Check {
        token,
        buffer,
        from_session,
        store,
    } = cmd;

    let token = if from_session {
        open_store(store.as_deref())?.session()?
    } else {
        match token {
            Some(token) => Some(token),
            None => Some(read_input(None)?.trim().to_string()),
        }
    };

    let expiring = is_about_to_expire(token.as_deref(), buffer);
    if !quiet {
        describe_expiry(token.as_deref(), theme_map);
    }
    print_status(expiring, theme_map)?;
    Ok(expiring)
}

/// Prints `expiring` or `valid` to stdout.
pub fn print_status(expiring: bool, theme_map: &ThemeMap) -> Result<()> {
    let stdout = io::stdout();
    let supports_color = stdout.is_terminal();
    let mut writer = stdout.lock();
    let (text, entry) = if expiring {
        (EXPIRING, ThemeEntry::TokenExpiring)
    } else {
        (VALID, ThemeEntry::TokenValid)
    };
    write_styled(&mut writer, text, entry, theme_map, supports_color)?;
    writeln!(writer)?;
    Ok(())
}

/// Explains the verdict on stderr without revealing the token.
pub fn describe_expiry(token: Option<&str>, theme_map: &ThemeMap) {
    let Some(token) = token.filter(|t| !t.trim().is_empty()) else {
        warn_msg("No token available.", theme_map);
        return;
    };
    match decode_claims(token) {
        Ok(claims) => match DateTime::<Utc>::from_timestamp(claims.exp, 0) {
            Some(at) => info_msg(format!("Token expires at {}", at.to_rfc3339()), theme_map),
            None => warn_msg(format!("Token expiry {} is out of range.", claims.exp), theme_map),
        },
        Err(e) => warn_msg(format!("Token could not be read: {}", e), theme_map),
    }
}
