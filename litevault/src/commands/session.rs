// litevault/src/commands/session.rs
//! `litevault session save | show | clear` over the file session store.

use anyhow::Result;
use is_terminal::IsTerminal;
use std::io::{self, Write};

use litevault_core::{is_about_to_expire, Redactor, SessionStore};

use crate::cli::SessionCommand;
use crate::commands::token::{describe_expiry, EXPIRING, VALID};
use crate::commands::{info_msg, open_store};
use crate::ui::output_format::write_styled;
use crate::ui::theme::{ThemeEntry, ThemeMap};

const NO_SESSION: &str = "(none)";

pub fn run(cmd: SessionCommand, theme_map: &ThemeMap, quiet: bool) -> Result<()> {
    match cmd {
        SessionCommand::Save { token, store } => {
            let store = open_store(store.as_deref())?;
            store.save_session(token.trim())?;
            if !quiet {
                info_msg(format!("Session saved to {}", store.path().display()), theme_map);
            }
        }
        SessionCommand::Show { store, buffer } => {
            let store = open_store(store.as_deref())?;
            let data = store.load()?;
            let redactor = Redactor::default_rules()?;
            let token_line = match data.session_token.as_deref() {
                Some(token) => redactor.redact_attribute("token", token),
                None => NO_SESSION.to_string(),
            };
            let expiring = is_about_to_expire(data.session_token.as_deref(), buffer);

            let stdout = io::stdout();
            let supports_color = stdout.is_terminal();
            let mut out = stdout.lock();
            writeln!(out, "signed_in: {}", data.is_signed_in)?;
            write!(out, "token: ")?;
            write_styled(&mut out, &token_line, ThemeEntry::RedactedText, theme_map, supports_color)?;
            writeln!(out)?;
            write!(out, "status: ")?;
            let (status, entry) = if expiring {
                (EXPIRING, ThemeEntry::TokenExpiring)
            } else {
                (VALID, ThemeEntry::TokenValid)
            };
            write_styled(&mut out, status, entry, theme_map, supports_color)?;
            writeln!(out)?;
            drop(out);

            if !quiet && data.session_token.is_some() {
                describe_expiry(data.session_token.as_deref(), theme_map);
            }
        }
        SessionCommand::Clear { store } => {
            let store = open_store(store.as_deref())?;
            store.clear_session()?;
            if !quiet {
                info_msg("Session cleared.", theme_map);
            }
        }
    }
    Ok(())
}
