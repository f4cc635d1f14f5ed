// litevault/src/main.rs
//! litevault entry point.

use anyhow::{Context, Result};
use clap::Parser;
use log::{info, LevelFilter};
use std::process::ExitCode;

use litevault::cli::{Cli, Commands};
use litevault::commands::{self, error_msg};
use litevault::logger;
use litevault::ui::theme::{build_theme_map, ThemeMap, ThemeStyle};

fn main() -> ExitCode {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    let level = if cli.quiet {
        Some(LevelFilter::Off)
    } else if cli.debug {
        Some(LevelFilter::Debug)
    } else {
        None
    };
    logger::init_logger(level);
    info!("litevault started. Version: {}", env!("CARGO_PKG_VERSION"));

    let theme_map = match build_theme_map(cli.theme.as_deref()).context("Theme error") {
        Ok(theme) => theme,
        Err(e) => {
            let fallback = ThemeStyle::default_theme_map();
            error_msg(format!("{:#}", e), &fallback);
            return ExitCode::FAILURE;
        }
    };

    match run(cli, &theme_map) {
        Ok(code) => code,
        Err(e) => {
            error_msg(format!("{:#}", e), &theme_map);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli, theme_map: &ThemeMap) -> Result<ExitCode> {
    let quiet = cli.quiet;
    match cli.command {
        Commands::Redact(cmd) => commands::redact::run(cmd, theme_map, quiet)?,
        Commands::Scan(cmd) => {
            if commands::scan::run(cmd, theme_map)? {
                return Ok(ExitCode::FAILURE);
            }
        }
        Commands::Attrs(cmd) => commands::attrs::run(cmd)?,
        Commands::Token(cmd) => {
            if commands::token::run(cmd, theme_map, quiet)? {
                return Ok(ExitCode::FAILURE);
            }
        }
        Commands::Session(cmd) => commands::session::run(cmd, theme_map, quiet)?,
        Commands::Rules(cmd) => commands::rules::run(cmd)?,
    }
    Ok(ExitCode::SUCCESS)
}
