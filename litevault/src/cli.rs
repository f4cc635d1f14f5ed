// litevault/src/cli.rs
//! This file defines the command-line interface (CLI) for the litevault
//! application, including all available commands and their arguments.
//! License: MIT OR APACHE 2.0

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use litevault_core::DEFAULT_BUFFER_SECONDS;

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(
    name = "litevault",
    author = "LiteVault Team",
    version = env!("CARGO_PKG_VERSION"),
    about = "Redact client logs and inspect session tokens",
    long_about = "litevault runs the LiteVault client's log redaction rules over text, attribute maps and error messages, and answers whether a compact session token should be refreshed before use.",
    arg_required_else_help = true,
)]
pub struct Cli {
    /// Disable informational messages
    #[arg(long, short = 'q', global = true, help = "Suppress all informational and debug messages.")]
    pub quiet: bool,

    /// Enable debug logging (overrides RUST_LOG)
    #[arg(long, short = 'd', global = true, help = "Enable debug logging.")]
    pub debug: bool,

    /// Specify the path to a custom YAML theme file.
    #[arg(long = "theme", value_name = "FILE", global = true, env = "LITEVAULT_THEME", help = "Specify the path to a custom YAML theme file.")]
    pub theme: Option<PathBuf>,

    /// The subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// All available commands for the `litevault` CLI.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Redacts an input file or stdin.
    #[command(about = "Redacts an input file or stdin, writing the result to stdout or a file.")]
    Redact(RedactCommand),

    /// Reports what the rules would redact without printing the content.
    #[command(about = "Scans an input and reports per-rule match counts without printing content.")]
    Scan(ScanCommand),

    /// Redacts a set of key/value attributes.
    #[command(about = "Redacts KEY=VALUE pairs (or a JSON object on stdin) and prints JSON.")]
    Attrs(AttrsCommand),

    /// Compact-token inspection.
    #[command(subcommand, about = "Inspects compact session tokens.")]
    Token(TokenCommand),

    /// Local session store management.
    #[command(subcommand, about = "Manages the local session store.")]
    Session(SessionCommand),

    /// Rule inspection.
    #[command(subcommand, about = "Lists the redaction rules in effect.")]
    Rules(RulesCommand),
}

/// Rule selection flags shared by `redact`, `scan` and `attrs`.
#[derive(Parser, Debug, Clone, Default)]
pub struct RuleArgs {
    /// Path to a custom redaction configuration file (YAML).
    #[arg(long = "config", value_name = "FILE", env = "LITEVAULT_CONFIG", help = "Path to a custom redaction configuration file (YAML).")]
    pub config: Option<PathBuf>,

    /// Explicitly enable these opt-in rule names (comma-separated).
    #[arg(long, short = 'e', value_delimiter = ',', help = "Enable these opt-in rule names (comma-separated).")]
    pub enable: Vec<String>,

    /// Explicitly disable these rule names (comma-separated).
    #[arg(long, short = 'x', value_delimiter = ',', help = "Explicitly disable these rule names (comma-separated).")]
    pub disable: Vec<String>,
}

/// Arguments for the `redact` command.
#[derive(Parser, Debug)]
pub struct RedactCommand {
    /// Path to an input file (reads from stdin if not provided).
    #[arg(long, short = 'i', value_name = "FILE", help = "Read input from a specified file instead of stdin.")]
    pub input_file: Option<PathBuf>,

    /// Write redacted output to this file instead of stdout.
    #[arg(long, short = 'o', value_name = "FILE", help = "Write output to a specified file instead of stdout.")]
    pub output: Option<PathBuf>,

    #[command(flatten)]
    pub rules: RuleArgs,

    /// Show a unified diff to highlight the changes made.
    #[arg(long, short = 'D', help = "Show a unified diff to highlight the changes made.")]
    pub diff: bool,

    /// Process input line by line (useful for streaming data from pipes).
    #[arg(long = "line-buffered", help = "Process input line by line (useful for streaming data from pipes).")]
    pub line_buffered: bool,

    /// Suppress the redaction summary.
    #[arg(long = "no-redaction-summary", help = "Suppress the redaction summary.")]
    pub no_summary: bool,
}

/// Arguments for the `scan` command.
#[derive(Parser, Debug)]
pub struct ScanCommand {
    /// Path to an input file (reads from stdin if not provided).
    #[arg(long, short = 'i', value_name = "FILE", help = "Read input from a specified file instead of stdin.")]
    pub input_file: Option<PathBuf>,

    #[command(flatten)]
    pub rules: RuleArgs,

    /// Exit with a non-zero code if the total number of matches exceeds this threshold.
    #[arg(long = "fail-over-threshold", value_name = "N", help = "Exit with a non-zero code if the total number of matches exceeds this threshold.")]
    pub fail_over_threshold: Option<usize>,

    /// Print scan summary as JSON to stdout.
    #[arg(long = "json-stdout", help = "Print the per-rule statistics to stdout as JSON.")]
    pub json_stdout: bool,
}

/// Arguments for the `attrs` command.
#[derive(Parser, Debug)]
pub struct AttrsCommand {
    /// Attributes as KEY=VALUE. Reads a JSON object from stdin when empty.
    #[arg(value_name = "KEY=VALUE", help = "Attributes as KEY=VALUE; a JSON object is read from stdin when none are given.")]
    pub pairs: Vec<String>,

    #[command(flatten)]
    pub rules: RuleArgs,

    /// Pretty-print the resulting JSON.
    #[arg(long = "pretty", help = "Pretty-print the resulting JSON.")]
    pub pretty: bool,
}

/// Subcommands for the `token` command.
#[derive(Subcommand, Debug)]
pub enum TokenCommand {
    #[command(about = "Prints `expiring` (exit 1) or `valid` (exit 0) for a compact token.")]
    Check {
        /// The token to check. Read from stdin when omitted.
        #[arg(value_name = "TOKEN", help = "The token to check; read from stdin when omitted.")]
        token: Option<String>,

        /// Seconds before expiry at which a token already counts as expiring.
        #[arg(long = "buffer", value_name = "SECS", default_value_t = DEFAULT_BUFFER_SECONDS, help = "Seconds before expiry at which a token counts as expiring.")]
        buffer: i64,

        /// Check the token held by the session store instead.
        #[arg(long = "from-session", conflicts_with = "token", help = "Check the token held by the session store.")]
        from_session: bool,

        /// Path to the session file.
        #[arg(long = "store", value_name = "FILE", env = "LITEVAULT_SESSION_FILE", help = "Path to the session file.")]
        store: Option<PathBuf>,
    },
}

/// Subcommands for the `session` command.
#[derive(Subcommand, Debug)]
pub enum SessionCommand {
    #[command(about = "Stores a session token and marks the session signed in.")]
    Save {
        #[arg(value_name = "TOKEN", help = "The session token to store.")]
        token: String,

        #[arg(long = "store", value_name = "FILE", env = "LITEVAULT_SESSION_FILE", help = "Path to the session file.")]
        store: Option<PathBuf>,
    },
    #[command(about = "Shows the stored session with its token redacted.")]
    Show {
        #[arg(long = "store", value_name = "FILE", env = "LITEVAULT_SESSION_FILE", help = "Path to the session file.")]
        store: Option<PathBuf>,

        /// Seconds before expiry at which the token counts as expiring.
        #[arg(long = "buffer", value_name = "SECS", default_value_t = DEFAULT_BUFFER_SECONDS, help = "Seconds before expiry at which a token counts as expiring.")]
        buffer: i64,
    },
    #[command(about = "Clears the stored session token.")]
    Clear {
        #[arg(long = "store", value_name = "FILE", env = "LITEVAULT_SESSION_FILE", help = "Path to the session file.")]
        store: Option<PathBuf>,
    },
}

/// Subcommands for the `rules` command.
#[derive(Subcommand, Debug)]
pub enum RulesCommand {
    #[command(about = "Lists active rules in the order they are applied.")]
    List {
        #[command(flatten)]
        rules: RuleArgs,
    },
}
