// litevault/src/lib.rs
//! # LiteVault CLI
//!
//! Terminal front end over `litevault-core`: redact text and attribute maps
//! with the client's log rules, and inspect compact session tokens and the
//! local session store.

pub mod cli;
pub mod commands;
pub mod logger;
pub mod ui;
