// litevault/src/ui/mod.rs
//! Terminal presentation: theme, status messages, summaries and diffs.

pub mod diff_viewer;
pub mod output_format;
pub mod redaction_summary;
pub mod theme;
