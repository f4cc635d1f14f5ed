// litevault/src/ui/diff_viewer.rs
//! Unified diff between the original and the redacted text.

use diffy::{create_patch, Line as DiffLine};
use std::io::{self, Write};

use crate::ui::output_format::write_styled;
use crate::ui::theme::{ThemeEntry, ThemeMap};

/// Writes removed lines as `-...` and their redacted replacements as `+...`.
pub fn print_diff<W: Write>(
    original: &str,
    redacted: &str,
    writer: &mut W,
    theme: &ThemeMap,
    supports_color: bool,
) -> io::Result<()> {
    write_styled(writer, "--- Diff View ---", ThemeEntry::DiffHeader, theme, supports_color)?;
    writeln!(writer)?;

    let patch = create_patch(original, redacted);
    let mut changed = false;
    for hunk in patch.hunks() {
        for line in hunk.lines() {
            match line {
                DiffLine::Delete(s) => {
                    changed = true;
                    write_styled(writer, &format!("-{}", s.trim_end_matches('\n')), ThemeEntry::DiffRemoved, theme, supports_color)?;
                    writeln!(writer)?;
                }
                DiffLine::Insert(s) => {
                    changed = true;
                    write_styled(writer, &format!("+{}", s.trim_end_matches('\n')), ThemeEntry::DiffAdded, theme, supports_color)?;
                    writeln!(writer)?;
                }
                DiffLine::Context(s) => {
                    writeln!(writer, " {}", s.trim_end_matches('\n'))?;
                }
            }
        }
    }
    if !changed {
        writeln!(writer, "No changes.")?;
    }

    write_styled(writer, "-----------------", ThemeEntry::DiffHeader, theme, supports_color)?;
    writeln!(writer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::theme::ThemeStyle;

    #[test]
    fn shows_removed_and_added_lines() {
        let mut buf = Vec::new();
        print_diff("keep\notp=1234\n", "keep\notp=[REDACTED_CODE]\n", &mut buf, &ThemeStyle::default_theme_map(), false).unwrap();
        let out = String::from_utf8(buf).unwrap();
        assert!(out.contains("-otp=1234\n"));
        assert!(out.contains("+otp=[REDACTED_CODE]\n"));
        assert!(out.contains(" keep\n"));
    }

    #[test]
    fn identical_input_reports_no_changes() {
        let mut buf = Vec::new();
        print_diff("same\n", "same\n", &mut buf, &ThemeStyle::default_theme_map(), false).unwrap();
        assert!(String::from_utf8(buf).unwrap().contains("No changes."));
    }
}
