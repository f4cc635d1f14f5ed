// litevault/src/ui/redaction_summary.rs
//! Per-rule redaction summary printed after `redact` and `scan`.

use std::io::{self, Write};

use litevault_core::RedactionSummaryItem;

use crate::ui::output_format::write_styled;
use crate::ui::theme::{ThemeEntry, ThemeMap};

pub const SUMMARY_HEADER: &str = "--- Redaction Summary ---";
pub const NO_MATCHES: &str = "No redaction matches found.";

/// Prints `rule (N occurrences)` for each rule, or a single line when
/// nothing matched.
pub fn print_summary<W: Write>(
    summary: &[RedactionSummaryItem],
    writer: &mut W,
    theme: &ThemeMap,
    supports_color: bool,
) -> io::Result<()> {
    if summary.is_empty() {
        write_styled(writer, NO_MATCHES, ThemeEntry::Info, theme, supports_color)?;
        return writeln!(writer);
    }

    write_styled(writer, SUMMARY_HEADER, ThemeEntry::Header, theme, supports_color)?;
    writeln!(writer)?;
    for item in summary {
        write_styled(writer, &item.rule_name, ThemeEntry::SummaryRuleName, theme, supports_color)?;
        write!(writer, " ")?;
        write_styled(
            writer,
            &format!("({} occurrences)", item.occurrences),
            ThemeEntry::SummaryOccurrences,
            theme,
            supports_color,
        )?;
        writeln!(writer)?;
    }
    Ok(())
}

/// Total matches across all rules.
pub fn total_occurrences(summary: &[RedactionSummaryItem]) -> usize {
    summary.iter().map(|item| item.occurrences).sum()
}

/// Folds summaries from several passes (line-buffered mode) into one,
/// keeping first-seen rule order.
pub fn merge_summaries(into: &mut Vec<RedactionSummaryItem>, more: Vec<RedactionSummaryItem>) {
    for item in more {
        match into.iter_mut().find(|existing| existing.rule_name == item.rule_name) {
            Some(existing) => {
                existing.occurrences += item.occurrences;
                for hash in item.sample_hashes {
                    if !existing.sample_hashes.contains(&hash) {
                        existing.sample_hashes.push(hash);
                    }
                }
            }
            None => into.push(item),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::theme::ThemeStyle;

    fn item(name: &str, n: usize, hash: &str) -> RedactionSummaryItem {
        RedactionSummaryItem {
            rule_name: name.to_string(),
            occurrences: n,
            sample_hashes: vec![hash.to_string()],
        }
    }

    #[test]
    fn prints_rules_with_counts() {
        let mut buf = Vec::new();
        print_summary(&[item("email", 2, "a")], &mut buf, &ThemeStyle::default_theme_map(), false).unwrap();
        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "--- Redaction Summary ---\nemail (2 occurrences)\n"
        );
    }

    #[test]
    fn merge_adds_counts_and_dedupes_hashes() {
        let mut all = vec![item("email", 1, "a")];
        merge_summaries(&mut all, vec![item("email", 2, "a"), item("otp_code", 1, "b")]);
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].occurrences, 3);
        assert_eq!(all[0].sample_hashes, vec!["a".to_string()]);
        assert_eq!(total_occurrences(&all), 4);
    }
}
