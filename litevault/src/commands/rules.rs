// litevault/src/commands/rules.rs
//! `litevault rules list`.

use anyhow::Result;
use comfy_table::{presets::UTF8_FULL_CONDENSED, ContentArrangement, Table};

use litevault_core::{RedactionConfig, ReplacementStrategy};

use crate::cli::RulesCommand;
use crate::commands::load_config;

pub fn run(cmd: RulesCommand) -> Result<()> {
    let RulesCommand::List { rules } = cmd;
    let config = load_config(&rules)?;
    println!("{}", rules_table(&config));
    if !config.enabled {
        println!("Redaction is disabled by configuration.");
    }
    Ok(())
}

/// One row per active rule, in application order.
pub fn rules_table(config: &RedactionConfig) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Order", "Name", "Replacement", "Severity", "Description"]);

    for rule in config.ordered_rules() {
        if rule.enabled == Some(false) {
            continue;
        }
        let replacement = match rule.replacement {
            ReplacementStrategy::Literal => "literal",
            ReplacementStrategy::LengthPreserving => "length_preserving",
        };
        table.add_row(vec![
            rule.order.to_string(),
            rule.name.clone(),
            replacement.to_string(),
            rule.severity.clone().unwrap_or_default(),
            rule.description.clone().unwrap_or_default(),
        ]);
    }
    table
}
