// piiguard/src/commands/recognizers.rs
use anyhow::Result;
use comfy_table::{presets::UTF8_FULL, Table};
use std::io::Write;

use piiguard_core::RecognizerRegistry;

use crate::cli::RecognizersCommand;
use crate::settings;

/// Prints every active recognizer with its language, kind and entity types.
pub fn run_recognizers<W: Write>(cmd: &RecognizersCommand, out: &mut W) -> Result<()> {
    let config = settings::load_config(&cmd.config)?;
    let registry = RecognizerRegistry::from_config(&config)?;

    if cmd.json {
        let rows: Vec<serde_json::Value> = registry
            .all()
            .map(|r| {
                serde_json::json!({
                    "name": r.name(),
                    "language": r.language(),
                    "kind": r.kind_name(),
                    "entities": r.supported_entities(),
                })
            })
            .collect();
        serde_json::to_writer_pretty(&mut *out, &rows)?;
        writeln!(out)?;
        return Ok(());
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_header(vec!["Name", "Language", "Kind", "Entities", "Context words"]);
    for r in registry.all() {
        let entities: Vec<&str> = r.supported_entities().iter().map(|e| e.as_str()).collect();
        table.add_row(vec![
            r.name().to_string(),
            r.language().to_string(),
            r.kind_name().to_string(),
            entities.join(", "),
            r.context().keywords().join(", "),
        ]);
    }
    writeln!(out, "{table}")?;
    Ok(())
}
