//! List command implementation

use anyhow::{Context, Result};
use dm_db::{AppliedMigration, SyncRecord};
use serde::Serialize;

use crate::cli::{GlobalArgs, ListArgs, ListOutput};
use crate::commands::common::open_engine;

const RULE: &str = "------------------------------------------------------------";

/// Execute the list command
pub(crate) fn execute(args: &ListArgs, global: &GlobalArgs) -> Result<()> {
    let engine = open_engine(global)?;

    if args.sync {
        let records = engine.list_synced()?;
        match args.output {
            ListOutput::Table => print!("{}", format_sync_table(&records)),
            ListOutput::Json => print_json(&records)?,
        }
    } else {
        let records = engine.list()?;
        match args.output {
            ListOutput::Table => print!("{}", format_applied_table(&records)),
            ListOutput::Json => print_json(&records)?,
        }
    }
    Ok(())
}

fn format_applied_table(records: &[AppliedMigration]) -> String {
    let mut out = format!("ID\tFilename\t\tApplied At\n{RULE}\n");
    for record in records {
        out.push_str(&format!(
            "{}\t{}\t{}\n",
            record.id, record.filename, record.applied_at
        ));
    }
    out
}

fn format_sync_table(records: &[SyncRecord]) -> String {
    let mut out = format!("ID\tMigration\t\tSynced At\n{RULE}\n");
    for record in records {
        out.push_str(&format!(
            "{}\t{}\t{}\n",
            record.id, record.migration_name, record.applied_at
        ));
    }
    out
}

fn print_json<T: Serialize>(records: &[T]) -> Result<()> {
    let json = serde_json::to_string_pretty(records).context("Failed to serialize to JSON")?;
    println!("{}", json);
    Ok(())
}

#[cfg(test)]
#[path = "list_test.rs"]
mod tests;
