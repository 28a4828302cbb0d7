//! Apply command implementation

use anyhow::Result;

use crate::cli::{ApplyArgs, GlobalArgs};
use crate::commands::common::{open_engine, print_report, BatchKind};

/// Execute the apply command
pub(crate) fn execute(args: &ApplyArgs, global: &GlobalArgs) -> Result<()> {
    let engine = open_engine(global)?;

    if args.dry_run {
        let pending = engine.pending()?;
        if pending.is_empty() {
            println!("No pending migrations.");
        }
        for file in &pending {
            println!("Pending migration: {}", file.filename);
        }
        return Ok(());
    }

    let report = engine.apply()?;
    if report.is_empty() {
        println!("No pending migrations.");
        return Ok(());
    }
    print_report(&report, BatchKind::Apply)
}
