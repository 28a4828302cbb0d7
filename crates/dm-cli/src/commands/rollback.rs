//! Rollback command implementation

use anyhow::Result;
use dm_engine::validate_rollback_count;

use crate::cli::{GlobalArgs, RollbackArgs};
use crate::commands::common::{open_engine, print_report, BatchKind};

/// Execute the rollback command.
///
/// The count is checked before the database is opened.
pub(crate) fn execute(args: &RollbackArgs, global: &GlobalArgs) -> Result<()> {
    validate_rollback_count(args.count)?;
    let engine = open_engine(global)?;
    let report = engine.rollback(args.count)?;
    if report.is_empty() {
        println!("No migrations to roll back.");
        return Ok(());
    }
    print_report(&report, BatchKind::Rollback)
}
