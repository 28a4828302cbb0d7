//! Sync command implementation

use anyhow::Result;

use crate::cli::{GlobalArgs, SyncArgs};
use crate::commands::common::open_engine;

/// Execute the sync command
pub(crate) fn execute(args: &SyncArgs, global: &GlobalArgs) -> Result<()> {
    let engine = open_engine(global)?;
    engine.sync(&args.name)?;
    println!("Successfully synced migration: {}", args.name);
    Ok(())
}
