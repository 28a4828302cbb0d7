//! Init command implementation

use anyhow::Result;

use crate::cli::GlobalArgs;
use crate::commands::common::open_engine;

/// Execute the init command
pub(crate) fn execute(global: &GlobalArgs) -> Result<()> {
    let engine = open_engine(global)?;
    engine.init()?;
    println!("The database has been initialized.");
    Ok(())
}
