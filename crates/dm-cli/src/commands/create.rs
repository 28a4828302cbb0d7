//! Create command implementation

use anyhow::Result;
use dm_core::MigrationCatalog;

use crate::cli::{CreateArgs, GlobalArgs};
use crate::commands::common::{display_path, load_env_file, resolve_settings};

/// Execute the create command.
///
/// Only touches the migrations directory; the database is never opened.
pub(crate) fn execute(args: &CreateArgs, global: &GlobalArgs) -> Result<()> {
    load_env_file(global)?;
    let settings = resolve_settings(global)?;
    let catalog = MigrationCatalog::new(settings.migrations_dir);
    let path = catalog.create(&args.name)?;
    println!(
        "Migration created: {}",
        display_path(&path, &global.project_dir)
    );
    Ok(())
}
