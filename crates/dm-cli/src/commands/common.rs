//! Shared utilities for CLI commands

use anyhow::{Context, Result};
use dm_core::{Config, MigratorSettings};
use dm_engine::{BatchReport, BatchSummary, MigrationEngine};
use std::fmt;
use std::path::Path;

use crate::cli::GlobalArgs;

/// Error type representing a non-zero process exit code.
///
/// Use `return Err(ExitCode(N).into())` instead of `std::process::exit(N)`
/// so that RAII destructors run and the database connection is closed.
#[derive(Debug)]
pub(crate) struct ExitCode(pub(crate) i32);

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Intentionally empty: the failing command has already reported
        // what went wrong.
        write!(f, "")
    }
}

impl std::error::Error for ExitCode {}

/// Load `KEY=value` pairs into the process environment before macros are
/// resolved. Variables already set are left alone.
///
/// A missing default `.env` is ignored; a missing `--env-file` is an error.
pub(crate) fn load_env_file(global: &GlobalArgs) -> Result<()> {
    match &global.env_file {
        Some(path) => {
            dotenvy::from_path(path)
                .with_context(|| format!("Failed to load env file: {}", path.display()))?;
            log::debug!("Loaded environment from {}", path.display());
        }
        None => {
            let path = global.project_dir.join(".env");
            match dotenvy::from_path(&path) {
                Ok(()) => log::debug!("Loaded environment from {}", path.display()),
                Err(e) if e.not_found() => {
                    log::debug!("No .env file at {}", path.display());
                }
                Err(e) => {
                    return Err(e)
                        .with_context(|| format!("Failed to load env file: {}", path.display()))
                }
            }
        }
    }
    Ok(())
}

/// Resolve database path and migrations directory for this invocation.
pub(crate) fn resolve_settings(global: &GlobalArgs) -> Result<MigratorSettings> {
    let root = global.project_dir.as_path();
    let config = match &global.config {
        Some(path) => Config::load(path)?,
        None => Config::load_from_dir(root)?,
    };
    let settings = config.settings(
        root,
        global.db.as_deref(),
        global.migrations_dir.as_deref(),
    );
    log::debug!(
        "Database: {}, migrations: {}",
        settings.db_path,
        settings.migrations_dir.display()
    );
    Ok(settings)
}

/// Load the env file, resolve settings and open the engine.
pub(crate) fn open_engine(global: &GlobalArgs) -> Result<MigrationEngine> {
    load_env_file(global)?;
    let settings = resolve_settings(global)?;
    let engine = MigrationEngine::open(settings)
        .context("Failed to open database")?;
    Ok(engine)
}

/// Which kind of batch a report came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BatchKind {
    Apply,
    Rollback,
}

/// Print one line per outcome followed by a summary, then fail with exit
/// code 1 if the batch stopped on an error.
pub(crate) fn print_report(report: &BatchReport, kind: BatchKind) -> Result<()> {
    for outcome in &report.outcomes {
        if outcome.is_failure() {
            eprintln!("{outcome}");
        } else {
            println!("{outcome}");
        }
    }

    let summary = report.summary();
    println!();
    println!("{}", format_summary(&summary, kind));
    println!("Total time: {}ms", summary.duration.as_millis());

    if report.is_success() {
        Ok(())
    } else {
        Err(ExitCode(1).into())
    }
}

pub(crate) fn format_summary(summary: &BatchSummary, kind: BatchKind) -> String {
    match kind {
        BatchKind::Apply => format!(
            "Completed: {} applied, {} failed",
            summary.applied, summary.failed
        ),
        BatchKind::Rollback => format!(
            "Completed: {} rolled back, {} skipped, {} failed",
            summary.rolled_back, summary.skipped, summary.failed
        ),
    }
}

/// Display a path relative to the project directory when possible.
pub(crate) fn display_path(path: &Path, root: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .display()
        .to_string()
}

#[cfg(test)]
#[path = "common_test.rs"]
mod tests;
