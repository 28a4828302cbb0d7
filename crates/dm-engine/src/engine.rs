//! The migration state machine.
//!
//! A migration file is either unapplied or applied; "applied" means a live
//! ledger record exists for its filename. Apply moves pending files to
//! applied in filename order, rollback moves the most recently applied back
//! to unapplied, newest first. Both stop at the first failure and never
//! compensate earlier steps: migrations already processed stay processed,
//! and those after the failure are left for the next invocation.
//!
//! Each migration's SQL and its ledger write (or delete) run in one
//! transaction, so a failing script leaves neither partial SQL effects nor a
//! ledger change behind.

use crate::error::{EngineError, EngineResult};
use crate::report::{BatchReport, ItemOutcome};
use dm_core::{MacroProcessor, MigrationCatalog, MigrationFile, MigrationScript, MigratorSettings};
use dm_db::{
    execute_script, AppliedMigration, DbResult, DuckDbBackend, MigrationLedger, SyncRecord,
};
use std::time::Instant;

/// Orchestrates apply / rollback / list / sync against one database.
pub struct MigrationEngine {
    settings: MigratorSettings,
    db: DuckDbBackend,
    catalog: MigrationCatalog,
    macros: MacroProcessor,
}

impl MigrationEngine {
    /// Open the configured database and resolve macros from the process
    /// environment.
    pub fn open(settings: MigratorSettings) -> EngineResult<Self> {
        let db = DuckDbBackend::open(&settings.db_path)?;
        Ok(Self::new(settings, db, MacroProcessor::from_env()))
    }

    /// Build an engine over an existing connection.
    pub fn new(settings: MigratorSettings, db: DuckDbBackend, macros: MacroProcessor) -> Self {
        let catalog = MigrationCatalog::new(settings.migrations_dir.clone());
        Self {
            settings,
            db,
            catalog,
            macros,
        }
    }

    pub fn settings(&self) -> &MigratorSettings {
        &self.settings
    }

    pub fn catalog(&self) -> &MigrationCatalog {
        &self.catalog
    }

    pub fn db(&self) -> &DuckDbBackend {
        &self.db
    }

    fn ledger(&self) -> MigrationLedger<'_> {
        MigrationLedger::new(self.db.conn())
    }

    /// Idempotently create the ledger tables.
    pub fn init(&self) -> EngineResult<()> {
        self.ledger().ensure_schema()?;
        log::info!("Ledger initialized in {}", self.settings.db_path);
        Ok(())
    }

    fn require_initialized(&self) -> EngineResult<()> {
        if self.ledger().is_initialized()? {
            Ok(())
        } else {
            Err(EngineError::NotInitialized)
        }
    }

    /// Catalog files without a live ledger record, in application order.
    pub fn pending(&self) -> EngineResult<Vec<MigrationFile>> {
        self.require_initialized()?;
        let applied = self.ledger().applied_filenames()?;
        Ok(self
            .catalog
            .list_all()?
            .into_iter()
            .filter(|file| !applied.contains(&file.filename))
            .collect())
    }

    /// Apply every pending migration in filename order.
    ///
    /// Stops at the first unreadable file, SQL failure, or ledger failure;
    /// that failure is the last entry of the report.
    pub fn apply(&self) -> EngineResult<BatchReport> {
        let pending = self.pending()?;
        let mut report = BatchReport::default();

        for file in &pending {
            let start = Instant::now();

            let raw = match self.catalog.read_to_string(file) {
                Ok(raw) => raw,
                Err(e) => {
                    report.push(ItemOutcome::failed(&file.filename, e, start.elapsed()));
                    break;
                }
            };
            let script = MigrationScript::parse(&self.macros.resolve(&raw));

            let result = self.db.transaction(|conn| {
                execute_script(conn, &script.forward)?;
                MigrationLedger::new(conn).record_applied(&file.filename)
            });

            match result {
                Ok(_) => report.push(ItemOutcome::applied(&file.filename, start.elapsed())),
                Err(e) => {
                    report.push(ItemOutcome::failed(&file.filename, e, start.elapsed()));
                    break;
                }
            }
        }

        Ok(report)
    }

    /// Roll back the `n` most recently applied migrations, newest first.
    ///
    /// `n` must be positive; anything else is rejected before the database is
    /// touched. Records whose file is unreadable or has no reverse section
    /// are skipped with their ledger record intact. An execution or ledger
    /// failure stops the batch, leaving older records applied.
    pub fn rollback(&self, n: i64) -> EngineResult<BatchReport> {
        let count = validate_rollback_count(n)?;

        self.require_initialized()?;
        let records = self.ledger().last_applied(count)?;
        let mut report = BatchReport::default();

        for record in &records {
            let start = Instant::now();
            let file = self.catalog.entry(&record.filename);

            let raw = match self.catalog.read_to_string(&file) {
                Ok(raw) => raw,
                Err(e) => {
                    log::warn!("Cannot read {}: {e}", file.path.display());
                    report.push(ItemOutcome::skipped(
                        &record.filename,
                        format!("failed to read migration file: {e}"),
                        start.elapsed(),
                    ));
                    continue;
                }
            };

            let Some(reverse) = MigrationScript::parse(&raw).reverse else {
                log::warn!("No rollback section found in migration {}", record.filename);
                report.push(ItemOutcome::skipped(
                    &record.filename,
                    "no rollback section found",
                    start.elapsed(),
                ));
                continue;
            };
            let reverse = self.macros.resolve(&reverse);

            match self.revert(record, &reverse) {
                Ok(()) => report.push(ItemOutcome::rolled_back(&record.filename, start.elapsed())),
                Err(e) => {
                    report.push(ItemOutcome::failed(&record.filename, e, start.elapsed()));
                    break;
                }
            }
        }

        Ok(report)
    }

    fn revert(&self, record: &AppliedMigration, reverse_sql: &str) -> DbResult<()> {
        self.db.transaction(|conn| {
            execute_script(conn, reverse_sql)?;
            MigrationLedger::new(conn).remove_applied(record.id)
        })
    }

    /// Live applied records in application order.
    pub fn list(&self) -> EngineResult<Vec<AppliedMigration>> {
        self.require_initialized()?;
        Ok(self.ledger().list_applied()?)
    }

    /// The sync audit log in insertion order.
    pub fn list_synced(&self) -> EngineResult<Vec<SyncRecord>> {
        self.require_initialized()?;
        self.ledger().ensure_sync_log()?;
        Ok(self.ledger().list_synced()?)
    }

    /// Execute the forward section of `migrations/{name}.sql` outside the
    /// applied-migrations ledger, recording it in the sync log only.
    ///
    /// The applied set is neither consulted nor modified, so a script can be
    /// synced whether or not it is recorded as applied.
    pub fn sync(&self, name: &str) -> EngineResult<i64> {
        self.require_initialized()?;
        self.ledger().ensure_sync_log()?;

        let file = self.catalog.find(name)?;
        let raw = self.catalog.read_to_string(&file)?;
        let script = MigrationScript::parse(&self.macros.resolve(&raw));

        let id = self.db.transaction(|conn| {
            execute_script(conn, &script.forward)?;
            MigrationLedger::new(conn).record_sync(name)
        })?;
        log::info!("Synced migration {name}");
        Ok(id)
    }
}

/// Check a rollback count without touching any database.
pub fn validate_rollback_count(n: i64) -> EngineResult<usize> {
    match usize::try_from(n) {
        Ok(count) if count > 0 => Ok(count),
        _ => Err(EngineError::InvalidArgument(format!(
            "rollback count must be a positive integer, got {n}"
        ))),
    }
}

#[cfg(test)]
#[path = "engine_test.rs"]
mod tests;
