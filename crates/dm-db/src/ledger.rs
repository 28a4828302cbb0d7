//! Persistent record of applied and synced migrations.
//!
//! Two tables back the ledger: `migrations` holds one live row per applied
//! migration (deleted on rollback), `sync` is an append-only audit log of
//! scripts applied through the out-of-band sync path. A filename is
//! "applied" exactly when a live `migrations` row exists for it.

use crate::connection::relation_exists;
use crate::ddl::{APPLIED_DDL, APPLIED_TABLE, SYNC_DDL, SYNC_TABLE};
use crate::error::{is_missing_table, DbError, DbResult};
use chrono::NaiveDateTime;
use duckdb::Connection;
use serde::Serialize;
use std::collections::HashSet;

/// Format used to read timestamps back out of DuckDB.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A live row in the applied-migrations table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppliedMigration {
    pub id: i64,
    pub filename: String,
    pub applied_at: NaiveDateTime,
}

/// A row in the sync audit log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyncRecord {
    pub id: i64,
    pub migration_name: String,
    pub applied_at: NaiveDateTime,
}

/// Ledger operations over a borrowed connection.
///
/// Borrowing instead of owning lets the engine run a ledger write inside the
/// same transaction as the migration SQL it records.
#[derive(Clone, Copy)]
pub struct MigrationLedger<'c> {
    conn: &'c Connection,
}

impl<'c> MigrationLedger<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }

    /// Create the applied-migrations table and the sync log if missing.
    pub fn ensure_schema(&self) -> DbResult<()> {
        self.conn.execute_batch(APPLIED_DDL).map_err(|e| {
            DbError::LedgerError(format!("failed to create {APPLIED_TABLE} table: {e}"))
        })?;
        self.ensure_sync_log()
    }

    /// Create only the sync log if missing.
    pub fn ensure_sync_log(&self) -> DbResult<()> {
        self.conn.execute_batch(SYNC_DDL).map_err(|e| {
            DbError::LedgerError(format!("failed to create {SYNC_TABLE} table: {e}"))
        })?;
        Ok(())
    }

    /// Whether the applied-migrations table exists.
    pub fn is_initialized(&self) -> DbResult<bool> {
        relation_exists(self.conn, APPLIED_TABLE)
    }

    /// Every filename with a live applied record.
    pub fn applied_filenames(&self) -> DbResult<HashSet<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT filename FROM migrations")
            .map_err(|e| ledger_read_error("prepare applied filenames", e))?;

        let names = stmt
            .query_map([], |row| row.get::<_, String>(0))
            .map_err(|e| ledger_read_error("query applied filenames", e))?
            .collect::<Result<HashSet<_>, _>>()
            .map_err(|e| ledger_read_error("collect applied filenames", e))?;
        Ok(names)
    }

    /// Insert an applied record; fails if `filename` already has one.
    pub fn record_applied(&self, filename: &str) -> DbResult<i64> {
        let id: i64 = self
            .conn
            .query_row(
                "INSERT INTO migrations (filename) VALUES (?) RETURNING id",
                duckdb::params![filename],
                |row| row.get(0),
            )
            .map_err(|e| DbError::LedgerError(format!("failed to record {filename}: {e}")))?;
        log::debug!("Recorded {filename} as applied (id {id})");
        Ok(id)
    }

    /// The `n` most recently applied records, most recent first.
    pub fn last_applied(&self, n: usize) -> DbResult<Vec<AppliedMigration>> {
        let sql = format!(
            "SELECT id, filename, strftime(applied_at, '{TIMESTAMP_FORMAT}')
             FROM migrations ORDER BY id DESC LIMIT {n}"
        );
        self.query_applied(&sql)
    }

    /// Every applied record in application order.
    pub fn list_applied(&self) -> DbResult<Vec<AppliedMigration>> {
        let sql = format!(
            "SELECT id, filename, strftime(applied_at, '{TIMESTAMP_FORMAT}')
             FROM migrations ORDER BY id ASC"
        );
        self.query_applied(&sql)
    }

    /// Delete the applied record with `id`.
    pub fn remove_applied(&self, id: i64) -> DbResult<()> {
        let deleted = self
            .conn
            .execute("DELETE FROM migrations WHERE id = ?", duckdb::params![id])
            .map_err(|e| DbError::LedgerError(format!("failed to remove record {id}: {e}")))?;
        if deleted == 0 {
            return Err(DbError::LedgerError(format!(
                "no applied migration with id {id}"
            )));
        }
        log::debug!("Removed applied record {id}");
        Ok(())
    }

    /// Append a sync audit entry stamped with the current time.
    pub fn record_sync(&self, migration_name: &str) -> DbResult<i64> {
        let id: i64 = self
            .conn
            .query_row(
                "INSERT INTO sync (migration_name, applied_at) VALUES (?, now()) RETURNING id",
                duckdb::params![migration_name],
                |row| row.get(0),
            )
            .map_err(|e| {
                DbError::LedgerError(format!("failed to record sync of {migration_name}: {e}"))
            })?;
        log::debug!("Recorded sync of {migration_name} (id {id})");
        Ok(id)
    }

    /// The sync audit log in insertion order.
    pub fn list_synced(&self) -> DbResult<Vec<SyncRecord>> {
        let sql = format!(
            "SELECT id, migration_name, strftime(applied_at, '{TIMESTAMP_FORMAT}')
             FROM sync ORDER BY id ASC"
        );
        let rows = self.query_rows(&sql, "sync log")?;
        rows.into_iter()
            .map(|(id, migration_name, applied_at)| {
                Ok(SyncRecord {
                    id,
                    migration_name,
                    applied_at: parse_timestamp(&applied_at)?,
                })
            })
            .collect()
    }

    fn query_applied(&self, sql: &str) -> DbResult<Vec<AppliedMigration>> {
        let rows = self.query_rows(sql, "applied migrations")?;
        rows.into_iter()
            .map(|(id, filename, applied_at)| {
                Ok(AppliedMigration {
                    id,
                    filename,
                    applied_at: parse_timestamp(&applied_at)?,
                })
            })
            .collect()
    }

    fn query_rows(&self, sql: &str, what: &str) -> DbResult<Vec<(i64, String, String)>> {
        let mut stmt = self
            .conn
            .prepare(sql)
            .map_err(|e| ledger_read_error(&format!("prepare {what}"), e))?;

        let rows = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, Option<String>>(2)?.unwrap_or_default(),
                ))
            })
            .map_err(|e| ledger_read_error(&format!("query {what}"), e))?
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| ledger_read_error(&format!("collect {what}"), e))?;
        Ok(rows)
    }
}

/// Map a read failure, reporting a missing table as an uninitialised ledger.
fn ledger_read_error(context: &str, err: duckdb::Error) -> DbError {
    if is_missing_table(&err) {
        DbError::LedgerNotInitialized
    } else {
        DbError::LedgerError(format!("{context}: {err}"))
    }
}

fn parse_timestamp(value: &str) -> DbResult<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value, TIMESTAMP_FORMAT)
        .map_err(|e| DbError::LedgerError(format!("invalid applied_at '{value}': {e}")))
}

#[cfg(test)]
#[path = "ledger_test.rs"]
mod tests;
