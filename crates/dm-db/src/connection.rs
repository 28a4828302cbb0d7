//! DuckDB connection wrapper.
//!
//! [`DuckDbBackend`] owns the single connection used for one CLI invocation:
//! migration SQL and ledger reads/writes go through the same connection so
//! they can share a transaction.

use crate::error::{DbError, DbResult};
use duckdb::Connection;
use std::path::Path;

/// Path value that selects an in-memory database.
pub const MEMORY_PATH: &str = ":memory:";

/// DuckDB database backend
///
/// Single-threaded; no `Mutex` needed because migrations run sequentially.
pub struct DuckDbBackend {
    conn: Connection,
}

impl DuckDbBackend {
    /// Create a new in-memory DuckDB connection
    pub fn in_memory() -> DbResult<Self> {
        let conn =
            Connection::open_in_memory().map_err(|e| DbError::ConnectionError(e.to_string()))?;
        Ok(Self { conn })
    }

    /// Open (or create) a DuckDB database file
    pub fn from_path(path: &Path) -> DbResult<Self> {
        let conn = Connection::open(path)
            .map_err(|e| DbError::ConnectionError(format!("{e}: {}", path.display())))?;
        Ok(Self { conn })
    }

    /// Open from a path string (handles :memory: special case)
    pub fn open(path: &str) -> DbResult<Self> {
        if path == MEMORY_PATH {
            Self::in_memory()
        } else {
            Self::from_path(Path::new(path))
        }
    }

    /// Borrow the underlying DuckDB connection.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Execute one or more semicolon-separated statements.
    pub fn execute_batch(&self, sql: &str) -> DbResult<()> {
        execute_script(&self.conn, sql)
    }

    /// Check whether a table or view exists in the current catalog.
    ///
    /// Accepts `schema.table`; unqualified names resolve against the current
    /// schema.
    pub fn relation_exists(&self, name: &str) -> DbResult<bool> {
        relation_exists(&self.conn, name)
    }

    /// Execute `body` within a `BEGIN` / `COMMIT` transaction, rolling back on
    /// error.
    pub fn transaction<F, T>(&self, body: F) -> DbResult<T>
    where
        F: FnOnce(&Connection) -> DbResult<T>,
    {
        self.conn
            .execute_batch("BEGIN TRANSACTION")
            .map_err(|e| DbError::TransactionError(format!("BEGIN failed: {e}")))?;

        let result = body(&self.conn);

        match &result {
            Ok(_) => {
                if let Err(commit_err) = self.conn.execute_batch("COMMIT") {
                    let _ = self.conn.execute_batch("ROLLBACK");
                    return Err(DbError::TransactionError(format!(
                        "COMMIT failed: {commit_err}"
                    )));
                }
            }
            Err(_) => {
                if let Err(rollback_err) = self.conn.execute_batch("ROLLBACK") {
                    log::warn!("ROLLBACK after failed transaction also failed: {rollback_err}");
                }
            }
        }
        result
    }
}

/// Execute a SQL script on `conn`, mapping failures to
/// [`DbError::ExecutionError`].
///
/// Scripts that are blank or contain only `--` comment lines are a no-op.
pub fn execute_script(conn: &Connection, sql: &str) -> DbResult<()> {
    if is_effectively_empty(sql) {
        log::debug!("Skipping empty SQL script");
        return Ok(());
    }
    log::debug!("Executing SQL ({} bytes)", sql.len());
    conn.execute_batch(sql)
        .map_err(|e| DbError::ExecutionError(e.to_string()))
}

fn is_effectively_empty(sql: &str) -> bool {
    sql.lines().all(|line| {
        let line = line.trim();
        line.is_empty() || line.starts_with("--")
    })
}

pub(crate) fn relation_exists(conn: &Connection, name: &str) -> DbResult<bool> {
    let (schema, table) = match name.rfind('.') {
        Some(pos) => (Some(&name[..pos]), &name[pos + 1..]),
        None => (None, name),
    };

    let count: i64 = match schema {
        Some(schema) => conn.query_row(
            "SELECT COUNT(*) FROM information_schema.tables
             WHERE table_catalog = current_database() AND table_schema = ? AND table_name = ?",
            duckdb::params![schema, table],
            |row| row.get(0),
        ),
        None => conn.query_row(
            "SELECT COUNT(*) FROM information_schema.tables
             WHERE table_catalog = current_database() AND table_schema = current_schema() AND table_name = ?",
            duckdb::params![table],
            |row| row.get(0),
        ),
    }
    .map_err(|e| DbError::ExecutionError(format!("relation lookup for {name}: {e}")))?;

    Ok(count > 0)
}

#[cfg(test)]
#[path = "connection_test.rs"]
mod tests;
