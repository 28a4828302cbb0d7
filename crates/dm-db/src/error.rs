//! Error types for dm-db

use thiserror::Error;

/// Database and ledger errors
#[derive(Error, Debug)]
pub enum DbError {
    /// Failed to open or create the database (D001)
    #[error("[D001] Database connection failed: {0}")]
    ConnectionError(String),

    /// Migration SQL failed to execute (D002)
    #[error("[D002] SQL execution failed: {0}")]
    ExecutionError(String),

    /// Ledger tables are missing (D003)
    #[error("[D003] Migrations table not initialized. Run 'init' first.")]
    LedgerNotInitialized,

    /// Ledger read or write failed (D004)
    #[error("[D004] Migration ledger operation failed: {0}")]
    LedgerError(String),

    /// Transaction management error (D005)
    #[error("[D005] Transaction failed: {0}")]
    TransactionError(String),
}

/// Result type alias for DbError
pub type DbResult<T> = Result<T, DbError>;

/// Whether a DuckDB error reports a missing table.
///
/// duckdb::Error does not expose structured variants, so the catalog error
/// message is the only signal available.
pub(crate) fn is_missing_table(err: &duckdb::Error) -> bool {
    let msg = err.to_string();
    msg.contains("Table with name")
        || msg.contains("Table or view with name")
        || (msg.contains("Catalog Error") && msg.contains("does not exist"))
}
