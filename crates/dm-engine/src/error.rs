//! Error types for dm-engine

use dm_core::CoreError;
use dm_db::DbError;
use thiserror::Error;

/// Errors that stop a command before any migration is processed.
///
/// Failures part-way through a batch are reported as
/// [`crate::report::OutcomeStatus::Failed`] entries instead.
#[derive(Error, Debug)]
pub enum EngineError {
    /// G001: Ledger tables missing
    #[error("[G001] Migrations table not initialized. Run 'init' first.")]
    NotInitialized,

    /// G002: Caller supplied an unusable argument
    #[error("[G002] Invalid argument: {0}")]
    InvalidArgument(String),

    /// Catalog, config, or file IO failure
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Connection, SQL, or ledger failure
    #[error(transparent)]
    Db(DbError),
}

/// Result type alias for EngineError
pub type EngineResult<T> = Result<T, EngineError>;

impl From<DbError> for EngineError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::LedgerNotInitialized => EngineError::NotInitialized,
            other => EngineError::Db(other),
        }
    }
}
