//! dm-db - DuckDB layer for duckdbm
//!
//! Provides the connection wrapper used to execute migration SQL, a
//! transaction helper, and the [`MigrationLedger`] that records which
//! migrations are applied.

pub mod connection;
pub mod ddl;
pub mod error;
pub mod ledger;

pub use connection::{execute_script, DuckDbBackend, MEMORY_PATH};
pub use error::{DbError, DbResult};
pub use ledger::{AppliedMigration, MigrationLedger, SyncRecord};
