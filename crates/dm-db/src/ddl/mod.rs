//! Embedded DDL for the ledger tables.
//!
//! Both scripts are idempotent (`IF NOT EXISTS` throughout) and are consumed
//! by [`crate::ledger::MigrationLedger::ensure_schema`].

/// Table holding one row per currently applied migration.
pub const APPLIED_TABLE: &str = "migrations";

/// Append-only audit log of migrations applied through `sync`.
pub const SYNC_TABLE: &str = "sync";

/// Sequence and table for applied migrations.
pub static APPLIED_DDL: &str = include_str!("applied.sql");

/// Sequence and table for the sync audit log.
pub static SYNC_DDL: &str = include_str!("sync.sql");
