//! dm-engine - Migration engine for duckdbm
//!
//! Applies pending migrations in order, rolls back recently applied ones,
//! lists the ledger, and runs the out-of-band sync path. Failures part-way
//! through a batch stop the batch without compensating earlier steps.

pub mod engine;
pub mod error;
pub mod report;

pub use engine::{validate_rollback_count, MigrationEngine};
pub use error::{EngineError, EngineResult};
pub use report::{BatchReport, BatchSummary, ItemOutcome, OutcomeStatus};
