//! dm-core - Core library for duckdbm
//!
//! This crate provides configuration parsing, migration file discovery,
//! forward/reverse section splitting, and `{{NAME}}` macro substitution used
//! by the migration engine and the CLI.

pub mod catalog;
pub mod config;
pub mod error;
pub mod macros;
pub mod script;

pub use catalog::{MigrationCatalog, MigrationFile};
pub use config::{Config, MigratorSettings};
pub use error::{CoreError, CoreResult};
pub use macros::{Expansion, MacroProcessor};
pub use script::{MigrationScript, ROLLBACK_MARKER};
