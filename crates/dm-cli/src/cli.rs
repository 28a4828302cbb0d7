//! CLI argument definitions using clap derive API

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// duckdbm - versioned SQL migrations for DuckDB
#[derive(Parser, Debug)]
#[command(name = "duckdbm")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Global options
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Global arguments available to all commands
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to project directory
    #[arg(short = 'p', long, global = true, default_value = ".")]
    pub project_dir: PathBuf,

    /// Override config file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Database file (overrides DUCKDBM_DATABASE and the config file)
    #[arg(long, global = true)]
    pub db: Option<String>,

    /// Migrations directory (overrides DUCKDBM_MIGRATIONS_DIR and the config file)
    #[arg(short, long, global = true)]
    pub migrations_dir: Option<String>,

    /// Environment file loaded before macro substitution (default: <project-dir>/.env)
    #[arg(long, global = true)]
    pub env_file: Option<PathBuf>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create the ledger tables in the database
    Init,

    /// Create a new migration skeleton file
    Create(CreateArgs),

    /// Apply all pending migrations in order
    Apply(ApplyArgs),

    /// Roll back the most recently applied migrations
    Rollback(RollbackArgs),

    /// List applied migrations
    List(ListArgs),

    /// Apply one migration's forward SQL outside the ledger
    Sync(SyncArgs),
}

/// Arguments for the create command
#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Migration name, used as the filename slug
    pub name: String,
}

/// Arguments for the apply command
#[derive(Args, Debug)]
pub struct ApplyArgs {
    /// Show pending migrations without executing them
    #[arg(long)]
    pub dry_run: bool,
}

/// Arguments for the rollback command
#[derive(Args, Debug)]
pub struct RollbackArgs {
    /// Number of migrations to roll back
    #[arg(default_value_t = 1, allow_negative_numbers = true)]
    pub count: i64,
}

/// Arguments for the list command
#[derive(Args, Debug)]
pub struct ListArgs {
    /// Show the sync audit log instead of applied migrations
    #[arg(long)]
    pub sync: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub output: ListOutput,
}

/// List output formats
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListOutput {
    /// Table format
    Table,
    /// JSON output
    Json,
}

/// Arguments for the sync command
#[derive(Args, Debug)]
pub struct SyncArgs {
    /// Migration name, with or without the .sql extension
    pub name: String,
}

#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;
