//! Configuration types and parsing for duckdbm.yml

use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable overriding the database path.
pub const DATABASE_ENV: &str = "DUCKDBM_DATABASE";

/// Environment variable overriding the migrations directory.
pub const MIGRATIONS_DIR_ENV: &str = "DUCKDBM_MIGRATIONS_DIR";

/// Config file names probed in the project directory, in order.
const CONFIG_FILE_NAMES: &[&str] = &["duckdbm.yml", "duckdbm.yaml"];

/// Project configuration from duckdbm.yml
///
/// Every field has a default, so a project without a config file behaves
/// exactly like one with an empty file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Database connection configuration
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Directory containing the `NNN_slug.sql` migration files
    #[serde(default = "default_migrations_dir")]
    pub migrations_dir: String,
}

/// Database connection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DatabaseConfig {
    /// DuckDB file path, or `:memory:`
    #[serde(default = "default_db_path")]
    pub path: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: DatabaseConfig::default(),
            migrations_dir: default_migrations_dir(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

fn default_db_path() -> String {
    "duckdb".to_string()
}

fn default_migrations_dir() -> String {
    "migrations".to_string()
}

/// Fully resolved settings handed to the migration engine.
///
/// Built once per invocation; nothing downstream reads the environment or
/// the config file again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigratorSettings {
    /// DuckDB file path, or `:memory:`
    pub db_path: String,

    /// Absolute (or project-relative) migrations directory
    pub migrations_dir: PathBuf,
}

impl MigratorSettings {
    /// Construct settings directly, bypassing config resolution.
    pub fn new(db_path: impl Into<String>, migrations_dir: impl Into<PathBuf>) -> Self {
        Self {
            db_path: db_path.into(),
            migrations_dir: migrations_dir.into(),
        }
    }
}

impl Config {
    /// Load configuration from a specific file
    pub fn load(path: &Path) -> CoreResult<Self> {
        if !path.exists() {
            return Err(CoreError::ConfigNotFound {
                path: path.display().to_string(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| CoreError::io(path, e))?;
        let config: Config =
            serde_yaml::from_str(&content).map_err(|e| CoreError::ConfigParseError {
                path: path.display().to_string(),
                source: e,
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a project directory.
    ///
    /// Looks for duckdbm.yml or duckdbm.yaml and falls back to defaults when
    /// neither exists.
    pub fn load_from_dir(dir: &Path) -> CoreResult<Self> {
        for name in CONFIG_FILE_NAMES {
            let path = dir.join(name);
            if path.exists() {
                return Self::load(&path);
            }
        }
        log::debug!("No config file in {}, using defaults", dir.display());
        Ok(Self::default())
    }

    fn validate(&self) -> CoreResult<()> {
        if self.database.path.trim().is_empty() {
            return Err(CoreError::ConfigInvalid {
                message: "database.path cannot be empty".to_string(),
            });
        }
        if self.migrations_dir.trim().is_empty() {
            return Err(CoreError::ConfigInvalid {
                message: "migrations_dir cannot be empty".to_string(),
            });
        }
        Ok(())
    }

    /// Resolve the database path.
    ///
    /// Priority: CLI flag > DUCKDBM_DATABASE env var > config file > default
    pub fn resolve_database(&self, cli_db: Option<&str>) -> String {
        cli_db
            .map(String::from)
            .or_else(|| non_empty_env(DATABASE_ENV))
            .unwrap_or_else(|| self.database.path.clone())
    }

    /// Resolve the migrations directory against the project root.
    ///
    /// Priority: CLI flag > DUCKDBM_MIGRATIONS_DIR env var > config file > default
    pub fn resolve_migrations_dir(&self, root: &Path, cli_dir: Option<&str>) -> PathBuf {
        let dir = cli_dir
            .map(String::from)
            .or_else(|| non_empty_env(MIGRATIONS_DIR_ENV))
            .unwrap_or_else(|| self.migrations_dir.clone());
        root.join(dir)
    }

    /// Resolve everything the engine needs into one immutable value.
    pub fn settings(
        &self,
        root: &Path,
        cli_db: Option<&str>,
        cli_dir: Option<&str>,
    ) -> MigratorSettings {
        let db_path = self.resolve_database(cli_db);
        let db_path = if db_path == ":memory:" || Path::new(&db_path).is_absolute() {
            db_path
        } else {
            root.join(db_path).display().to_string()
        };
        MigratorSettings {
            db_path,
            migrations_dir: self.resolve_migrations_dir(root, cli_dir),
        }
    }
}

fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
