use super::*;
use serial_test::serial;
use std::fs;
use tempfile::tempdir;

#[test]
fn test_parse_empty_config_uses_defaults() {
    let config: Config = serde_yaml::from_str("{}").unwrap();
    assert_eq!(config.database.path, "duckdb");
    assert_eq!(config.migrations_dir, "migrations");
}

#[test]
fn test_default_matches_empty_config() {
    let parsed: Config = serde_yaml::from_str("{}").unwrap();
    let default = Config::default();
    assert_eq!(default.database.path, parsed.database.path);
    assert_eq!(default.migrations_dir, parsed.migrations_dir);
    assert_eq!(default.migrations_dir, "migrations");
}

#[test]
fn test_parse_full_config() {
    let yaml = r#"
database:
  path: ./warehouse.duckdb
migrations_dir: db/migrations
"#;
    let config: Config = serde_yaml::from_str(yaml).unwrap();
    assert_eq!(config.database.path, "./warehouse.duckdb");
    assert_eq!(config.migrations_dir, "db/migrations");
}

#[test]
fn test_unknown_fields_rejected() {
    let yaml = r#"
migrations_dir: migrations
migration_table: custom
"#;
    let result: Result<Config, _> = serde_yaml::from_str(yaml);
    assert!(result.is_err());
}

#[test]
fn test_load_missing_file_is_error() {
    let dir = tempdir().unwrap();
    let err = Config::load(&dir.path().join("nope.yml")).unwrap_err();
    assert!(matches!(err, CoreError::ConfigNotFound { .. }));
}

#[test]
fn test_load_from_dir_without_file_returns_defaults() {
    let dir = tempdir().unwrap();
    let config = Config::load_from_dir(dir.path()).unwrap();
    assert_eq!(config.database.path, "duckdb");
    assert_eq!(config.migrations_dir, "migrations");
}

#[test]
fn test_load_from_dir_prefers_yml() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("duckdbm.yml"), "migrations_dir: from_yml\n").unwrap();
    fs::write(dir.path().join("duckdbm.yaml"), "migrations_dir: from_yaml\n").unwrap();
    let config = Config::load_from_dir(dir.path()).unwrap();
    assert_eq!(config.migrations_dir, "from_yml");
}

#[test]
fn test_load_rejects_empty_database_path() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("duckdbm.yml");
    fs::write(&path, "database:\n  path: \"\"\n").unwrap();
    let err = Config::load(&path).unwrap_err();
    assert!(matches!(err, CoreError::ConfigInvalid { .. }));
}

#[test]
fn test_load_reports_parse_error_with_path() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("duckdbm.yml");
    fs::write(&path, "database: [unclosed\n").unwrap();
    let err = Config::load(&path).unwrap_err();
    assert!(err.to_string().contains("duckdbm.yml"));
}

// These tests modify environment variables and must run serially

#[test]
#[serial]
fn test_resolve_database_cli_takes_precedence() {
    let original = std::env::var(DATABASE_ENV).ok();
    std::env::set_var(DATABASE_ENV, "from_env.duckdb");
    let config = Config::default();
    assert_eq!(config.resolve_database(Some("cli.duckdb")), "cli.duckdb");
    match original {
        Some(v) => std::env::set_var(DATABASE_ENV, v),
        None => std::env::remove_var(DATABASE_ENV),
    }
}

#[test]
#[serial]
fn test_resolve_database_uses_env_var() {
    let original = std::env::var(DATABASE_ENV).ok();
    std::env::set_var(DATABASE_ENV, "from_env.duckdb");
    let config = Config::default();
    assert_eq!(config.resolve_database(None), "from_env.duckdb");
    match original {
        Some(v) => std::env::set_var(DATABASE_ENV, v),
        None => std::env::remove_var(DATABASE_ENV),
    }
}

#[test]
#[serial]
fn test_resolve_database_falls_back_to_config() {
    let original = std::env::var(DATABASE_ENV).ok();
    std::env::remove_var(DATABASE_ENV);
    let config: Config = serde_yaml::from_str("database:\n  path: cfg.duckdb\n").unwrap();
    assert_eq!(config.resolve_database(None), "cfg.duckdb");
    if let Some(v) = original {
        std::env::set_var(DATABASE_ENV, v);
    }
}

#[test]
#[serial]
fn test_settings_resolves_relative_paths_against_root() {
    let original_db = std::env::var(DATABASE_ENV).ok();
    let original_dir = std::env::var(MIGRATIONS_DIR_ENV).ok();
    std::env::remove_var(DATABASE_ENV);
    std::env::remove_var(MIGRATIONS_DIR_ENV);

    let root = Path::new("/srv/project");
    let settings = Config::default().settings(root, None, None);
    assert_eq!(settings.db_path, root.join("duckdb").display().to_string());
    assert_eq!(settings.migrations_dir, root.join("migrations"));

    let settings = Config::default().settings(root, Some(":memory:"), Some("sql"));
    assert_eq!(settings.db_path, ":memory:");
    assert_eq!(settings.migrations_dir, root.join("sql"));

    if let Some(v) = original_db {
        std::env::set_var(DATABASE_ENV, v);
    }
    if let Some(v) = original_dir {
        std::env::set_var(MIGRATIONS_DIR_ENV, v);
    }
}
