//! Migration file discovery and creation.
//!
//! Migrations are `NNN_slug.sql` files in a single directory. Application
//! order is the lexicographic order of filenames; with the fixed-width
//! numeric prefix written by [`MigrationCatalog::create`] that equals
//! ascending sequence order. Nothing is cached: every call re-reads the
//! directory.

use crate::error::{CoreError, CoreResult};
use std::fs;
use std::path::{Path, PathBuf};

/// File extension of migration scripts.
pub const MIGRATION_EXTENSION: &str = ".sql";

/// Body written into freshly created migration files.
pub const MIGRATION_SKELETON: &str = "-- MIGRATE\n\n-- ROLLBACK\n";

/// One migration script on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationFile {
    /// Numeric filename prefix, if the filename has one
    pub sequence: Option<u32>,
    /// Filename without the numeric prefix and `.sql` extension
    pub slug: String,
    /// Bare filename, the key recorded in the ledger
    pub filename: String,
    /// Full path to the file
    pub path: PathBuf,
}

impl MigrationFile {
    /// Derive ordering metadata from a filename inside `dir`.
    pub fn from_filename(dir: &Path, filename: &str) -> Self {
        let stem = filename
            .strip_suffix(MIGRATION_EXTENSION)
            .unwrap_or(filename);
        let (sequence, slug) = match stem.split_once('_') {
            Some((prefix, rest))
                if !prefix.is_empty() && prefix.bytes().all(|b| b.is_ascii_digit()) =>
            {
                (prefix.parse::<u32>().ok(), rest.to_string())
            }
            _ => (None, stem.to_string()),
        };
        Self {
            sequence,
            slug,
            filename: filename.to_string(),
            path: dir.join(filename),
        }
    }
}

/// Migration files under one directory.
#[derive(Debug, Clone)]
pub struct MigrationCatalog {
    dir: PathBuf,
}

impl MigrationCatalog {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The migrations directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Create a new `{seq:03}_{slug}.sql` skeleton and return its path.
    ///
    /// The sequence is `1 + (number of directory entries)` at call time, so two
    /// processes creating migrations concurrently can pick the same number.
    pub fn create(&self, slug: &str) -> CoreResult<PathBuf> {
        validate_slug(slug)?;

        fs::create_dir_all(&self.dir).map_err(|e| CoreError::io(&self.dir, e))?;
        let entries = fs::read_dir(&self.dir)
            .map_err(|e| CoreError::io(&self.dir, e))?
            .count();

        let filename = format!("{:03}_{}{}", entries + 1, slug, MIGRATION_EXTENSION);
        let path = self.dir.join(&filename);
        if path.exists() {
            return Err(CoreError::MigrationExists {
                path: path.display().to_string(),
            });
        }

        fs::write(&path, MIGRATION_SKELETON).map_err(|e| CoreError::io(&path, e))?;
        log::debug!("Created migration skeleton {}", path.display());
        Ok(path)
    }

    /// Every `.sql` file in the directory, sorted by filename ascending.
    ///
    /// A missing directory yields an empty list.
    pub fn list_all(&self) -> CoreResult<Vec<MigrationFile>> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::debug!("Migrations directory {} does not exist", self.dir.display());
                return Ok(Vec::new());
            }
            Err(e) => return Err(CoreError::io(&self.dir, e)),
        };

        let mut files = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| CoreError::io(&self.dir, e))?;
            let is_file = entry
                .file_type()
                .map_err(|e| CoreError::io(&entry.path(), e))?
                .is_file();
            let Some(name) = entry.file_name().to_str().map(String::from) else {
                log::warn!("Skipping non UTF-8 filename in {}", self.dir.display());
                continue;
            };
            if is_file && name.ends_with(MIGRATION_EXTENSION) {
                files.push(MigrationFile::from_filename(&self.dir, &name));
            }
        }

        files.sort_by(|a, b| a.filename.cmp(&b.filename));
        Ok(files)
    }

    /// Read the raw script bytes of a migration.
    pub fn read(&self, file: &MigrationFile) -> CoreResult<Vec<u8>> {
        fs::read(&file.path).map_err(|e| CoreError::io(&file.path, e))
    }

    /// Read a migration as UTF-8 text.
    pub fn read_to_string(&self, file: &MigrationFile) -> CoreResult<String> {
        let bytes = self.read(file)?;
        String::from_utf8(bytes).map_err(|e| {
            CoreError::io(
                &file.path,
                std::io::Error::new(std::io::ErrorKind::InvalidData, e),
            )
        })
    }

    /// Locate `{dir}/{name}.sql`; `name` may already carry the extension.
    ///
    /// Names that could resolve outside the directory are rejected.
    pub fn find(&self, name: &str) -> CoreResult<MigrationFile> {
        validate_slug(name)?;
        let filename = if name.ends_with(MIGRATION_EXTENSION) {
            name.to_string()
        } else {
            format!("{name}{MIGRATION_EXTENSION}")
        };
        let file = MigrationFile::from_filename(&self.dir, &filename);
        if !file.path.is_file() {
            return Err(CoreError::MigrationNotFound {
                path: file.path.display().to_string(),
            });
        }
        Ok(file)
    }

    /// A catalog entry for a filename recorded in the ledger.
    ///
    /// The file may no longer exist; reading it reports the IO error.
    pub fn entry(&self, filename: &str) -> MigrationFile {
        MigrationFile::from_filename(&self.dir, filename)
    }
}

/// Reject slugs that could escape the migrations directory or produce
/// confusing filenames.
fn validate_slug(slug: &str) -> CoreResult<()> {
    let reason = if slug.trim().is_empty() {
        Some("must not be empty")
    } else if slug.contains('/') || slug.contains('\\') {
        Some("must not contain path separators")
    } else if slug.contains("..") {
        Some("must not contain '..'")
    } else if slug.starts_with('.') || slug.starts_with('-') {
        Some("must not start with '.' or '-'")
    } else {
        None
    };
    match reason {
        Some(reason) => Err(CoreError::InvalidMigrationName {
            name: slug.to_string(),
            reason: reason.to_string(),
        }),
        None => Ok(()),
    }
}

#[cfg(test)]
#[path = "catalog_test.rs"]
mod tests;
