// src/db/paths.rs
//! Centralized path derivation for files kept next to the database

use std::path::{Path, PathBuf};

/// Environment override for the audit log directory
pub const LOG_DIR_ENV: &str = "SHORTCODE_MIGRATE_LOG_DIR";

/// Get the directory containing the database
pub fn db_dir(db_path: &str) -> PathBuf {
    match Path::new(db_path).parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Get the audit log directory
///
/// `SHORTCODE_MIGRATE_LOG_DIR` wins over the default `<db dir>/migration-logs`.
pub fn log_dir(db_path: &str) -> PathBuf {
    std::env::var(LOG_DIR_ENV)
        .ok()
        .filter(|dir| !dir.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| default_log_dir(db_path))
}

fn default_log_dir(db_path: &str) -> PathBuf {
    db_dir(db_path).join("migration-logs")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_db_dir() {
        assert_eq!(
            db_dir("/srv/site/migration.db"),
            PathBuf::from("/srv/site")
        );
    }

    #[test]
    fn test_db_dir_bare_file_name() {
        assert_eq!(db_dir("migration.db"), PathBuf::from("."));
    }

    #[test]
    fn test_default_log_dir() {
        assert_eq!(
            default_log_dir("/srv/site/migration.db"),
            PathBuf::from("/srv/site/migration-logs")
        );
    }
}
