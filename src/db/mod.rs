// src/db/mod.rs

//! SQLite content store
//!
//! Holds the corpus (posts), the pre-migration snapshots, the media library
//! used to resolve attachment URLs, and resumable batch cursors.

pub mod models;
pub mod paths;
pub mod schema;

use crate::error::{Error, Result};
use rusqlite::{Connection, Transaction};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};

/// How long a worker waits on a locked database before failing a write
const BUSY_TIMEOUT: Duration = Duration::from_secs(30);

/// Create (or upgrade) the database at `db_path`
pub fn init(db_path: &str) -> Result<()> {
    info!("Initializing database at: {}", db_path);

    if let Some(parent) = Path::new(db_path).parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }

    let conn = Connection::open(db_path)?;
    configure(&conn)?;
    schema::migrate(&conn)?;
    Ok(())
}

/// Open an initialized database
///
/// Fails with [`Error::StoreUnavailable`] when the file does not exist or
/// has no schema, so a batch can abort before touching any record.
pub fn open(db_path: &str) -> Result<Connection> {
    if !Path::new(db_path).exists() {
        return Err(Error::StoreUnavailable(format!(
            "database not found at {} (run `init` first)",
            db_path
        )));
    }

    let conn = Connection::open(db_path)
        .map_err(|e| Error::StoreUnavailable(format!("{}: {}", db_path, e)))?;
    configure(&conn)?;

    let version = schema::get_schema_version(&conn)?;
    if version == 0 {
        return Err(Error::StoreUnavailable(format!(
            "database at {} has no schema (run `init` first)",
            db_path
        )));
    }
    if version < schema::SCHEMA_VERSION {
        debug!("Upgrading schema from version {}", version);
        schema::migrate(&conn)?;
    }

    Ok(conn)
}

fn configure(conn: &Connection) -> Result<()> {
    conn.busy_timeout(BUSY_TIMEOUT)?;
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    // Concurrent workers each hold a connection
    let mode: String =
        conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))?;
    debug!("SQLite journal mode: {}", mode);
    Ok(())
}

/// Run `f` inside a transaction, committing on success
pub fn transaction<T, F>(conn: &mut Connection, f: F) -> Result<T>
where
    F: FnOnce(&Transaction) -> Result<T>,
{
    let tx = conn.transaction()?;
    let value = f(&tx)?;
    tx.commit()?;
    Ok(value)
}
