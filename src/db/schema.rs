// src/db/schema.rs

//! Database schema definitions and migrations
//!
//! The schema is versioned; `migrate` applies every pending version in order.

use crate::error::{Error, Result};
use rusqlite::Connection;
use tracing::{debug, info};

/// Current schema version
pub const SCHEMA_VERSION: i32 = 2;

/// Initialize the schema version tracking table
fn init_schema_version(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        )",
        [],
    )?;
    Ok(())
}

/// Get the current schema version from the database
pub fn get_schema_version(conn: &Connection) -> Result<i32> {
    init_schema_version(conn)?;

    let version = conn
        .query_row(
            "SELECT version FROM schema_version ORDER BY version DESC LIMIT 1",
            [],
            |row| row.get(0),
        )
        .unwrap_or(0);

    Ok(version)
}

fn set_schema_version(conn: &Connection, version: i32) -> Result<()> {
    conn.execute("INSERT INTO schema_version (version) VALUES (?1)", [version])?;
    Ok(())
}

/// Apply all pending migrations to bring the database up to date
pub fn migrate(conn: &Connection) -> Result<()> {
    let current_version = get_schema_version(conn)?;
    debug!("Current schema version: {}", current_version);

    if current_version >= SCHEMA_VERSION {
        return Ok(());
    }

    for version in (current_version + 1)..=SCHEMA_VERSION {
        info!("Applying schema migration to version {}", version);
        apply_migration(conn, version)?;
        set_schema_version(conn, version)?;
    }

    Ok(())
}

fn apply_migration(conn: &Connection, version: i32) -> Result<()> {
    match version {
        1 => migrate_v1(conn),
        2 => migrate_v2(conn),
        _ => Err(Error::NotFoundError(format!(
            "schema migration for version {}",
            version
        ))),
    }
}

/// Version 1: corpus, snapshots and media library
///
/// - posts: the documents being migrated
/// - snapshots: first-captured original content, one per post, never updated
/// - attachments: media library URLs for attachment id lookup
fn migrate_v1(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE posts (
            id INTEGER PRIMARY KEY,
            post_type TEXT NOT NULL CHECK(post_type IN ('post', 'page', 'project')),
            post_status TEXT NOT NULL,
            title TEXT NOT NULL DEFAULT '',
            content TEXT NOT NULL,
            modified TEXT NOT NULL,
            modified_gmt TEXT NOT NULL
        );

        CREATE INDEX idx_posts_type_status ON posts(post_type, post_status);

        CREATE TABLE snapshots (
            post_id INTEGER PRIMARY KEY,
            content TEXT NOT NULL,
            captured_at TEXT NOT NULL,
            FOREIGN KEY (post_id) REFERENCES posts(id) ON DELETE CASCADE
        );

        CREATE TABLE attachments (
            id INTEGER PRIMARY KEY,
            url TEXT NOT NULL UNIQUE
        );
        ",
    )?;
    Ok(())
}

/// Version 2: resumable batch cursors
fn migrate_v2(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE migration_cursors (
            run_key TEXT PRIMARY KEY,
            last_record_id INTEGER NOT NULL,
            updated_at TEXT NOT NULL
        );
        ",
    )?;
    Ok(())
}
