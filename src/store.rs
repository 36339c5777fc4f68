// src/store.rs

//! Content store seen by the migrator
//!
//! The migrator only needs to read and capture snapshots, write content
//! back, and look up media. [`SqliteStore`] provides all of it on top of
//! the database in [`crate::db`].

use crate::convert::MediaResolver;
use crate::db;
use crate::db::models::{Attachment, Post, Snapshot};
use crate::error::{Error, Result};
use rusqlite::Connection;
use tracing::debug;

/// Persistence operations used while migrating or restoring one record
pub trait ContentStore: MediaResolver {
    /// Previously captured original content for a record
    ///
    /// Empty content counts as no snapshot.
    fn snapshot(&self, record_id: i64) -> Result<Option<String>>;

    /// Store the original content unless a non-empty snapshot already exists
    fn capture_snapshot(&self, record_id: i64, content: &str) -> Result<bool>;

    /// Write new content for a post, keeping its modification times
    fn persist_content(&self, post: &Post, content: &str) -> Result<()>;
}

/// Content store backed by one SQLite connection
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open an initialized database
    pub fn open(db_path: &str) -> Result<Self> {
        Ok(Self::new(db::open(db_path)?))
    }

    pub fn new(conn: Connection) -> Self {
        Self { conn }
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

impl MediaResolver for SqliteStore {
    fn resolve_attachment(&self, url: &str) -> Result<Option<i64>> {
        Attachment::resolve_url(&self.conn, url)
    }
}

impl ContentStore for SqliteStore {
    fn snapshot(&self, record_id: i64) -> Result<Option<String>> {
        Ok(Snapshot::find(&self.conn, record_id)?.map(|s| s.content))
    }

    fn capture_snapshot(&self, record_id: i64, content: &str) -> Result<bool> {
        let captured = Snapshot::capture(&self.conn, record_id, content)?;
        if captured {
            debug!("Captured snapshot for record {}", record_id);
        }
        Ok(captured)
    }

    fn persist_content(&self, post: &Post, content: &str) -> Result<()> {
        let rows = Post::update_content(
            &self.conn,
            post.id,
            content,
            &post.modified,
            &post.modified_gmt,
        )
        .map_err(|e| Error::persist(post.id, e.to_string()))?;

        if rows == 0 {
            return Err(Error::persist(post.id, "record no longer exists"));
        }
        Ok(())
    }
}
