// src/db/models.rs

//! Data models for the content store
//!
//! Rust structs for each table plus the queries the migrator needs.

use crate::error::{Error, Result};
use chrono::Utc;
use rusqlite::{Connection, OptionalExtension, Row, params};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Record types a batch can target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordType {
    #[default]
    Post,
    Page,
    Project,
}

impl RecordType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordType::Post => "post",
            RecordType::Page => "page",
            RecordType::Project => "project",
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for RecordType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "post" => Ok(RecordType::Post),
            "page" => Ok(RecordType::Page),
            "project" => Ok(RecordType::Project),
            _ => Err(Error::ParseError(format!("invalid record type: {}", s))),
        }
    }
}

/// Publication status filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    #[default]
    Publish,
    Draft,
}

impl PostStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PostStatus::Publish => "publish",
            PostStatus::Draft => "draft",
        }
    }
}

impl fmt::Display for PostStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for PostStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "publish" => Ok(PostStatus::Publish),
            "draft" => Ok(PostStatus::Draft),
            _ => Err(Error::ParseError(format!("invalid post status: {}", s))),
        }
    }
}

/// A document in the corpus
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: i64,
    pub post_type: RecordType,
    pub post_status: String,
    #[serde(default)]
    pub title: String,
    pub content: String,
    /// Local modification time, preserved verbatim across rewrites
    pub modified: String,
    /// GMT modification time, preserved verbatim across rewrites
    pub modified_gmt: String,
}

/// Selection of posts for a batch, ordered by id ascending
#[derive(Debug, Clone, Default)]
pub struct PostQuery {
    pub record_type: RecordType,
    pub status: PostStatus,
    pub limit: Option<usize>,
    /// Only ids strictly greater than this
    pub after_id: Option<i64>,
}

const POST_COLUMNS: &str = "id, post_type, post_status, title, content, modified, modified_gmt";

impl Post {
    /// Insert this post, or update the existing row in place
    ///
    /// The row is never deleted, so its snapshot survives a re-import.
    pub fn upsert(&self, conn: &Connection) -> Result<()> {
        conn.execute(
            "INSERT INTO posts (id, post_type, post_status, title, content, modified, modified_gmt)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
             ON CONFLICT(id) DO UPDATE SET
                 post_type = excluded.post_type,
                 post_status = excluded.post_status,
                 title = excluded.title,
                 content = excluded.content,
                 modified = excluded.modified,
                 modified_gmt = excluded.modified_gmt",
            params![
                self.id,
                self.post_type.as_str(),
                &self.post_status,
                &self.title,
                &self.content,
                &self.modified,
                &self.modified_gmt,
            ],
        )?;
        Ok(())
    }

    /// Find a post by ID
    pub fn find_by_id(conn: &Connection, id: i64) -> Result<Option<Self>> {
        let mut stmt = conn.prepare(&format!("SELECT {} FROM posts WHERE id = ?1", POST_COLUMNS))?;
        let post = stmt.query_row([id], Self::from_row).optional()?;
        Ok(post)
    }

    /// Select posts matching a query
    pub fn select(conn: &Connection, query: &PostQuery) -> Result<Vec<Self>> {
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM posts
             WHERE post_type = ?1 AND post_status = ?2 AND id > ?3
             ORDER BY id ASC LIMIT ?4",
            POST_COLUMNS
        ))?;

        // SQLite treats a negative LIMIT as unbounded
        let limit = query.limit.map(|l| l as i64).unwrap_or(-1);
        let posts = stmt
            .query_map(
                params![
                    query.record_type.as_str(),
                    query.status.as_str(),
                    query.after_id.unwrap_or(i64::MIN),
                    limit,
                ],
                Self::from_row,
            )?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(posts)
    }

    /// Overwrite a post's content, writing back the given modification times
    ///
    /// Returns the number of rows updated (0 if the post does not exist).
    pub fn update_content(
        conn: &Connection,
        id: i64,
        content: &str,
        modified: &str,
        modified_gmt: &str,
    ) -> Result<usize> {
        let rows = conn.execute(
            "UPDATE posts SET content = ?1, modified = ?2, modified_gmt = ?3 WHERE id = ?4",
            params![content, modified, modified_gmt, id],
        )?;
        Ok(rows)
    }

    /// Count posts of a type and status
    pub fn count(conn: &Connection, record_type: RecordType, status: PostStatus) -> Result<i64> {
        let count = conn.query_row(
            "SELECT COUNT(*) FROM posts WHERE post_type = ?1 AND post_status = ?2",
            params![record_type.as_str(), status.as_str()],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        let type_str: String = row.get(1)?;
        let post_type = type_str.parse::<RecordType>().map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(
                1,
                rusqlite::types::Type::Text,
                Box::new(std::io::Error::new(
                    std::io::ErrorKind::InvalidData,
                    e.to_string(),
                )),
            )
        })?;

        Ok(Self {
            id: row.get(0)?,
            post_type,
            post_status: row.get(2)?,
            title: row.get(3)?,
            content: row.get(4)?,
            modified: row.get(5)?,
            modified_gmt: row.get(6)?,
        })
    }
}

/// Original content captured before the first migration attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub post_id: i64,
    pub content: String,
    pub captured_at: String,
}

impl Snapshot {
    /// Capture a snapshot unless a non-empty one already exists
    ///
    /// Returns true if this call stored it. An empty snapshot counts as
    /// absent and is replaced; a non-empty one is never overwritten.
    pub fn capture(conn: &Connection, post_id: i64, content: &str) -> Result<bool> {
        let rows = conn.execute(
            "INSERT INTO snapshots (post_id, content, captured_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(post_id) DO UPDATE SET
                 content = excluded.content,
                 captured_at = excluded.captured_at
             WHERE snapshots.content = ''",
            params![post_id, content, Utc::now().to_rfc3339()],
        )?;
        Ok(rows > 0)
    }

    /// Find the snapshot for a post
    ///
    /// An empty stored snapshot is reported as absent.
    pub fn find(conn: &Connection, post_id: i64) -> Result<Option<Self>> {
        let snapshot = conn
            .query_row(
                "SELECT post_id, content, captured_at FROM snapshots
                 WHERE post_id = ?1 AND content != ''",
                [post_id],
                |row| {
                    Ok(Self {
                        post_id: row.get(0)?,
                        content: row.get(1)?,
                        captured_at: row.get(2)?,
                    })
                },
            )
            .optional()?;
        Ok(snapshot)
    }

    pub fn count(conn: &Connection) -> Result<i64> {
        let count = conn.query_row("SELECT COUNT(*) FROM snapshots", [], |row| row.get(0))?;
        Ok(count)
    }
}

/// A media library entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub id: i64,
    pub url: String,
}

impl Attachment {
    pub fn upsert(&self, conn: &Connection) -> Result<()> {
        conn.execute(
            "INSERT OR REPLACE INTO attachments (id, url) VALUES (?1, ?2)",
            params![self.id, &self.url],
        )?;
        Ok(())
    }

    /// Attachment id for a URL
    ///
    /// Tries the URL as given, then the same URL with the other of
    /// `http`/`https`.
    pub fn resolve_url(conn: &Connection, url: &str) -> Result<Option<i64>> {
        let mut candidates = vec![url.to_string()];
        if let Some(rest) = url.strip_prefix("http://") {
            candidates.push(format!("https://{}", rest));
        } else if let Some(rest) = url.strip_prefix("https://") {
            candidates.push(format!("http://{}", rest));
        }

        let mut stmt = conn.prepare("SELECT id FROM attachments WHERE url = ?1")?;
        for candidate in candidates {
            if let Some(id) = stmt.query_row([&candidate], |row| row.get(0)).optional()? {
                return Ok(Some(id));
            }
        }
        Ok(None)
    }

    pub fn count(conn: &Connection) -> Result<i64> {
        let count = conn.query_row("SELECT COUNT(*) FROM attachments", [], |row| row.get(0))?;
        Ok(count)
    }
}

/// Last fully processed record id of a batch, per run key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationCursor {
    pub run_key: String,
    pub last_record_id: i64,
    pub updated_at: String,
}

impl MigrationCursor {
    /// Cursor key for a record type and status
    pub fn run_key(record_type: RecordType, status: PostStatus) -> String {
        format!("{}:{}", record_type, status)
    }

    pub fn get(conn: &Connection, run_key: &str) -> Result<Option<Self>> {
        let cursor = conn
            .query_row(
                "SELECT run_key, last_record_id, updated_at FROM migration_cursors WHERE run_key = ?1",
                [run_key],
                Self::from_row,
            )
            .optional()?;
        Ok(cursor)
    }

    /// Store the cursor, replacing any previous value
    pub fn set(conn: &Connection, run_key: &str, last_record_id: i64) -> Result<()> {
        conn.execute(
            "INSERT OR REPLACE INTO migration_cursors (run_key, last_record_id, updated_at)
             VALUES (?1, ?2, ?3)",
            params![run_key, last_record_id, Utc::now().to_rfc3339()],
        )?;
        Ok(())
    }

    pub fn clear(conn: &Connection, run_key: &str) -> Result<()> {
        conn.execute("DELETE FROM migration_cursors WHERE run_key = ?1", [run_key])?;
        Ok(())
    }

    pub fn list_all(conn: &Connection) -> Result<Vec<Self>> {
        let mut stmt = conn.prepare(
            "SELECT run_key, last_record_id, updated_at FROM migration_cursors ORDER BY run_key",
        )?;
        let cursors = stmt
            .query_map([], Self::from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(cursors)
    }

    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            run_key: row.get(0)?,
            last_record_id: row.get(1)?,
            updated_at: row.get(2)?,
        })
    }
}
