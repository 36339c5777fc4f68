// src/error.rs

//! Error types for shortcode-migrate
//!
//! Only conditions that stop work are errors. Unresolved media references,
//! missing closing tags and unknown tag names are handled as fallbacks by
//! the converters and the orchestrator and never surface here.

use thiserror::Error;

/// Result type used throughout the library
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while migrating or restoring content
#[derive(Error, Debug)]
pub enum Error {
    /// The content store cannot be reached at all (fatal for a batch)
    #[error("content store unavailable: {0}")]
    StoreUnavailable(String),

    /// Writing migrated or restored content back to a record failed
    #[error("failed to persist record {record_id}: {reason}")]
    PersistError { record_id: i64, reason: String },

    /// Database operation failed
    #[error("database error: {0}")]
    DatabaseError(#[from] rusqlite::Error),

    /// IO error (audit file, import file)
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// A value could not be parsed (record type, status, ...)
    #[error("parse error: {0}")]
    ParseError(String),

    /// A requested record does not exist
    #[error("not found: {0}")]
    NotFoundError(String),

    /// The worker pool for a batch could not be started
    #[error("worker pool error: {0}")]
    WorkerPoolError(#[from] rayon::ThreadPoolBuildError),
}

impl Error {
    /// Build a persist error for a record
    pub fn persist(record_id: i64, reason: impl Into<String>) -> Self {
        Self::PersistError {
            record_id,
            reason: reason.into(),
        }
    }
}
