// src/lib.rs

//! Divi shortcode to Gutenberg block migration
//!
//! Rewrites legacy `[et_pb_* ...]` shortcodes in post content into block
//! comment markup, with an auditable dry-run and snapshot-based reset.
//!
//! # Architecture
//!
//! - Database-first: corpus, snapshots, media library and cursors in SQLite
//! - Data-driven classification: each tag name maps to skip, clear or migrate
//! - Offset-based rewriting: edits are planned against the scanned text
//! - One converter per migratable tag family (video, button, image)

pub mod convert;
pub mod db;
mod error;
pub mod migrate;
pub mod progress;
pub mod shortcode;
pub mod store;

pub use convert::{BlockConverter, Conversion, ConversionStatus, ConverterKey, ConverterSet, MediaResolver};
pub use error::{Error, Result};
pub use migrate::{
    AuditLog, BatchReport, DocumentOutcome, MigrationConfig, Migrator, OutcomeRecord,
    OutcomeStatus, ResetOutcome, StatusKind, run_migrate, run_reset,
};
pub use progress::{LogProgress, ProgressTracker, SilentProgress};
pub use shortcode::{AttributeSet, EditPlan, TagAction, TagRegistry, TagRule, TagToken, scan};
pub use store::{ContentStore, SqliteStore};
