// src/migrate/batch.rs

//! Batch driver for migrate and reset runs
//!
//! Selects records from the database, runs them through the [`Migrator`] on
//! a bounded worker pool and collects the counts and audit rows. Each worker
//! opens its own connection. Cancellation is checked before each record.

use super::{AuditLog, MigrationConfig, Migrator, OutcomeRecord, ResetOutcome};
use crate::db;
use crate::db::models::{MigrationCursor, Post, PostStatus, RecordType};
use crate::error::Result;
use crate::progress::ProgressTracker;
use crate::store::SqliteStore;
use chrono::{DateTime, Utc};
use rayon::prelude::*;
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Which batch operation produced a report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BatchOperation {
    Migrate,
    Reset,
}

/// Summary of one batch run
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub operation: BatchOperation,
    pub dry_run: bool,
    pub record_type: RecordType,
    pub status: PostStatus,
    pub started_at: DateTime<Utc>,
    pub elapsed_ms: u64,
    /// Records selected for the batch
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    /// Reset only: records left alone because no snapshot exists
    pub no_snapshot: usize,
    /// True if the batch stopped before every record was handled
    pub cancelled: bool,
    /// Cursor stored after this run, if it moved
    pub cursor: Option<i64>,
    /// Audit rows, sorted by record id
    pub records: Vec<OutcomeRecord>,
}

impl BatchReport {
    fn new(operation: BatchOperation, config: &MigrationConfig, started_at: DateTime<Utc>) -> Self {
        Self {
            operation,
            dry_run: config.dry_run,
            record_type: config.record_type,
            status: config.status,
            started_at,
            elapsed_ms: 0,
            total: 0,
            succeeded: 0,
            failed: 0,
            no_snapshot: 0,
            cancelled: false,
            cursor: None,
            records: Vec::new(),
        }
    }

    /// Records that were handled before the batch stopped
    pub fn processed(&self) -> usize {
        self.succeeded + self.failed + self.no_snapshot
    }
}

/// Per-record result reported by a worker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RecordResult {
    Succeeded,
    Failed,
    NoSnapshot,
    Cancelled,
}

fn is_cancelled(cancel: Option<&AtomicBool>) -> bool {
    cancel.is_some_and(|flag| flag.load(Ordering::Relaxed))
}

fn build_pool(jobs: usize) -> Result<rayon::ThreadPool> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(jobs.max(1))
        .thread_name(|i| format!("migrate-worker-{}", i))
        .build()?;
    Ok(pool)
}

/// Run `handle` over `posts` on the worker pool, preserving input order
fn run_workers<F>(
    db_path: &str,
    posts: &[Post],
    jobs: usize,
    progress: &dyn ProgressTracker,
    cancel: Option<&AtomicBool>,
    handle: F,
) -> Result<Vec<RecordResult>>
where
    F: Fn(&SqliteStore, &Post) -> RecordResult + Send + Sync,
{
    let pool = build_pool(jobs)?;
    debug!("Processing {} records on {} workers", posts.len(), jobs.max(1));

    let results: Vec<RecordResult> = pool.install(|| {
        posts
            .par_iter()
            .map_init(
                || SqliteStore::open(db_path),
                |store, post| {
                    if is_cancelled(cancel) {
                        return RecordResult::Cancelled;
                    }
                    let result = match store {
                        Ok(store) => handle(store, post),
                        Err(e) => {
                            warn!("Record {}: worker has no database connection: {}", post.id, e);
                            RecordResult::Failed
                        }
                    };
                    progress.increment(1);
                    result
                },
            )
            .collect()
    });

    Ok(results)
}

fn tally(report: &mut BatchReport, results: &[RecordResult]) {
    for result in results {
        match result {
            RecordResult::Succeeded => report.succeeded += 1,
            RecordResult::Failed => report.failed += 1,
            RecordResult::NoSnapshot => report.no_snapshot += 1,
            RecordResult::Cancelled => report.cancelled = true,
        }
    }
}

/// Highest id of the leading run of successfully processed records
fn contiguous_prefix(posts: &[Post], results: &[RecordResult]) -> Option<i64> {
    posts
        .iter()
        .zip(results)
        .take_while(|(_, result)| **result == RecordResult::Succeeded)
        .last()
        .map(|(post, _)| post.id)
}

/// Migrate every selected record
///
/// Fails only if the database is unavailable before any record is touched;
/// per-record failures are counted in the report.
pub fn run_migrate(
    db_path: &str,
    config: &MigrationConfig,
    progress: &dyn ProgressTracker,
    cancel: Option<&AtomicBool>,
) -> Result<BatchReport> {
    let started_at = Utc::now();
    let timer = Instant::now();
    let mut report = BatchReport::new(BatchOperation::Migrate, config, started_at);

    let conn = db::open(db_path)?;
    let run_key = config.run_key();

    let after_id = if config.resume {
        let cursor = MigrationCursor::get(&conn, &run_key)?.map(|c| c.last_record_id);
        if let Some(id) = cursor {
            info!("Resuming {} after record {}", run_key, id);
        }
        cursor
    } else {
        None
    };

    let posts = Post::select(&conn, &config.query(after_id))?;
    report.total = posts.len();
    info!(
        "Found {} {} records ({}) to pass through migration",
        posts.len(),
        config.record_type,
        config.status
    );
    progress.set_length(posts.len() as u64);
    progress.set_message(&format!("Migrating {}", run_key));

    let migrator = Migrator::divi();
    let audit = AuditLog::new();

    let results = run_workers(db_path, &posts, config.jobs, progress, cancel, |store, post| {
        match migrator.migrate_document(store, post, config) {
            Ok(outcome) => {
                audit.append(outcome.records);
                if outcome.succeeded {
                    RecordResult::Succeeded
                } else {
                    RecordResult::Failed
                }
            }
            Err(e) => {
                warn!("Record {}: {}", post.id, e);
                RecordResult::Failed
            }
        }
    })?;

    tally(&mut report, &results);
    report.records = audit.into_rows();

    if !config.dry_run
        && let Some(last_id) = contiguous_prefix(&posts, &results)
    {
        MigrationCursor::set(&conn, &run_key, last_id)?;
        debug!("Cursor {} moved to {}", run_key, last_id);
        report.cursor = Some(last_id);
    }

    if report.cancelled {
        progress.finish_with_error(&format!("cancelled after {} records", report.processed()));
    } else {
        progress.finish_with_message("done");
    }

    report.elapsed_ms = timer.elapsed().as_millis() as u64;
    Ok(report)
}

/// Restore every selected record from its snapshot
///
/// An apply-mode reset also clears the resume cursor for the selection.
pub fn run_reset(
    db_path: &str,
    config: &MigrationConfig,
    progress: &dyn ProgressTracker,
    cancel: Option<&AtomicBool>,
) -> Result<BatchReport> {
    let started_at = Utc::now();
    let timer = Instant::now();
    let mut report = BatchReport::new(BatchOperation::Reset, config, started_at);

    let conn = db::open(db_path)?;
    let posts = Post::select(&conn, &config.query(None))?;
    report.total = posts.len();
    info!(
        "Found {} {} records ({}) to restore",
        posts.len(),
        config.record_type,
        config.status
    );
    progress.set_length(posts.len() as u64);
    progress.set_message(&format!("Restoring {}", config.run_key()));

    let migrator = Migrator::divi();
    let results = run_workers(db_path, &posts, config.jobs, progress, cancel, |store, post| {
        match migrator.reset_document(store, post, config.dry_run) {
            Ok(ResetOutcome::Restored | ResetOutcome::WouldRestore) => RecordResult::Succeeded,
            Ok(ResetOutcome::NoSnapshot) => RecordResult::NoSnapshot,
            Ok(ResetOutcome::Failed(_)) => RecordResult::Failed,
            Err(e) => {
                warn!("Record {}: {}", post.id, e);
                RecordResult::Failed
            }
        }
    })?;

    tally(&mut report, &results);

    if !config.dry_run {
        MigrationCursor::clear(&conn, &config.run_key())?;
    }

    if report.cancelled {
        progress.finish_with_error(&format!("cancelled after {} records", report.processed()));
    } else {
        progress.finish_with_message("done");
    }

    report.elapsed_ms = timer.elapsed().as_millis() as u64;
    Ok(report)
}
