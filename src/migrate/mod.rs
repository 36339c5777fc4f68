// src/migrate/mod.rs

//! Per-document migration and restore
//!
//! [`Migrator::migrate_document`] runs one record through the pipeline:
//!
//! 1. Read the snapshot if one exists, otherwise the live content (and
//!    capture it as the snapshot).
//! 2. Scan the text once for tag openings.
//! 3. Classify each token and plan its edit: skip, clear the wrapper, or
//!    convert to block markup.
//! 4. Apply the plan, strip placeholders and, outside dry-run, persist.
//!
//! Every classified token except dry-run clears yields one
//! [`OutcomeRecord`].

pub mod audit;
pub mod batch;

pub use audit::{AuditLog, file_name, to_csv, write_csv};
pub use batch::{BatchReport, run_migrate, run_reset};

use crate::convert::{ConversionStatus, ConverterKey, ConverterSet};
use crate::db::models::{Post, PostQuery, PostStatus, RecordType};
use crate::error::Result;
use crate::shortcode::{EditPlan, TagAction, TagRegistry, TagToken, scan, strip_placeholders};
use crate::store::ContentStore;
use serde::{Serialize, Serializer};
use std::collections::HashSet;
use std::fmt;
use tracing::{debug, warn};

/// Run settings for one batch
///
/// Passed explicitly to every call; never changes during a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationConfig {
    /// Compute outcomes without writing content back
    pub dry_run: bool,
    pub record_type: RecordType,
    pub status: PostStatus,
    /// Maximum number of records to select, `None` for all
    pub limit: Option<usize>,
    /// Worker threads
    pub jobs: usize,
    /// Report source-less conversions as `unchanged` instead of `migrated`
    pub report_unchanged: bool,
    /// Only select records after the stored cursor
    pub resume: bool,
}

impl Default for MigrationConfig {
    fn default() -> Self {
        Self {
            dry_run: true,
            record_type: RecordType::default(),
            status: PostStatus::default(),
            limit: None,
            jobs: 1,
            report_unchanged: false,
            resume: false,
        }
    }
}

impl MigrationConfig {
    /// Cursor key for this run's selection
    pub fn run_key(&self) -> String {
        crate::db::models::MigrationCursor::run_key(self.record_type, self.status)
    }

    /// Record selection for this run
    pub fn query(&self, after_id: Option<i64>) -> PostQuery {
        PostQuery {
            record_type: self.record_type,
            status: self.status,
            limit: self.limit,
            after_id,
        }
    }
}

/// What happened to one tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusKind {
    Skipped,
    Cleared,
    Migrated,
    Failed,
    Unchanged,
}

impl StatusKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatusKind::Skipped => "skipped",
            StatusKind::Cleared => "cleared",
            StatusKind::Migrated => "migrated",
            StatusKind::Failed => "failed",
            StatusKind::Unchanged => "unchanged",
        }
    }
}

/// Status of an outcome record; dry-run statuses are hypothetical
///
/// Renders as `migrated`, or `to be migrated` when hypothetical.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OutcomeStatus {
    pub kind: StatusKind,
    pub hypothetical: bool,
}

impl OutcomeStatus {
    pub fn new(kind: StatusKind, dry_run: bool) -> Self {
        Self {
            kind,
            hypothetical: dry_run,
        }
    }
}

impl fmt::Display for OutcomeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.hypothetical {
            write!(f, "to be {}", self.kind.as_str())
        } else {
            f.write_str(self.kind.as_str())
        }
    }
}

impl Serialize for OutcomeStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// One audit row: a tag in a record and what happened to it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutcomeRecord {
    pub record_id: i64,
    pub tag_name: String,
    pub tag_text: String,
    pub status: OutcomeStatus,
}

/// Result of migrating one record
#[derive(Debug, Clone)]
pub struct DocumentOutcome {
    pub record_id: i64,
    /// False only when writing the new content back failed
    pub succeeded: bool,
    /// Final text (computed in dry-run too, but never written)
    pub text: String,
    pub records: Vec<OutcomeRecord>,
}

/// Result of restoring one record from its snapshot
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResetOutcome {
    /// Content was overwritten with the snapshot
    Restored,
    /// Dry-run: content would be overwritten with the snapshot
    WouldRestore,
    /// No snapshot was ever captured; the record was left untouched
    NoSnapshot,
    /// Writing the snapshot back failed
    Failed(String),
}

/// Migrates documents using a tag registry and a set of converters
pub struct Migrator {
    registry: TagRegistry,
    converters: ConverterSet,
}

impl Migrator {
    pub fn new(registry: TagRegistry, converters: ConverterSet) -> Self {
        Self {
            registry,
            converters,
        }
    }

    /// Divi vocabulary with the standard converters
    pub fn divi() -> Self {
        Self::new(TagRegistry::divi(), ConverterSet::standard())
    }

    /// Migrate one record
    ///
    /// Errors only when the store cannot be read. A failed write is
    /// reported through [`DocumentOutcome::succeeded`].
    pub fn migrate_document(
        &self,
        store: &dyn ContentStore,
        post: &Post,
        config: &MigrationConfig,
    ) -> Result<DocumentOutcome> {
        let original = match store.snapshot(post.id)?.filter(|s| !s.is_empty()) {
            Some(snapshot) => snapshot,
            None => {
                store.capture_snapshot(post.id, &post.content)?;
                post.content.clone()
            }
        };

        let tokens = scan(&original);
        debug!("Record {}: {} tag openings", post.id, tokens.len());

        let mut plan = EditPlan::new();
        let mut records = Vec::new();
        let mut cleared_names: HashSet<&str> = HashSet::new();

        for token in &tokens {
            let Some(rule) = self.registry.rule(&token.name) else {
                continue;
            };

            let (kind, tag_text) = match rule.action {
                TagAction::Skip => (StatusKind::Skipped, token.paired_text()),
                TagAction::Clear => {
                    plan.clear_opening(&original, token);
                    if cleared_names.insert(token.name.as_str()) {
                        plan.clear_closers(&original, &token.name);
                    }
                    if config.dry_run {
                        continue;
                    }
                    (StatusKind::Cleared, token.paired_text())
                }
                TagAction::Migrate => {
                    self.migrate_token(&original, token, rule.converter, store, config, &mut plan)
                }
            };

            records.push(OutcomeRecord {
                record_id: post.id,
                tag_name: token.name.clone(),
                tag_text,
                status: OutcomeStatus::new(kind, config.dry_run),
            });
        }

        let text = strip_placeholders(&plan.apply(&original));

        let succeeded = if config.dry_run {
            true
        } else {
            match store.persist_content(post, &text) {
                Ok(()) => true,
                Err(e) => {
                    warn!("Record {}: {}", post.id, e);
                    false
                }
            }
        };

        Ok(DocumentOutcome {
            record_id: post.id,
            succeeded,
            text,
            records,
        })
    }

    /// Plan the replacement for a migratable tag; returns its status and tag text
    fn migrate_token(
        &self,
        text: &str,
        token: &TagToken,
        converter: Option<ConverterKey>,
        store: &dyn ContentStore,
        config: &MigrationConfig,
        plan: &mut EditPlan,
    ) -> (StatusKind, String) {
        let Some(converter) = converter.and_then(|key| self.converters.get(key)) else {
            warn!("No converter registered for {}", token.name);
            return (StatusKind::Failed, token.paired_text());
        };

        let conversion = match converter.convert(&token.attributes(), store) {
            Ok(conversion) => conversion,
            Err(e) => {
                warn!("Converting {} failed: {}", token.name, e);
                return (StatusKind::Failed, token.paired_text());
            }
        };

        let Some(markup) = conversion.markup else {
            let kind = match conversion.status {
                ConversionStatus::Unchanged if config.report_unchanged => StatusKind::Unchanged,
                _ => StatusKind::Migrated,
            };
            return (kind, token.paired_text());
        };

        match token.match_span(text) {
            Some(span) => {
                let matched = text[span.clone()].to_string();
                plan.replace(span, markup);
                (StatusKind::Migrated, matched)
            }
            None => {
                debug!("Unterminated {} opening left in place", token.name);
                (StatusKind::Migrated, token.opening_tag())
            }
        }
    }

    /// Restore one record's content from its snapshot
    pub fn reset_document(
        &self,
        store: &dyn ContentStore,
        post: &Post,
        dry_run: bool,
    ) -> Result<ResetOutcome> {
        let Some(snapshot) = store.snapshot(post.id)?.filter(|s| !s.is_empty()) else {
            debug!("Record {} has no snapshot", post.id);
            return Ok(ResetOutcome::NoSnapshot);
        };

        if dry_run {
            return Ok(ResetOutcome::WouldRestore);
        }

        match store.persist_content(post, &snapshot) {
            Ok(()) => Ok(ResetOutcome::Restored),
            Err(e) => {
                warn!("Record {}: {}", post.id, e);
                Ok(ResetOutcome::Failed(e.to_string()))
            }
        }
    }
}

impl Default for Migrator {
    fn default() -> Self {
        Self::divi()
    }
}
