// src/migrate/audit.rs

//! Audit log for a batch
//!
//! Workers append their records concurrently; rows come out sorted by
//! record id (stable, so a record's tags stay in document order). The CSV
//! artifact is written the same way in dry-run and apply mode.

use super::OutcomeRecord;
use crate::db::models::{PostStatus, RecordType};
use crate::error::Result;
use std::fs;
use std::path::Path;
use std::sync::Mutex;
use tracing::info;

/// CSV header row
pub const CSV_HEADER: [&str; 4] = ["record_id", "tag_name", "tag_text", "status"];

/// Shared sink for outcome records
#[derive(Debug, Default)]
pub struct AuditLog {
    rows: Mutex<Vec<OutcomeRecord>>,
}

impl AuditLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one record's outcome rows
    pub fn append(&self, records: Vec<OutcomeRecord>) {
        if records.is_empty() {
            return;
        }
        // Rows stay whole even if another worker panicked
        let mut rows = self.rows.lock().unwrap_or_else(|e| e.into_inner());
        rows.extend(records);
    }

    pub fn len(&self) -> usize {
        self.rows.lock().map(|rows| rows.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All rows, sorted by record id
    pub fn into_rows(self) -> Vec<OutcomeRecord> {
        let mut rows = self.rows.into_inner().unwrap_or_else(|e| e.into_inner());
        rows.sort_by_key(|r| r.record_id);
        rows
    }
}

/// Audit file name for a status filter and record type
pub fn file_name(status: PostStatus, record_type: RecordType) -> String {
    format!("divi-shortcode-logs-{}-{}.csv", status, record_type)
}

/// Render rows as CSV, header first
pub fn to_csv(rows: &[OutcomeRecord]) -> String {
    let mut out = String::new();
    push_line(&mut out, &CSV_HEADER);
    for row in rows {
        let record_id = row.record_id.to_string();
        let status = row.status.to_string();
        push_line(&mut out, &[&record_id, &row.tag_name, &row.tag_text, &status]);
    }
    out
}

/// Write rows to `path`, creating its directory
pub fn write_csv(path: &Path, rows: &[OutcomeRecord]) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, to_csv(rows))?;
    info!("Wrote {} audit rows to {}", rows.len(), path.display());
    Ok(())
}

fn push_line(out: &mut String, fields: &[&str]) {
    let line: Vec<String> = fields.iter().map(|f| quote_field(f)).collect();
    out.push_str(&line.join(","));
    out.push('\n');
}

/// Quote a field the way PHP's `fputcsv` does with its default `\` escape
///
/// Fields containing the delimiter, a quote, a backslash or whitespace are
/// enclosed in double quotes. Embedded quotes are doubled unless they follow
/// a backslash, which is written through as-is.
fn quote_field(field: &str) -> String {
    let needs_quotes = field
        .chars()
        .any(|c| matches!(c, ',' | '"' | '\\' | ' ' | '\t' | '\r' | '\n'));
    if !needs_quotes {
        return field.to_string();
    }

    let mut out = String::with_capacity(field.len() + 2);
    out.push('"');
    let mut escaped = false;
    for c in field.chars() {
        if c == '\\' {
            escaped = true;
        } else if !escaped && c == '"' {
            out.push('"');
        } else {
            escaped = false;
        }
        out.push(c);
    }
    out.push('"');
    out
}
