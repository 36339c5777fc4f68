// tests/common/mod.rs

//! Shared test utilities and helpers for integration tests.

#![allow(dead_code)]

use shortcode_migrate::db;
use shortcode_migrate::db::models::{Attachment, Post, RecordType};
use shortcode_migrate::{BatchReport, MigrationConfig, SilentProgress};
use tempfile::TempDir;

pub const MODIFIED: &str = "2019-03-04 05:06:07";
pub const MODIFIED_GMT: &str = "2019-03-04 03:06:07";

/// Build a published post
pub fn post(id: i64, content: &str) -> Post {
    Post {
        id,
        post_type: RecordType::Post,
        post_status: "publish".to_string(),
        title: format!("Post {}", id),
        content: content.to_string(),
        modified: MODIFIED.to_string(),
        modified_gmt: MODIFIED_GMT.to_string(),
    }
}

/// Create an initialized database holding `posts` and `attachments`.
///
/// Returns (TempDir, db_path) - keep the TempDir alive to prevent cleanup.
pub fn setup_test_db(posts: &[Post], attachments: &[(i64, &str)]) -> (TempDir, String) {
    let temp_dir = tempfile::tempdir().unwrap();
    let db_path = temp_dir
        .path()
        .join("migration.db")
        .to_str()
        .unwrap()
        .to_string();

    db::init(&db_path).unwrap();
    let mut conn = db::open(&db_path).unwrap();

    db::transaction(&mut conn, |tx| {
        for post in posts {
            post.upsert(tx)?;
        }
        for (id, url) in attachments {
            Attachment {
                id: *id,
                url: url.to_string(),
            }
            .upsert(tx)?;
        }
        Ok(())
    })
    .unwrap();

    (temp_dir, db_path)
}

pub fn dry_run() -> MigrationConfig {
    MigrationConfig::default()
}

pub fn apply() -> MigrationConfig {
    MigrationConfig {
        dry_run: false,
        ..Default::default()
    }
}

pub fn migrate(db_path: &str, config: &MigrationConfig) -> BatchReport {
    shortcode_migrate::run_migrate(db_path, config, &SilentProgress::new(), None).unwrap()
}

pub fn reset(db_path: &str, config: &MigrationConfig) -> BatchReport {
    shortcode_migrate::run_reset(db_path, config, &SilentProgress::new(), None).unwrap()
}

/// Live content of a post
pub fn content(db_path: &str, id: i64) -> String {
    let conn = db::open(db_path).unwrap();
    Post::find_by_id(&conn, id).unwrap().unwrap().content
}

/// Status strings of a report's audit rows
pub fn statuses(report: &BatchReport) -> Vec<String> {
    report.records.iter().map(|r| r.status.to_string()).collect()
}
