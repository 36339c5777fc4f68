// src/commands/status.rs
//! Status command - show what the database holds

use anyhow::Result;
use shortcode_migrate::db;
use shortcode_migrate::db::models::{
    Attachment, MigrationCursor, Post, PostStatus, RecordType, Snapshot,
};
use shortcode_migrate::db::schema;

/// Print schema version, record counts, snapshots and cursors
pub fn cmd_status(db_path: &str) -> Result<()> {
    let conn = db::open(db_path)?;

    println!("Database: {}", db_path);
    println!("Schema version: {}", schema::get_schema_version(&conn)?);

    println!("\nPosts:");
    for record_type in [RecordType::Post, RecordType::Page, RecordType::Project] {
        for status in [PostStatus::Publish, PostStatus::Draft] {
            let count = Post::count(&conn, record_type, status)?;
            if count > 0 {
                println!("  {:<8} {:<8} {}", record_type, status, count);
            }
        }
    }

    println!("\nSnapshots:   {}", Snapshot::count(&conn)?);
    println!("Attachments: {}", Attachment::count(&conn)?);

    let cursors = MigrationCursor::list_all(&conn)?;
    if cursors.is_empty() {
        println!("\nNo resume cursors.");
    } else {
        println!("\nResume cursors:");
        for cursor in cursors {
            println!(
                "  {:<16} after record {} (updated {})",
                cursor.run_key, cursor.last_record_id, cursor.updated_at
            );
        }
    }

    Ok(())
}
