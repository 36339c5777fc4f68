// src/commands/import.rs
//! Corpus import command
//!
//! Loads a JSON export of posts and media library entries:
//!
//! ```json
//! {
//!   "posts": [{"id": 1, "post_type": "post", "post_status": "publish",
//!              "content": "...", "modified": "...", "modified_gmt": "..."}],
//!   "attachments": [{"id": 42, "url": "https://example.com/a.png"}]
//! }
//! ```
//!
//! Existing posts with the same id are updated in place, so their snapshots
//! survive a re-import.

use anyhow::{Context, Result};
use serde::Deserialize;
use shortcode_migrate::db;
use shortcode_migrate::db::models::{Attachment, Post};
use std::fs;
use tracing::info;

#[derive(Debug, Default, Deserialize)]
struct ImportFile {
    #[serde(default)]
    posts: Vec<Post>,
    #[serde(default)]
    attachments: Vec<Attachment>,
}

/// Import posts and attachments from a JSON file
pub fn cmd_import(db_path: &str, file: &str) -> Result<()> {
    let raw = fs::read_to_string(file).with_context(|| format!("Failed to read {}", file))?;
    let data: ImportFile =
        serde_json::from_str(&raw).with_context(|| format!("Failed to parse {}", file))?;

    info!(
        "Importing {} posts and {} attachments from {}",
        data.posts.len(),
        data.attachments.len(),
        file
    );

    let mut conn = db::open(db_path)?;
    db::transaction(&mut conn, |tx| {
        for post in &data.posts {
            post.upsert(tx)?;
        }
        for attachment in &data.attachments {
            attachment.upsert(tx)?;
        }
        Ok(())
    })?;

    println!(
        "Imported {} posts and {} attachments into {}",
        data.posts.len(),
        data.attachments.len(),
        db_path
    );
    Ok(())
}
