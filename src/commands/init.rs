// src/commands/init.rs
//! Database initialization command

use anyhow::{Context, Result};
use shortcode_migrate::db;
use tracing::info;

/// Create the database or upgrade its schema
pub fn cmd_init(db_path: &str) -> Result<()> {
    info!("Initializing database at: {}", db_path);
    db::init(db_path).with_context(|| format!("Failed to initialize {}", db_path))?;
    println!("Database initialized successfully at: {}", db_path);
    Ok(())
}
