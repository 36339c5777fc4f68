// src/cli/mod.rs
//! CLI definitions for shortcode-migrate
//!
//! This module contains the command-line interface definitions using clap.
//! The actual command implementations are in the `commands` module.
//!
//! - `init` - Create or upgrade the database
//! - `import` - Load posts and media library entries from JSON
//! - `migrate` - Convert legacy shortcodes to blocks (dry-run by default)
//! - `reset` - Restore post content from snapshots
//! - `status` - Show database contents and resume cursors

use clap::{Parser, Subcommand};

/// Default database location
pub const DEFAULT_DB_PATH: &str = "./migration.db";

#[derive(Parser)]
#[command(name = "shortcode-migrate")]
#[command(version)]
#[command(about = "Migrate Divi shortcodes in post content to Gutenberg blocks", long_about = None)]
pub struct Cli {
    /// Path to the database file
    #[arg(short, long, global = true, default_value = DEFAULT_DB_PATH)]
    pub db_path: String,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create or upgrade the database schema
    Init,

    /// Load posts and attachments from a JSON export
    Import {
        /// Path to the JSON file
        file: String,
    },

    /// Convert Divi shortcodes into block markup
    Migrate {
        /// Report what would change without writing (pass `false` to apply)
        #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
        dry_run: bool,

        /// Post type to process: post, page or project
        #[arg(long, default_value = "post")]
        post_type: String,

        /// Post status to process: publish or draft
        #[arg(long, default_value = "publish")]
        status: String,

        /// Maximum number of posts (zero or negative for no limit)
        #[arg(long, allow_negative_numbers = true)]
        limit: Option<i64>,

        /// Number of worker threads
        #[arg(short, long, default_value_t = 1)]
        jobs: usize,

        /// Only process posts after the last completed run
        #[arg(long)]
        resume: bool,

        /// Report videos without a usable source as `unchanged`
        #[arg(long)]
        report_unchanged: bool,

        /// Directory for the audit CSV
        #[arg(long)]
        log_dir: Option<String>,

        /// Print the batch report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Restore post content from snapshots taken before migration
    Reset {
        /// Report what would change without writing (pass `false` to apply)
        #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
        dry_run: bool,

        /// Post type to process: post, page or project
        #[arg(long, default_value = "post")]
        post_type: String,

        /// Post status to process: publish or draft
        #[arg(long, default_value = "publish")]
        status: String,

        /// Maximum number of posts (zero or negative for no limit)
        #[arg(long, allow_negative_numbers = true)]
        limit: Option<i64>,

        /// Number of worker threads
        #[arg(short, long, default_value_t = 1)]
        jobs: usize,

        /// Print the batch report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show record counts, snapshots and resume cursors
    Status,
}
