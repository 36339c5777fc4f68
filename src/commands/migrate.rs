// src/commands/migrate.rs
//! Migrate and reset commands
//!
//! Both run a batch through the library driver, then print the operator
//! summary. `migrate` always writes the audit CSV, dry-run included.

use super::human_duration;
use super::progress::BatchProgress;
use anyhow::{Context, Result};
use shortcode_migrate::db::paths;
use shortcode_migrate::migrate::{self, BatchReport, MigrationConfig};
use shortcode_migrate::{LogProgress, ProgressTracker};
use std::path::PathBuf;
use tracing::{info, warn};

/// Bar on the terminal; with `--json` stdout is reserved, so progress goes
/// to the log on stderr instead
fn progress_for(json: bool, operation: &str) -> Box<dyn ProgressTracker> {
    if json {
        Box::new(LogProgress::new(operation))
    } else {
        Box::new(BatchProgress::new())
    }
}

fn print_summary(report: &BatchReport) {
    println!();
    if report.dry_run {
        println!("Success: Total {} posts will be processed.", report.total);
        println!("Warning: Total {} posts will be failed to process.", report.failed);
    } else {
        println!("Success: Total {} posts have been processed.", report.succeeded);
        println!("Warning: Total {} posts have been failed to process.", report.failed);
    }
    if report.no_snapshot > 0 {
        println!("Warning: Total {} posts have no snapshot to restore.", report.no_snapshot);
    }
    if report.cancelled {
        println!("Warning: Cancelled after {} of {} posts.", report.processed(), report.total);
    }
    println!();
    println!(
        "Success: Total time taken by this script: {}",
        human_duration(report.elapsed_ms)
    );
}

/// Migrate shortcodes for the selected posts
pub fn cmd_migrate(
    db_path: &str,
    config: &MigrationConfig,
    log_dir: Option<&str>,
    json: bool,
) -> Result<()> {
    if config.dry_run && !json {
        println!("Warning: Running migrate in dry run mode. Pass --dry-run false to apply.");
    }
    info!(
        "Migrating the shortcodes from {} post type ({})",
        config.record_type, config.status
    );

    let progress = progress_for(json, "migrate");
    let report = migrate::run_migrate(db_path, config, progress.as_ref(), None)?;

    let log_dir = log_dir
        .map(PathBuf::from)
        .unwrap_or_else(|| paths::log_dir(db_path));
    let log_file = log_dir.join(migrate::file_name(config.status, config.record_type));
    migrate::write_csv(&log_file, &report.records)
        .with_context(|| format!("Failed to write audit file {}", log_file.display()))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!();
    println!("Success: Log file created: {}", log_file.display());
    if let Some(cursor) = report.cursor {
        println!("Resume cursor: record {}", cursor);
    }
    print_summary(&report);
    Ok(())
}

/// Restore the selected posts from their snapshots
pub fn cmd_reset(db_path: &str, config: &MigrationConfig, json: bool) -> Result<()> {
    if config.dry_run && !json {
        println!("Warning: Running reset in dry run mode. Pass --dry-run false to apply.");
    }
    info!(
        "Restoring {} post type ({}) from snapshots",
        config.record_type, config.status
    );

    let progress = progress_for(json, "reset");
    let report = migrate::run_reset(db_path, config, progress.as_ref(), None)?;

    if report.failed > 0 {
        warn!("{} posts could not be restored", report.failed);
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    print_summary(&report);
    Ok(())
}
