// src/commands/mod.rs
//! Command handlers for the shortcode-migrate CLI

mod import;
mod init;
mod migrate;
pub mod progress;
mod status;

pub use import::cmd_import;
pub use init::cmd_init;
pub use migrate::{cmd_migrate, cmd_reset};
pub use status::cmd_status;

use anyhow::{Context, Result};
use shortcode_migrate::MigrationConfig;
use shortcode_migrate::db::models::{PostStatus, RecordType};

/// Selection options shared by migrate and reset
pub struct RunOptions {
    pub dry_run: bool,
    pub post_type: String,
    pub status: String,
    pub limit: Option<i64>,
    pub jobs: usize,
    pub resume: bool,
    pub report_unchanged: bool,
}

impl RunOptions {
    /// Validate the options into a batch configuration
    pub fn into_config(self) -> Result<MigrationConfig> {
        let record_type: RecordType = self
            .post_type
            .parse()
            .with_context(|| format!("Unsupported post type '{}'", self.post_type))?;
        let status: PostStatus = self
            .status
            .parse()
            .with_context(|| format!("Unsupported status '{}'", self.status))?;

        if self.jobs == 0 {
            anyhow::bail!("--jobs must be at least 1");
        }

        Ok(MigrationConfig {
            dry_run: self.dry_run,
            record_type,
            status,
            // Zero and negative limits both mean "all records"
            limit: self
                .limit
                .and_then(|l| usize::try_from(l).ok())
                .filter(|&l| l > 0),
            jobs: self.jobs,
            report_unchanged: self.report_unchanged,
            resume: self.resume,
        })
    }
}

/// Render elapsed time the way an operator reads it
pub(crate) fn human_duration(elapsed_ms: u64) -> String {
    let secs = elapsed_ms / 1000;
    match secs {
        0 => format!("{} ms", elapsed_ms),
        1..=59 => format!("{} secs", secs),
        60..=3599 => format!("{} mins {} secs", secs / 60, secs % 60),
        _ => format!("{} hours {} mins", secs / 3600, (secs % 3600) / 60),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options() -> RunOptions {
        RunOptions {
            dry_run: true,
            post_type: "page".to_string(),
            status: "draft".to_string(),
            limit: Some(-1),
            jobs: 2,
            resume: false,
            report_unchanged: false,
        }
    }

    #[test]
    fn test_into_config() {
        let config = options().into_config().unwrap();
        assert_eq!(config.record_type, RecordType::Page);
        assert_eq!(config.status, PostStatus::Draft);
        assert_eq!(config.limit, None);
        assert_eq!(config.jobs, 2);
    }

    #[test]
    fn test_into_config_rejects_unknown_type() {
        let opts = RunOptions {
            post_type: "product".to_string(),
            ..options()
        };
        assert!(opts.into_config().is_err());
    }

    #[test]
    fn test_positive_limit() {
        let opts = RunOptions {
            limit: Some(25),
            ..options()
        };
        assert_eq!(opts.into_config().unwrap().limit, Some(25));
    }

    #[test]
    fn test_zero_limit_means_no_limit() {
        let opts = RunOptions {
            limit: Some(0),
            ..options()
        };
        assert_eq!(opts.into_config().unwrap().limit, None);
    }

    #[test]
    fn test_human_duration() {
        assert_eq!(human_duration(250), "250 ms");
        assert_eq!(human_duration(42_000), "42 secs");
        assert_eq!(human_duration(125_000), "2 mins 5 secs");
        assert_eq!(human_duration(7_500_000), "2 hours 5 mins");
    }
}
