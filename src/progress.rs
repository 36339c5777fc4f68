// src/progress.rs

//! Shared progress tracking trait and implementations
//!
//! A batch names itself once its records are selected, then reports one
//! increment per finished record. The CLI renders this with an indicatif
//! bar (see `commands::progress`), or with `LogProgress` when stdout is
//! reserved for JSON.
//!
//! - `LogProgress`: logs progress to tracing
//! - `SilentProgress`: no-op for tests and scripted use

use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{info, warn};

/// Core trait for progress tracking
///
/// Workers update progress from several threads, so implementations must
/// be `Send + Sync`.
pub trait ProgressTracker: Send + Sync {
    /// Set the current status message
    fn set_message(&self, message: &str);

    /// Increment progress by the given amount
    fn increment(&self, amount: u64);

    /// Set the total (length) of the progress
    fn set_length(&self, length: u64);

    /// Finish progress successfully with a message
    fn finish_with_message(&self, message: &str);

    /// Finish progress with an error/abandonment message
    fn finish_with_error(&self, message: &str);
}

/// Silent progress tracker (no-op)
#[derive(Debug, Default)]
pub struct SilentProgress;

impl SilentProgress {
    pub fn new() -> Self {
        Self
    }
}

impl ProgressTracker for SilentProgress {
    fn set_message(&self, _message: &str) {}
    fn increment(&self, _amount: u64) {}
    fn set_length(&self, _length: u64) {}
    fn finish_with_message(&self, _message: &str) {}
    fn finish_with_error(&self, _message: &str) {}
}

/// Logging progress tracker
///
/// Logs at info level roughly every tenth of the batch.
#[derive(Debug)]
pub struct LogProgress {
    name: String,
    position: AtomicU64,
    length: AtomicU64,
}

impl LogProgress {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            position: AtomicU64::new(0),
            length: AtomicU64::new(0),
        }
    }

    fn log_interval(&self) -> u64 {
        std::cmp::max(1, self.length.load(Ordering::Relaxed) / 10)
    }
}

impl ProgressTracker for LogProgress {
    fn set_message(&self, message: &str) {
        info!("{}: {}", self.name, message);
    }

    fn increment(&self, amount: u64) {
        let old_pos = self.position.fetch_add(amount, Ordering::Relaxed);
        let new_pos = old_pos + amount;
        let length = self.length.load(Ordering::Relaxed);

        if length > 0 {
            let interval = self.log_interval();
            if new_pos / interval > old_pos / interval {
                let percent = (new_pos * 100) / length;
                info!("{}: {}% ({}/{})", self.name, percent, new_pos, length);
            }
        }
    }

    fn set_length(&self, length: u64) {
        self.length.store(length, Ordering::Relaxed);
    }

    fn finish_with_message(&self, message: &str) {
        info!(
            "{}: {} ({} records)",
            self.name,
            message,
            self.position.load(Ordering::Relaxed)
        );
    }

    fn finish_with_error(&self, message: &str) {
        warn!("{}: {}", self.name, message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_progress_counts_increments() {
        let progress = LogProgress::new("migrate");
        progress.set_length(100);

        for _ in 0..100 {
            progress.increment(1);
        }
        assert_eq!(progress.position.load(Ordering::Relaxed), 100);
        assert_eq!(progress.log_interval(), 10);
        progress.finish_with_error("cancelled");
    }

    #[test]
    fn test_log_progress_without_length() {
        let progress = LogProgress::new("reset");
        progress.increment(5);
        assert_eq!(progress.position.load(Ordering::Relaxed), 5);
        assert_eq!(progress.log_interval(), 1);
    }
}
