// src/commands/progress.rs
//! Progress bar for batch runs
//!
//! Wraps an indicatif bar so the library's batch driver can report one
//! increment per record.

use indicatif::{ProgressBar, ProgressStyle};
use shortcode_migrate::ProgressTracker;

/// Terminal progress bar for a migrate or reset batch
pub struct BatchProgress {
    bar: ProgressBar,
}

impl BatchProgress {
    /// Create a bar; the batch sets its length and message once records are
    /// selected
    pub fn new() -> Self {
        let bar = ProgressBar::new(0);
        bar.set_style(
            ProgressStyle::default_bar()
                .template("{msg} ({pos}/{len}) [{bar:40.green/dim}] {percent}%")
                .expect("Invalid progress bar template")
                .progress_chars("##-"),
        );
        Self { bar }
    }
}

impl Default for BatchProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressTracker for BatchProgress {
    fn set_message(&self, message: &str) {
        self.bar.set_message(message.to_string());
    }

    fn increment(&self, amount: u64) {
        self.bar.inc(amount);
    }

    fn set_length(&self, length: u64) {
        self.bar.set_length(length);
    }

    fn finish_with_message(&self, message: &str) {
        self.bar.finish_with_message(message.to_string());
    }

    fn finish_with_error(&self, message: &str) {
        self.bar.abandon_with_message(message.to_string());
    }
}
