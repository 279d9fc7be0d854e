//! Output formatting and progress display

use crate::cli::args::VerbosityLevel;
use crate::core::progress::{format_bytes, format_duration, Progress};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Mutex;
use std::time::Duration;

/// Console formatter for pipeline runs.
///
/// The progress bar slot is behind a mutex because the pipeline's
/// progress callback is `Fn` and shared.
pub struct OutputFormatter {
    verbosity: VerbosityLevel,
    progress_bar: Mutex<Option<ProgressBar>>,
}

impl OutputFormatter {
    pub fn new(verbosity: VerbosityLevel) -> Self {
        Self {
            verbosity,
            progress_bar: Mutex::new(None),
        }
    }

    /// Update (lazily creating) the progress bar from pipeline progress.
    pub fn update_progress(&self, progress: &Progress) {
        if self.verbosity == VerbosityLevel::Quiet {
            return;
        }

        let mut slot = self.progress_bar.lock().unwrap();
        let bar = slot.get_or_insert_with(|| create_progress_bar(progress.total_size));
        bar.set_position(progress.downloaded_size);
        bar.set_message(progress.speed_string());
    }

    /// Finish the progress bar, if one was started.
    pub fn finish_progress(&self, message: &str) {
        if let Some(bar) = self.progress_bar.lock().unwrap().take() {
            bar.finish_with_message(message.to_string());
        }
    }

    pub fn info(&self, message: &str) {
        if self.verbosity != VerbosityLevel::Quiet {
            println!("{}", message);
        }
    }

    pub fn success(&self, message: &str) {
        if self.verbosity != VerbosityLevel::Quiet {
            println!("{}", message.green());
        }
    }

    pub fn error(&self, message: &str) {
        eprintln!("{}", message.red());
    }

    pub fn debug(&self, message: &str) {
        if self.verbosity == VerbosityLevel::Verbose {
            println!("{}", message.dimmed());
        }
    }

    /// Print the final success line for a completed download.
    pub fn print_download_complete(&self, filename: &str, bytes: u64, duration: Duration) {
        self.finish_progress("done");
        self.success(&format!(
            "Saved {} ({}) in {}",
            filename,
            format_bytes(bytes),
            format_duration(duration)
        ));
    }
}

fn create_progress_bar(total_size: Option<u64>) -> ProgressBar {
    match total_size {
        Some(total) => {
            let style = ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({eta}) {msg}")
                .unwrap()
                .progress_chars("#>-");
            let bar = ProgressBar::new(total);
            bar.set_style(style);
            bar
        }
        None => {
            // Unknown size: spinner with a running byte count
            let style = ProgressStyle::default_spinner()
                .template("{spinner:.green} [{elapsed_precise}] {bytes} {msg}")
                .unwrap();
            let bar = ProgressBar::new_spinner();
            bar.set_style(style);
            bar
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quiet_formatter_never_creates_a_bar() {
        let formatter = OutputFormatter::new(VerbosityLevel::Quiet);
        let mut progress = Progress::new(Some(100));
        progress.update(10);
        formatter.update_progress(&progress);
        assert!(formatter.progress_bar.lock().unwrap().is_none());
    }

    #[test]
    fn test_bar_is_created_once_and_tracks_position() {
        let formatter = OutputFormatter::new(VerbosityLevel::Normal);
        let mut progress = Progress::new(Some(100));
        progress.update(10);
        formatter.update_progress(&progress);
        progress.update(20);
        formatter.update_progress(&progress);

        let slot = formatter.progress_bar.lock().unwrap();
        let bar = slot.as_ref().unwrap();
        assert_eq!(bar.position(), 20);
    }
}
