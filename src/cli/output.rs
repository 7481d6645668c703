//! Output formatting and progress indicators
//!
//! This module provides utilities for displaying progress bars,
//! status prefixes, and errors to the user.

use indicatif::{ProgressBar, ProgressStyle};

use crate::core::size::{format_size, SizeUnits};
use crate::infra::download::{Progress, ProgressCallback};

/// Create a spinner for operations with unknown duration
pub fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
            .template("{spinner:.blue} {msg}")
            .expect("Invalid spinner template"),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(80));
    pb
}

/// Create a progress bar for downloads
///
/// The length is filled in once the first progress report arrives.
pub fn create_download_bar() -> ProgressBar {
    let pb = ProgressBar::new(0);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("|{bar:40.cyan/blue}|  {percent}%  {msg}")
            .expect("Invalid progress bar template")
            .progress_chars("█▓-"),
    );
    pb
}

/// Progress line text: `<transferred>/<total>  <speed>/s`
pub fn progress_message(progress: &Progress) -> String {
    let transferred = format_size(progress.transferred, SizeUnits::Binary);
    let transferred = transferred.split(' ').next().unwrap_or_default();
    let total = progress
        .total
        .map_or_else(|| "?".to_string(), |t| format_size(t, SizeUnits::Binary));
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let speed = format_size(progress.bytes_per_sec as u64, SizeUnits::Binary);
    format!("{transferred}/{total}  {speed}/s")
}

/// Progress callback driving `bar`
pub fn bar_callback(bar: ProgressBar) -> ProgressCallback {
    Box::new(move |progress: Progress| {
        if let Some(total) = progress.total {
            bar.set_length(total);
        }
        bar.set_position(progress.transferred);
        bar.set_message(progress_message(&progress));
    })
}

/// Print an error and its causes to stderr
pub fn display_error(error: &anyhow::Error) {
    eprintln!("{} Error: {error}", status::ERROR);
    for cause in error.chain().skip(1) {
        eprintln!("  caused by: {cause}");
    }
}

/// Status message prefixes
pub mod status {
    /// Success prefix (green checkmark)
    pub const SUCCESS: &str = "✓";

    /// Error prefix (red X)
    pub const ERROR: &str = "✗";

    /// Warning prefix (yellow triangle)
    pub const WARNING: &str = "⚠";

    /// Info prefix (blue circle)
    pub const INFO: &str = "ℹ";
}
