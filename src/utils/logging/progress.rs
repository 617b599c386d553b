//! Progress bars for file loads, using the indicatif crate.
//!
//! Bars draw to stderr and stay hidden when it is not a terminal.

use indicatif::{ProgressBar, ProgressStyle};

/// Template for byte-based load progress
pub const LOAD_TEMPLATE: &str =
    "{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {bytes}/{total_bytes} ({bytes_per_sec}) {msg}";

/// Create a progress bar tracking `total_bytes` read from a file
#[must_use]
pub fn create_load_progress_bar(total_bytes: u64, description: &str) -> ProgressBar {
    let pb = ProgressBar::new(total_bytes);
    let style = ProgressStyle::with_template(LOAD_TEMPLATE)
        .map_or_else(|_| ProgressStyle::default_bar(), |style| style.progress_chars("#>-"));
    pb.set_style(style);
    pb.set_message(description.to_string());
    pb
}
