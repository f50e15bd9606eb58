use indicatif::{ProgressBar, ProgressStyle};

/// Returns a byte-count progress bar for a download of unknown or
/// known `length`.
pub fn bar(prefix: String, length: Option<u64>) -> ProgressBar {
    let pb = match length {
        Some(len) => ProgressBar::new(len),
        None => ProgressBar::new_spinner(),
    };
    pb.set_prefix(prefix);
    pb.set_style(
        ProgressStyle::with_template("{prefix}...\n[{wide_bar:.cyan/blue}] {bytes}/{total_bytes}")
            .expect("incorrect progress bar format string")
            .progress_chars("#>-"),
    );
    pb
}
