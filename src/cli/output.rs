//! Output formatting and progress indicators
//!
//! Utilities for displaying progress bars and formatted status messages.

use indicatif::{ProgressBar, ProgressStyle};

use crate::core::runner::BuildReport;

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

/// Print a section heading
pub fn section(title: &str) {
    println!("\n{title}");
    println!("{}", "─".repeat(title.chars().count()));
}

/// Print a success message
pub fn success(message: &str) {
    println!("{} {message}", status::SUCCESS);
}

/// Print an error message to stderr
pub fn error(message: &str) {
    eprintln!("{} {message}", status::ERROR);
}

/// Print a warning message
pub fn warning(message: &str) {
    println!("{} {message}", status::WARNING);
}

/// Print an informational message
pub fn info(message: &str) {
    println!("{} {message}", status::INFO);
}

/// Print an indented detail line
pub fn detail(message: &str) {
    println!("  {message}");
}

/// Display a top-level error with its chain of causes
pub fn display_error(err: &anyhow::Error) {
    eprintln!("{} {err:#}", status::ERROR);
}

/// Create a progress bar for the build loop
pub fn create_build_bar(total: u64) -> ProgressBar {
    let pb = ProgressBar::new(total);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} packages ({msg})")
            .expect("Invalid progress bar template")
            .progress_chars("█▓▒░"),
    );
    pb
}

/// Render the aggregate build report
pub fn render_report(report: &BuildReport) {
    section("Summary");
    detail(&format!(
        "{} succeeded, {} failed, {} skipped",
        report.succeeded(),
        report.failed(),
        report.skipped()
    ));
    detail(&format!("Total time: {:.2?}", report.total_duration));

    if !report.not_attempted.is_empty() {
        detail(&format!(
            "Not attempted: {}",
            report.not_attempted.join(", ")
        ));
    }

    if !report.is_success() {
        println!();
        error("Failed packages:");
        for name in report.failed_names() {
            detail(&format!("• {name}"));
        }
    }
}
