//! Terminal output helpers.

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

static QUIET: AtomicBool = AtomicBool::new(false);

/// Suppress everything but errors.
pub fn set_quiet(quiet: bool) {
    QUIET.store(quiet, Ordering::SeqCst);
}

pub fn is_quiet() -> bool {
    QUIET.load(Ordering::Relaxed)
}

pub fn success(msg: &str) {
    if !is_quiet() {
        println!("  {} {}", "✓".green().bold(), msg.green());
    }
}

pub fn warn(msg: &str) {
    if !is_quiet() {
        println!("  {} {}", "⚠".yellow().bold(), msg.yellow());
    }
}

pub fn info(msg: &str) {
    if !is_quiet() {
        println!("  {} {}", "→".cyan(), msg);
    }
}

/// Print a `label: value` line.
pub fn field(label: &str, value: &str) {
    if !is_quiet() {
        println!("  {} {}", format!("{}:", label).bright_white().bold(), value);
    }
}

pub fn heading(title: &str) {
    if !is_quiet() {
        println!("  {}", title.bright_white().bold());
        println!("  {}", "─".repeat(40).dimmed());
    }
}

/// Spinner for slow requests. Hidden in quiet mode.
pub fn spinner(msg: &str) -> ProgressBar {
    if is_quiet() {
        return ProgressBar::hidden();
    }

    let style = ProgressStyle::default_spinner()
        .template("{spinner:.cyan} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]);

    let pb = ProgressBar::new_spinner();
    pb.set_style(style);
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}
