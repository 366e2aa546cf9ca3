//! Output formatting and progress indicators
//!
//! Status messages, JSON output and spinners. Settings from the global
//! `--quiet`/`--json`/`-v` flags are applied once and read everywhere.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;

static QUIET: AtomicBool = AtomicBool::new(false);
static JSON: AtomicBool = AtomicBool::new(false);

/// Output settings from the global flags
#[derive(Debug, Clone, Copy, Default)]
pub struct OutputConfig {
    pub quiet: bool,
    pub json: bool,
    pub verbose: u8,
}

impl OutputConfig {
    pub fn new(quiet: bool, json: bool, verbose: u8) -> Self {
        Self { quiet, json, verbose }
    }

    /// Make these settings visible to the output helpers
    pub fn apply_global(self) {
        QUIET.store(self.quiet, Ordering::Relaxed);
        JSON.store(self.json, Ordering::Relaxed);
    }

    /// Log filter directive for the verbosity level
    pub fn log_directive(self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        }
    }
}

pub fn is_quiet() -> bool {
    QUIET.load(Ordering::Relaxed)
}

pub fn is_json() -> bool {
    JSON.load(Ordering::Relaxed)
}

/// Human-readable messages are suppressed in quiet and JSON modes
fn human_output() -> bool {
    !is_quiet() && !is_json()
}

pub fn print_success(message: &str) {
    if human_output() {
        println!("{} {message}", status::SUCCESS);
    }
}

pub fn print_info(message: &str) {
    if human_output() {
        println!("{} {message}", status::INFO);
    }
}

/// Indented detail line under a status message
pub fn print_detail(message: &str) {
    if human_output() {
        println!("  {message}");
    }
}

pub fn print_warning(message: &str) {
    if !is_quiet() {
        eprintln!("{} {message}", status::WARNING);
    }
}

/// Errors are always shown
pub fn print_error(message: &str) {
    eprintln!("{} {message}", status::ERROR);
}

/// Print an error with its cause chain
pub fn display_error(error: &anyhow::Error) {
    print_error(&error.to_string());
    for cause in error.chain().skip(1) {
        eprintln!("  caused by: {cause}");
    }
}

/// Print `value` as pretty JSON on stdout
pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Create a spinner for operations with unknown duration
///
/// Hidden in quiet and JSON modes.
pub fn create_spinner(message: &str) -> ProgressBar {
    if !human_output() {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new_spinner();
    let style = ProgressStyle::default_spinner()
        .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
        .template("{spinner:.blue} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner());
    pb.set_style(style);
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
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
