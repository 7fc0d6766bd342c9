//! Global CLI options and shared printing helpers.
//!
//! `GLOBAL_OPTS` is set once in `main()` before any command runs, the same
//! cell-of-parsed-flags shape the teacher reaches for instead of threading
//! an options struct through every command function.

use std::sync::OnceLock;

use clap::ValueEnum;
use colored::Colorize;

/// Output format shared by every subcommand that prints structured data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Parsed global flags, available to every command after `main()` sets it.
pub struct Opts {
    pub format: OutputFormat,
    pub no_color: bool,
    pub locale: Option<u8>,
}

pub static GLOBAL_OPTS: OnceLock<Opts> = OnceLock::new();

fn opts() -> &'static Opts {
    GLOBAL_OPTS.get().expect("GLOBAL_OPTS initialized in main() before any command runs")
}

pub fn format() -> OutputFormat {
    opts().format
}

/// Scope filter for `(attributes)` lookups, from `--locale`.
pub fn locale_filter() -> Option<u8> {
    opts().locale
}

pub fn use_color() -> bool {
    !opts().no_color
}

pub fn error_prefix() -> colored::ColoredString {
    if use_color() {
        "error:".red().bold()
    } else {
        "error:".normal()
    }
}

pub fn print_json(value: &serde_json::Value) {
    println!("{}", serde_json::to_string_pretty(value).expect("Value always serializes"));
}

pub fn heading(text: &str) -> String {
    if use_color() {
        text.bold().to_string()
    } else {
        text.to_string()
    }
}
