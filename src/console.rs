//! User-facing console output
//!
//! Diagnostics go through `log`/`tracing`; these helpers print the messages
//! a user of the interactive session is meant to read.

use crossterm::style::Stylize;

const RULE: &str = "-----------------------";

pub fn banner() {
    println!("{RULE}");
    println!("{}", "Running Critical CSS...".green().bold());
    println!("{RULE}");
}

pub fn notice(message: &str) {
    println!("{}", message.blue());
}

pub fn warn(message: &str) {
    println!("{}", message.yellow());
}

pub fn error(message: &str) {
    eprintln!("{}", message.red().bold());
}

/// `label value` with the value highlighted
pub fn selected(label: &str, value: &str) {
    println!("{label} {}", value.red());
}

pub fn progress(message: &str) {
    println!("{} {message}", "…".blue());
}

pub fn success(label: &str, value: &str) {
    println!("{} {label} {}", "✔".green(), value.green());
}

pub fn failure(label: &str, message: &str) {
    eprintln!("{} {label} {}", "✖".red(), message.red());
}
