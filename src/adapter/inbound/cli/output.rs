//! Astral-style CLI output formatting.
//!
//! Human-readable output with colored symbols, or one JSON object per line
//! in `--json` mode. `--quiet` suppresses everything except warnings, errors
//! and JSON.

use std::fmt::Display;
use std::sync::OnceLock;

use owo_colors::OwoColorize;
use parking_lot::RwLock;
use serde_json::json;

/// Runtime output configuration shared by CLI handlers.
#[derive(Debug, Clone, Copy, Default)]
pub struct OutputConfig {
    /// Emit machine-readable JSON output instead of human-readable text.
    pub json: bool,
    /// Suppress non-essential output.
    pub quiet: bool,
}

impl OutputConfig {
    #[must_use]
    pub const fn new(json: bool, quiet: bool) -> Self {
        Self { json, quiet }
    }
}

static OUTPUT_CONFIG: OnceLock<RwLock<OutputConfig>> = OnceLock::new();

fn config_cell() -> &'static RwLock<OutputConfig> {
    OUTPUT_CONFIG.get_or_init(|| RwLock::new(OutputConfig::default()))
}

fn read_config() -> OutputConfig {
    *config_cell().read()
}

fn regular_output_suppressed(config: OutputConfig) -> bool {
    !config.json && config.quiet
}

fn emit_json_line(kind: &str, payload: serde_json::Value) {
    println!(
        "{}",
        json!({
            "type": kind,
            "payload": payload,
        })
    );
}

/// Apply output settings from global CLI flags.
pub fn configure(config: OutputConfig) {
    *config_cell().write() = config;
}

#[must_use]
pub fn is_json() -> bool {
    read_config().json
}

/// Print the application header with name and version.
pub fn header(version: &str) {
    let config = read_config();
    if config.json {
        emit_json_line(
            "header",
            json!({
                "app": "tradefleet",
                "version": version,
            }),
        );
        return;
    }
    if regular_output_suppressed(config) {
        return;
    }

    println!("{} {}", "tradefleet".bold(), version.dimmed());
    println!();
}

/// Print a labeled value.
pub fn field(label: &str, value: impl Display) {
    let config = read_config();
    let value = value.to_string();

    if config.json {
        emit_json_line("field", json!({ "label": label, "value": value }));
        return;
    }
    if regular_output_suppressed(config) {
        return;
    }

    println!("  {:<14} {}", label.dimmed(), value);
}

/// Print a success line.
pub fn success(message: &str) {
    let config = read_config();

    if config.json {
        emit_json_line("success", json!({ "message": message }));
        return;
    }
    if regular_output_suppressed(config) {
        return;
    }

    println!("  {} {}", "✓".green(), message);
}

/// Print a warning line. Shown even in quiet mode.
pub fn warning(message: &str) {
    let config = read_config();

    if config.json {
        emit_json_line("warning", json!({ "message": message }));
        return;
    }

    println!("  {} {}", "⚠".yellow(), message);
}

/// Print an error line to stderr.
pub fn error(message: &str) {
    let config = read_config();

    if config.json {
        eprintln!(
            "{}",
            json!({
                "type": "error",
                "payload": { "message": message },
            })
        );
        return;
    }

    eprintln!("  {} {}", "×".red(), message);
}

/// Print a section header.
pub fn section(title: &str) {
    let config = read_config();

    if config.json {
        emit_json_line("section", json!({ "title": title }));
        return;
    }
    if regular_output_suppressed(config) {
        return;
    }

    println!();
    println!("{}", title.bold());
}

/// Print a hint with "hint:" prefix.
pub fn hint(message: &str) {
    let config = read_config();

    if config.json {
        emit_json_line("hint", json!({ "message": message }));
        return;
    }
    if regular_output_suppressed(config) {
        return;
    }

    println!("  {}: {}", "hint".cyan().dimmed(), message.dimmed());
}

/// Print multiple lines of content, each indented.
pub fn lines(content: &str) {
    let config = read_config();

    if config.json {
        emit_json_line("lines", json!({ "content": content }));
        return;
    }
    if regular_output_suppressed(config) {
        return;
    }

    for line in content.lines() {
        println!("  {line}");
    }
}

/// Emit a JSON value directly (for commands that need custom JSON output).
pub fn json_output(value: serde_json::Value) {
    println!("{value}");
}

/// Format a highlighted value in cyan.
pub fn highlight(value: impl Display) -> String {
    let value = value.to_string();
    if is_json() {
        return value;
    }
    format!("{}", value.cyan())
}

/// Format an on/off flag.
pub fn flag(on: bool) -> String {
    if is_json() {
        return on.to_string();
    }
    if on {
        format!("{}", "on".green())
    } else {
        format!("{}", "off".dimmed())
    }
}
