//! Terminal output for the stakegate commands.
//!
//! Every line goes through one of three modes chosen from the global flags:
//! human (colored marks and aligned fields), quiet (only warnings, errors and
//! results) or JSON, where each line is a `{"type", "payload"}` object and
//! command results are printed as a single object.

use std::fmt::Display;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use parking_lot::RwLock;
use serde_json::{json, Value};
use tabled::settings::Style;
use tabled::{Table, Tabled};

/// Output flags shared by all command handlers.
#[derive(Debug, Clone, Copy, Default)]
pub struct OutputConfig {
    pub json: bool,
    pub quiet: bool,
    /// Number of `-v` flags.
    pub verbose: u8,
}

impl OutputConfig {
    #[must_use]
    pub const fn new(json: bool, quiet: bool, verbose: u8) -> Self {
        Self {
            json,
            quiet,
            verbose,
        }
    }

    const fn mode(self) -> Mode {
        if self.json {
            Mode::Json
        } else if self.quiet {
            Mode::Quiet
        } else {
            Mode::Human
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Human,
    Quiet,
    Json,
}

static OUTPUT: RwLock<OutputConfig> = parking_lot::const_rwlock(OutputConfig::new(false, false, 0));

fn mode() -> Mode {
    OUTPUT.read().mode()
}

/// Apply the global `--json`, `--quiet` and `--verbose` flags.
pub fn configure(config: OutputConfig) {
    *OUTPUT.write() = config;
}

#[must_use]
pub fn is_json() -> bool {
    mode() == Mode::Json
}

/// Print one line: `payload` in JSON mode, `human` otherwise.
///
/// Quiet mode drops the line unless `essential` is set.
fn emit(kind: &str, payload: Value, essential: bool, human: impl FnOnce()) {
    match mode() {
        Mode::Json => println!("{}", json!({ "type": kind, "payload": payload })),
        Mode::Quiet if !essential => {}
        Mode::Human | Mode::Quiet => human(),
    }
}

#[derive(Clone, Copy)]
enum Mark {
    Done,
    Attention,
    Failed,
}

impl Mark {
    fn render(self) -> String {
        match self {
            Self::Done => "✓".green().to_string(),
            Self::Attention => "⚠".yellow().to_string(),
            Self::Failed => "×".red().to_string(),
        }
    }
}

pub fn header(version: &str) {
    emit(
        "header",
        json!({ "app": "stakegate", "version": version }),
        false,
        || {
            println!("{} {}", "stakegate".bold(), version.dimmed());
            println!();
        },
    );
}

pub fn section(title: &str) {
    emit("section", json!({ "title": title }), false, || {
        println!();
        println!("{}", title.bold());
    });
}

/// Print `label` and `value` as an aligned row.
pub fn field(label: &str, value: impl Display) {
    let value = value.to_string();
    emit(
        "field",
        json!({ "label": label, "value": value }),
        false,
        || println!("  {:<12} {}", label.dimmed(), value),
    );
}

pub fn success(message: &str) {
    emit("success", json!({ "message": message }), false, || {
        println!("  {} {message}", Mark::Done.render());
    });
}

pub fn warning(message: &str) {
    emit("warning", json!({ "message": message }), true, || {
        println!("  {} {message}", Mark::Attention.render());
    });
}

/// Print an error to stderr, in every mode.
pub fn error(message: &str) {
    if is_json() {
        eprintln!("{}", json!({ "type": "error", "payload": { "message": message } }));
    } else {
        eprintln!("  {} {message}", Mark::Failed.render());
    }
}

pub fn hint(message: &str) {
    emit("hint", json!({ "message": message }), false, || {
        println!("  {}: {}", "hint".cyan().dimmed(), message.dimmed());
    });
}

/// Print a transaction hash and, when the chain has an explorer, its link.
pub fn transaction(label: &str, hash: impl Display, explorer_url: Option<String>) {
    let hash = hash.to_string();
    emit(
        "transaction",
        json!({ "label": label, "hash": hash, "url": explorer_url }),
        true,
        || {
            println!("  {:<12} {}", label.dimmed(), hash);
            if let Some(url) = &explorer_url {
                println!("  {:<12} {}", "", url.cyan().underline());
            }
        },
    );
}

/// Rows as a rounded table. Commands print their JSON result separately.
pub fn table<T: Tabled>(rows: impl IntoIterator<Item = T>) {
    if mode() != Mode::Human {
        return;
    }
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    for line in table.to_string().lines() {
        println!("  {line}");
    }
}

/// Print the structured result of a command.
pub fn json_output(value: Value) {
    println!("{value}");
}

const SPINNER_FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Start a spinner for a wallet or chain wait.
///
/// Hidden in JSON and quiet mode; messages still update so callers need not
/// care.
pub fn spinner(message: &str) -> ProgressBar {
    let pb = if mode() == Mode::Human {
        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner()
            .tick_strings(SPINNER_FRAMES)
            .template("  {spinner:.cyan} {msg}")
        {
            pb.set_style(style);
        }
        pb.enable_steady_tick(Duration::from_millis(80));
        pb
    } else {
        ProgressBar::hidden()
    };
    pb.set_message(message.to_string());
    pb
}

fn finish(pb: &ProgressBar, kind: &str, mark: Mark, message: &str, essential: bool) {
    match mode() {
        Mode::Human => pb.finish_with_message(format!("{} {message}", mark.render())),
        Mode::Quiet if essential => {
            pb.finish_and_clear();
            println!("  {} {message}", mark.render());
        }
        Mode::Quiet => pb.finish_and_clear(),
        Mode::Json => {
            pb.finish_and_clear();
            println!("{}", json!({ "type": kind, "payload": { "message": message } }));
        }
    }
}

pub fn spinner_success(pb: &ProgressBar, message: &str) {
    finish(pb, "spinner_success", Mark::Done, message, false);
}

pub fn spinner_fail(pb: &ProgressBar, message: &str) {
    finish(pb, "spinner_fail", Mark::Failed, message, true);
}

#[derive(Clone, Copy)]
enum Tone {
    Positive,
    Negative,
    Highlight,
    Muted,
}

fn paint(value: impl Display, tone: Tone) -> String {
    let value = value.to_string();
    if is_json() {
        return value;
    }
    match tone {
        Tone::Positive => value.green().to_string(),
        Tone::Negative => value.red().to_string(),
        Tone::Highlight => value.cyan().to_string(),
        Tone::Muted => value.dimmed().to_string(),
    }
}

/// Granted access, sufficient allowance.
pub fn positive(value: impl Display) -> String {
    paint(value, Tone::Positive)
}

/// Denied access, insufficient allowance.
pub fn negative(value: impl Display) -> String {
    paint(value, Tone::Negative)
}

pub fn highlight(value: impl Display) -> String {
    paint(value, Tone::Highlight)
}

pub fn muted(value: impl Display) -> String {
    paint(value, Tone::Muted)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_follows_flags() {
        assert_eq!(OutputConfig::new(false, false, 0).mode(), Mode::Human);
        assert_eq!(OutputConfig::new(false, true, 0).mode(), Mode::Quiet);
        assert_eq!(OutputConfig::new(true, true, 2).mode(), Mode::Json);
    }
}
