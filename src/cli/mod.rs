//! CLI command implementations for senti.
//!
//! Provides subcommand handlers for:
//! - `senti analyze "text"`: analyze one piece of text and record it
//! - `senti history`: list recorded analyses, newest first
//! - `senti stats`: per-class counts, percentages, chart series
//! - `senti clear`: clear all history
//! - `senti web`: serve the dashboard
//! - `senti health`: check credential, config, and history file
//! - `senti config show|init|set|reset`: configuration management

use anyhow::{Context, Result};
use colored::Colorize;

use crate::analytics::{self, Summary};
use crate::api::{SentimentApi, SentimentClient};
use crate::config::{self, SentiConfig};
use crate::dashboard::Dashboard;
use crate::history::{AnalysisResult, FileStore, HistoryStore};
use crate::sentiment::Sentiment;
use crate::web;

/// Output format for listing commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
}

impl OutputFormat {
    pub fn from_str_opt(s: Option<&str>) -> Self {
        match s {
            Some("json") => Self::Json,
            Some("csv") => Self::Csv,
            _ => Self::Table,
        }
    }
}

/// Build the controller used by every command from the resolved config.
fn open_dashboard(cfg: &SentiConfig) -> Result<Dashboard<SentimentClient, FileStore>> {
    let path = config::history_path(cfg).context("could not determine history file location")?;
    let client = SentimentClient::from_config(&cfg.api);
    Ok(Dashboard::new(client, FileStore::new(path)))
}

// ---------------------------------------------------------------------------
// senti analyze
// ---------------------------------------------------------------------------

/// Analyze text and print the recorded result.
pub fn run_analyze(cfg: &SentiConfig, text: &str, format: OutputFormat) -> Result<()> {
    let dashboard = open_dashboard(cfg)?;

    let Some(entry) = dashboard.analyze(text)? else {
        println!("{}", "Nothing to analyze: input is empty.".yellow());
        return Ok(());
    };

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&entry)?),
        OutputFormat::Csv => {
            println!("{CSV_HEADER}");
            println!("{}", csv_row(&entry));
        }
        OutputFormat::Table => {
            let class = entry.class();
            println!(
                "  {} {}",
                "Sentiment:".bold(),
                colorize_class(class, entry.label())
            );
            println!("  {} {}", "Class:    ".bold(), class);
            println!("  {} {:.4}", "Score:    ".bold(), entry.score);
            println!(
                "  {} {}",
                "History:  ".bold(),
                format!("{} entries", dashboard.len()).dimmed()
            );
        }
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// senti history
// ---------------------------------------------------------------------------

/// List history entries, newest first.
pub fn run_history(
    cfg: &SentiConfig,
    format: OutputFormat,
    class: Option<Sentiment>,
    limit: Option<usize>,
) -> Result<()> {
    let dashboard = open_dashboard(cfg)?;
    let entries = dashboard.entries();

    let mut selected: Vec<&AnalysisResult> = match class {
        Some(class) => analytics::filter_by_class(&entries, class),
        None => entries.iter().collect(),
    };
    if let Some(limit) = limit {
        selected.truncate(limit);
    }

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&selected)?),
        OutputFormat::Csv => {
            println!("{CSV_HEADER}");
            for entry in &selected {
                println!("{}", csv_row(entry));
            }
        }
        OutputFormat::Table => {
            if selected.is_empty() {
                println!(
                    "{}",
                    "No analysis history yet. Run `senti analyze \"some text\"` to start."
                        .yellow()
                );
                return Ok(());
            }
            print_history_table(&selected);
        }
    }

    Ok(())
}

fn print_history_table(entries: &[&AnalysisResult]) {
    println!("{}", "Analysis History".bold().cyan());
    println!("{}", "=".repeat(78));
    println!(
        "  {:<22} {:<12} {:>8}  Text",
        "Time", "Sentiment", "Score"
    );
    println!("  {}", "-".repeat(76));

    for (i, entry) in entries.iter().enumerate() {
        let label = format!("{:<12}", truncate(entry.label(), 12));
        let line = format!(
            "  {:<22} {} {:>8.3}  {}",
            entry.timestamp,
            colorize_class(entry.class(), &label),
            entry.score,
            truncate(&entry.text, 32),
        );

        if i % 2 == 0 {
            println!("{line}");
        } else {
            println!("{}", line.dimmed());
        }
    }
}

// ---------------------------------------------------------------------------
// senti stats
// ---------------------------------------------------------------------------

/// Show aggregate statistics over the current history.
pub fn run_stats(cfg: &SentiConfig, format: OutputFormat) -> Result<()> {
    let dashboard = open_dashboard(cfg)?;
    let summary = dashboard.summary();

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&summary)?),
        OutputFormat::Csv => print_stats_csv(&summary),
        OutputFormat::Table => {
            if summary.total == 0 {
                println!(
                    "{}",
                    "No data yet. Analyze some text to see the overview.".yellow()
                );
                return Ok(());
            }
            print_stats_table(&summary);
        }
    }

    Ok(())
}

fn print_stats_table(summary: &Summary) {
    println!("{}", "Sentiment Overview".bold().cyan());
    println!("{}", "=".repeat(50));
    println!();
    println!("  {} {}", "Total analyzed:".bold(), summary.total);
    println!("  {} {:.4}", "Average score: ".bold(), summary.average_score);
    println!();

    for class in Sentiment::ALL {
        let count = summary.counts.get(class);
        let pct = summary.counts.pct(class);
        let bar = "█".repeat((pct / 5.0).round() as usize);
        println!(
            "  {:<9} {:>4} {:>6.1}%  {}",
            class.label(),
            count,
            pct,
            colorize_class(class, &bar),
        );
    }
}

fn print_stats_csv(summary: &Summary) {
    println!("sentiment,count,pct");
    for class in Sentiment::ALL {
        println!(
            "{},{},{:.1}",
            class,
            summary.counts.get(class),
            summary.counts.pct(class)
        );
    }
}

// ---------------------------------------------------------------------------
// senti clear
// ---------------------------------------------------------------------------

/// Clear all history.
pub fn run_clear(cfg: &SentiConfig) -> Result<()> {
    let dashboard = open_dashboard(cfg)?;
    let removed = dashboard.len();
    dashboard.clear()?;
    println!(
        "{} Cleared {} history entries",
        "✓".green().bold(),
        removed
    );
    Ok(())
}

// ---------------------------------------------------------------------------
// senti web
// ---------------------------------------------------------------------------

/// Serve the web dashboard until interrupted.
pub fn run_web(cfg: &SentiConfig, addr: Option<&str>, no_open: bool) -> Result<()> {
    let dashboard = open_dashboard(cfg)?;
    if !dashboard.api().has_credential() {
        println!(
            "{} {}",
            "Warning:".yellow().bold(),
            "no API key configured; analyses will fail until SENTI_API_KEY is set.".yellow()
        );
    }
    let addr = addr.unwrap_or(&cfg.web.addr);
    web::serve(addr, &dashboard, cfg.web.open_browser && !no_open)
}

// ---------------------------------------------------------------------------
// senti health
// ---------------------------------------------------------------------------

/// Check credential, endpoint, config files, and history file.
pub fn run_health(cfg: &SentiConfig) -> Result<()> {
    println!("{}", "senti Health Check".bold().cyan());
    println!("{}", "=".repeat(40));

    let global_exists = config::global_config_file()
        .map(|p| p.exists())
        .unwrap_or(false);
    let project_exists = config::project_config_file()
        .map(|p| p.exists())
        .unwrap_or(false);
    print_health_item(
        "Global config",
        global_exists,
        if global_exists {
            "~/.senti/config.toml found"
        } else {
            "not found (run `senti config init` to create)"
        },
    );
    print_health_item(
        "Project config",
        project_exists,
        if project_exists {
            ".senti.toml found"
        } else {
            "none (optional)"
        },
    );

    let key = cfg.masked_api_key();
    print_health_item(
        "API key",
        key.is_some(),
        &key.unwrap_or_else(|| "missing (set SENTI_API_KEY or api.api_key)".to_string()),
    );
    print_health_item("Endpoint", true, &cfg.api.url);

    match config::history_path(cfg) {
        Some(path) => {
            let store = FileStore::new(&path);
            let (ok, detail) = match store.load() {
                Ok(entries) if store.exists() => {
                    (true, format!("{} entries in {}", entries.len(), path.display()))
                }
                Ok(_) => (true, format!("no history yet ({})", path.display())),
                Err(e) => (false, format!("unreadable: {e:#}")),
            };
            print_health_item("History file", ok, &detail);
        }
        None => print_health_item("History file", false, "could not determine home directory"),
    }

    print_health_item(
        "Logging",
        true,
        &format!("{} ({})", cfg.logging.level, cfg.logging.format),
    );

    Ok(())
}

fn print_health_item(name: &str, ok: bool, detail: &str) {
    let status = if ok {
        "✓".green().bold()
    } else {
        "✗".red().bold()
    };
    println!("  {} {:<16} {}", status, name, detail.dimmed());
}

// ---------------------------------------------------------------------------
// senti config show | init | set | reset
// ---------------------------------------------------------------------------

/// Show the effective (merged) configuration as TOML.
pub fn run_config_show() -> Result<()> {
    let toml_str = config::show_effective_config()?;
    println!("{}", "Effective senti Configuration".bold().cyan());
    println!("{}", "=".repeat(50));
    println!();
    println!("{toml_str}");

    let global_exists = config::global_config_file()
        .map(|p| p.exists())
        .unwrap_or(false);
    let project_exists = config::project_config_file()
        .map(|p| p.exists())
        .unwrap_or(false);
    println!("{}", "Sources (highest priority last):".dimmed());
    println!("  {} built-in defaults", "·".dimmed());
    print_source(global_exists, "~/.senti/config.toml");
    print_source(project_exists, ".senti.toml");
    println!(
        "  {} {}",
        "·".dimmed(),
        "SENTI_* environment variables".dimmed()
    );

    Ok(())
}

fn print_source(exists: bool, name: &str) {
    if exists {
        println!("  {} {}", "✓".green(), name.dimmed());
    } else {
        println!("  {} {}", "·".dimmed(), format!("{name} (not found)").dimmed());
    }
}

/// Initialize a default config file at `~/.senti/config.toml`.
pub fn run_config_init(force: bool) -> Result<()> {
    let path = config::init_config(force)?;
    println!(
        "{} Config written to {}",
        "✓".green().bold(),
        path.display()
    );
    println!(
        "  {}",
        "Set your API key with `senti config set api.api_key <key>`.".dimmed()
    );
    Ok(())
}

/// Set a single configuration value in the global config file.
pub fn run_config_set(key: &str, value: &str) -> Result<()> {
    config::set_config_value(key, value)?;
    let shown = if key == "api.api_key" {
        config::schema::mask_secret(value)
    } else {
        value.to_string()
    };
    println!("{} Set {} = {}", "✓".green().bold(), key.bold(), shown);
    Ok(())
}

/// Reset configuration to defaults.
pub fn run_config_reset() -> Result<()> {
    let path = config::reset_config()?;
    println!(
        "{} Config reset to defaults at {}",
        "✓".green().bold(),
        path.display()
    );
    Ok(())
}

// ---------------------------------------------------------------------------
// Formatting helpers
// ---------------------------------------------------------------------------

const CSV_HEADER: &str = "id,timestamp,sentiment,class,score,text";

fn csv_row(entry: &AnalysisResult) -> String {
    format!(
        "{},{},{},{},{},{}",
        entry.id,
        csv_field(&entry.timestamp),
        csv_field(entry.sentiment.as_deref().unwrap_or("")),
        entry.class(),
        entry.score,
        csv_field(&entry.text),
    )
}

/// Quote a CSV field when it contains a delimiter, quote, or newline.
fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Truncate a string to `max_len` characters, appending "…" if truncated.
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_len.saturating_sub(1)).collect();
        format!("{head}…")
    }
}

/// Color text by sentiment class.
fn colorize_class(class: Sentiment, text: &str) -> colored::ColoredString {
    match class {
        Sentiment::Positive => text.green(),
        Sentiment::Negative => text.red(),
        Sentiment::Neutral => text.normal(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
