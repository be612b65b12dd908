use anyhow::{Result, bail};
use clap::{Parser, Subcommand};

use senti::sentiment::Sentiment;
use senti::{cli, config, logging};

#[derive(Debug, Parser)]
#[command(name = "senti")]
#[command(about = "Analyze text sentiment and track results over time")]
struct App {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Analyze a piece of text and record the result in history
    Analyze {
        /// The text to analyze
        #[arg(trailing_var_arg = true, required = true, allow_hyphen_values = true)]
        text: Vec<String>,
        /// Output format: table (default), json, csv
        #[arg(long, default_value = "table")]
        format: String,
    },
    /// List analysis history, newest first
    History {
        /// Output format: table (default), json, csv
        #[arg(long, default_value = "table")]
        format: String,
        /// Only show one class: positive, negative, neutral
        #[arg(long)]
        sentiment: Option<String>,
        /// Show at most N entries
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Show sentiment counts, percentages and average score
    Stats {
        /// Output format: table (default), json, csv
        #[arg(long, default_value = "table")]
        format: String,
    },
    /// Clear all analysis history
    Clear,
    /// Serve the web dashboard
    Web {
        /// Address to bind, overriding web.addr
        #[arg(long)]
        addr: Option<String>,
        /// Do not open a browser window
        #[arg(long)]
        no_open: bool,
    },
    /// Check API key, config files and history file
    Health,
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Debug, Subcommand)]
enum ConfigAction {
    /// Show the effective configuration
    Show,
    /// Write a default config to ~/.senti/config.toml
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Set a value, e.g. `senti config set web.addr 127.0.0.1:8080`
    Set { key: String, value: String },
    /// Reset the global config to defaults
    Reset,
}

fn main() -> Result<()> {
    let app = App::parse();
    let cfg = config::load();
    logging::init(&cfg.logging);

    match app.command {
        Commands::Analyze { text, format } => {
            let fmt = cli::OutputFormat::from_str_opt(Some(&format));
            cli::run_analyze(&cfg, &text.join(" "), fmt)
        }
        Commands::History {
            format,
            sentiment,
            limit,
        } => {
            let class = match sentiment.as_deref() {
                Some(s) => match Sentiment::parse(s) {
                    Some(class) => Some(class),
                    None => bail!("unknown sentiment '{s}' (expected positive, negative or neutral)"),
                },
                None => None,
            };
            let fmt = cli::OutputFormat::from_str_opt(Some(&format));
            cli::run_history(&cfg, fmt, class, limit)
        }
        Commands::Stats { format } => {
            let fmt = cli::OutputFormat::from_str_opt(Some(&format));
            cli::run_stats(&cfg, fmt)
        }
        Commands::Clear => cli::run_clear(&cfg),
        Commands::Web { addr, no_open } => cli::run_web(&cfg, addr.as_deref(), no_open),
        Commands::Health => cli::run_health(&cfg),
        Commands::Config { action } => match action {
            ConfigAction::Show => cli::run_config_show(),
            ConfigAction::Init { force } => cli::run_config_init(force),
            ConfigAction::Set { key, value } => cli::run_config_set(&key, &value),
            ConfigAction::Reset => cli::run_config_reset(),
        },
    }
}
