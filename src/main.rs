use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use wordgame::bank;
use wordgame::records::DEFAULT_RECORD_LIMIT;
use wordgame::{ConfigPatch, FileStorage, GameConfig, Outcome, ProgressStore};

#[derive(Parser)]
#[command(name = "wordgame")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Directory holding saved game data
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Record an answer for a word
    Answer {
        /// The word that was answered
        word: String,
        /// `correct` or `wrong`
        outcome: Outcome,
    },
    /// Show statistics for a word
    Stat {
        /// The word to look up
        word: String,
    },
    /// Recompute and show overall progress
    Progress,
    /// Save a finished session from a JSON object
    Record {
        /// Session fields, e.g. '{"score": 12}'
        json: String,
    },
    /// List recent sessions, newest first
    History {
        /// Maximum number of sessions to show
        #[arg(short, long, default_value_t = DEFAULT_RECORD_LIMIT)]
        limit: usize,
    },
    /// Show word banks, or switch to another one
    Bank {
        /// Bank to switch to
        id: Option<String>,
    },
    /// Show configuration, or change the given options
    Config {
        #[arg(long)]
        auto_delay: Option<f64>,
        #[arg(long)]
        sound_effects: Option<bool>,
        #[arg(long)]
        show_hints: Option<bool>,
        #[arg(long)]
        difficulty_adjust: Option<bool>,
        #[arg(long)]
        random_selection: Option<bool>,
    },
    /// Write a backup of all game data
    Export {
        /// Directory to write the backup into
        #[arg(short, long, default_value = ".")]
        output: PathBuf,
    },
    /// Replace game data with the contents of a backup
    Import {
        /// Backup file to read
        path: PathBuf,
    },
    /// Erase all game data
    Reset {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "wordgame=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false).with_writer(io::stderr))
        .init();

    let cli = Cli::parse();

    let data_dir = match cli.data_dir {
        Some(dir) => dir,
        None => GameConfig::data_dir()?,
    };
    let mut store = ProgressStore::new(FileStorage::new(data_dir));
    let report = store.load_report();
    if report.has_failures() {
        tracing::warn!(
            "Some saved data in {:?} could not be loaded; defaults were used",
            store.storage().dir()
        );
    } else if report.statuses().iter().all(|status| status.is_defaulted()) {
        tracing::info!("No saved data in {:?}, starting fresh", store.storage().dir());
    }

    match cli.command {
        Commands::Answer { word, outcome } => {
            let stat = store.update_word_stat(&word, outcome);
            print_json(&stat)?;
        }
        Commands::Stat { word } => {
            print_json(&store.get_word_stat(&word))?;
        }
        Commands::Progress => {
            print_json(&store.get_progress())?;
        }
        Commands::Record { json } => {
            let record: serde_json::Value =
                serde_json::from_str(&json).context("Session record is not valid JSON")?;
            store.save_game_record(&record)?;
        }
        Commands::History { limit } => {
            print_json(&store.get_game_records(limit))?;
        }
        Commands::Bank { id: Some(id) } => {
            store.set_current_bank(&id)?;
            let bank = store.get_current_bank();
            println!("{} ({} words)", bank.name, bank.count);
        }
        Commands::Bank { id: None } => {
            let current = store.get_config().current_bank;
            for bank in bank::catalog() {
                let marker = if bank.id == current { "*" } else { " " };
                println!("{} {:<24} {:<28} {:>5}", marker, bank.id, bank.name, bank.count);
            }
        }
        Commands::Config {
            auto_delay,
            sound_effects,
            show_hints,
            difficulty_adjust,
            random_selection,
        } => {
            let patch = ConfigPatch {
                current_bank: None,
                auto_delay,
                sound_effects,
                show_hints,
                difficulty_adjust,
                random_selection,
            };
            if !patch.is_empty() {
                store.save_config(patch)?;
            }
            print_json(&store.get_config())?;
        }
        Commands::Export { output } => {
            let artifact = store.export_data()?;
            let path = artifact
                .save_in(&output)
                .with_context(|| format!("Failed to write backup to {:?}", output))?;
            println!("{}", path.display());
        }
        Commands::Import { path } => {
            let text = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read backup from {:?}", path))?;
            store.import_data(&text)?;
        }
        Commands::Reset { yes } => {
            let confirmed = yes || confirm("Reset all game data? This cannot be undone. [y/N] ")?;
            if store.reset_data(confirmed) {
                println!("All game data erased");
            } else {
                println!("Reset cancelled");
            }
        }
    }

    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let text = serde_json::to_string_pretty(value).context("Failed to format output")?;
    println!("{}", text);
    Ok(())
}

/// Ask a yes/no question on the terminal
fn confirm(prompt: &str) -> Result<bool> {
    print!("{}", prompt);
    io::stdout().flush()?;

    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer).context("Failed to read answer")?;
    Ok(matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
}
