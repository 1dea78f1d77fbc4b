pub mod add;
pub mod ask;
pub mod chat;
pub mod init;
pub mod list;
pub mod reset;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use clap::{Parser, Subcommand};

use penny::settings::{get_data_dir, load_settings};
use penny::{Assistant, KeywordClassifier, SqliteStore};

#[derive(Parser)]
#[command(name = "penny", about = "Ask about your spending in plain Korean.")]
pub struct Cli {
    /// Database file (default: <data_dir>/penny.db)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Set up Penny: choose a data directory and create the database.
    Init {
        /// Path for Penny data (default: ~/Documents/penny)
        #[arg(long = "data-dir")]
        data_dir: Option<String>,
        /// Monthly budget in won
        #[arg(long)]
        budget: Option<f64>,
    },
    /// Record an expense.
    Add {
        /// Amount in won
        amount: f64,
        #[arg(long, short)]
        category: String,
        /// YYYY-MM-DD or "YYYY-MM-DD HH:MM" (default: now)
        #[arg(long)]
        date: Option<String>,
        /// Free text; mention 카드 or 현금 to track the payment type
        #[arg(long, default_value = "")]
        note: String,
    },
    /// List a month's expenses.
    List {
        /// YYYY-MM (default: this month)
        #[arg(long)]
        month: Option<String>,
    },
    /// Ask one question. Follow-up questions remember the previous ones.
    Ask {
        #[arg(required = true, num_args = 1..)]
        question: Vec<String>,
    },
    /// Chat interactively.
    Chat,
    /// Forget the conversation carried between `ask` calls.
    Reset,
}

pub(crate) fn db_path(db: Option<PathBuf>) -> PathBuf {
    db.unwrap_or_else(|| get_data_dir().join("penny.db"))
}

/// The context saved by `ask` lives next to the database.
pub(crate) fn session_path(db_path: &Path) -> PathBuf {
    db_path
        .parent()
        .unwrap_or_else(|| Path::new("."))
        .join("session.json")
}

pub(crate) fn open_store(db_path: &Path) -> anyhow::Result<SqliteStore> {
    if let Some(dir) = db_path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("creating {}", dir.display()))?;
    }
    SqliteStore::open(db_path).with_context(|| format!("opening {}", db_path.display()))
}

pub(crate) fn build_assistant(db_path: &Path) -> anyhow::Result<Assistant> {
    let store = open_store(db_path)?;
    let config = load_settings().assistant_config();
    Ok(Assistant::new(Arc::new(store), config).with_classifier(Arc::new(KeywordClassifier)))
}

pub(crate) fn parse_date_arg(raw: &str) -> anyhow::Result<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M") {
        return Ok(dt);
    }
    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .with_context(|| format!("invalid date '{raw}', expected YYYY-MM-DD"))?;
    Ok(date.and_time(NaiveTime::MIN))
}

pub(crate) fn parse_month_arg(raw: &str) -> anyhow::Result<NaiveDate> {
    NaiveDate::parse_from_str(&format!("{}-01", raw.trim()), "%Y-%m-%d")
        .with_context(|| format!("invalid month '{raw}', expected YYYY-MM"))
}
