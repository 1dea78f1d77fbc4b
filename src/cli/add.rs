use std::path::PathBuf;

use anyhow::bail;
use chrono::{Local, Timelike};

use penny::{Formatter, KrwFormatter};

use super::{db_path, open_store, parse_date_arg};

pub fn run(
    db: Option<PathBuf>,
    amount: f64,
    category: &str,
    date: Option<&str>,
    note: &str,
) -> anyhow::Result<()> {
    if !amount.is_finite() || amount < 0.0 {
        bail!("amount must be zero or more, got {amount}");
    }
    let category = category.trim();
    if category.is_empty() {
        bail!("category must not be empty");
    }
    let date = match date {
        Some(raw) => parse_date_arg(raw)?,
        None => {
            let now = Local::now().naive_local();
            now.with_nanosecond(0).unwrap_or(now)
        }
    };

    let store = open_store(&db_path(db))?;
    let id = store.add(date, category, amount, note.trim())?;

    let f = KrwFormatter;
    println!(
        "Added #{id}: {} {category} {}",
        f.format_date(date.date()),
        f.format_currency(amount)
    );
    Ok(())
}
