use std::path::PathBuf;

use colored::Colorize;
use comfy_table::{Cell, Table};

use penny::analytics::total;
use penny::answer::NO_EXPENSES;
use penny::period::first_of_month;
use penny::{Clock, Formatter, KrwFormatter, LocalClock, Period, TransactionStore};

use super::{db_path, open_store, parse_month_arg};

pub async fn run(db: Option<PathBuf>, month: Option<&str>) -> anyhow::Result<()> {
    let now = LocalClock.now();
    let first = match month {
        Some(raw) => parse_month_arg(raw)?,
        None => first_of_month(now.date()),
    };

    let store = open_store(&db_path(db))?;
    let txns = store
        .fetch_by_range(Period::month_of(first).date_range(now))
        .await?;

    let f = KrwFormatter;
    if txns.is_empty() {
        println!("{}: {NO_EXPENSES}", f.format_month(first));
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["ID", "Date", "Category", "Amount", "Note"]);
    for t in &txns {
        table.add_row(vec![
            Cell::new(t.id),
            Cell::new(f.format_date(t.date.date())),
            Cell::new(&t.category),
            Cell::new(f.format_currency(t.amount)),
            Cell::new(&t.note),
        ]);
    }
    table.add_row(vec![
        Cell::new(""),
        Cell::new("Total".bold()),
        Cell::new(""),
        Cell::new(f.format_currency(total(&txns)).bold()),
        Cell::new(""),
    ]);
    println!("{}\n{table}", f.format_month(first));
    Ok(())
}
