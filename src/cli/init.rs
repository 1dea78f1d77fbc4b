use std::path::PathBuf;

use anyhow::{bail, Context};

use penny::settings::{load_settings, save_settings, shellexpand_path};
use penny::{Formatter, KrwFormatter};

use super::open_store;

pub fn run(data_dir: Option<String>, budget: Option<f64>, db: Option<PathBuf>) -> anyhow::Result<()> {
    let mut settings = load_settings();
    if let Some(dir) = data_dir {
        settings.data_dir = shellexpand_path(&dir);
    }
    if let Some(budget) = budget {
        if !budget.is_finite() || budget < 0.0 {
            bail!("budget must be zero or more, got {budget}");
        }
        settings.monthly_budget = budget;
    }

    let data_dir = PathBuf::from(shellexpand_path(&settings.data_dir));
    std::fs::create_dir_all(&data_dir)
        .with_context(|| format!("creating {}", data_dir.display()))?;
    save_settings(&settings)?;

    let db_path = db.unwrap_or_else(|| data_dir.join("penny.db"));
    open_store(&db_path)?;

    println!("Penny is ready: {}", db_path.display());
    println!(
        "Monthly budget: {}",
        KrwFormatter.format_currency(settings.monthly_budget)
    );
    Ok(())
}
