use std::path::PathBuf;

use anyhow::Context;

use super::{db_path, session_path};

pub fn run(db: Option<PathBuf>) -> anyhow::Result<()> {
    let path = session_path(&db_path(db));
    if path.exists() {
        std::fs::remove_file(&path).with_context(|| format!("removing {}", path.display()))?;
    }
    println!("대화를 초기화했어요.");
    Ok(())
}
