use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing::warn;

use penny::{ChatSession, ConversationContext};

use super::{build_assistant, db_path, session_path};

pub async fn run(db: Option<PathBuf>, question: &str) -> anyhow::Result<()> {
    let db_path = db_path(db);
    let assistant = build_assistant(&db_path)?;
    let path = session_path(&db_path);

    let session = ChatSession::resume(assistant, load_context(&path));
    let reply = session.handle_turn(question).await?;
    println!("{reply}");

    save_context(&path, &session.context().await)
}

/// The saved context, or a fresh one when there is none or it is unreadable.
pub(crate) fn load_context(path: &Path) -> ConversationContext {
    match std::fs::read_to_string(path) {
        Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
            warn!(path = %path.display(), error = %e, "discarding unreadable session");
            ConversationContext::default()
        }),
        Err(_) => ConversationContext::default(),
    }
}

pub(crate) fn save_context(path: &Path, context: &ConversationContext) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(context)?;
    std::fs::write(path, format!("{json}\n"))
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}
