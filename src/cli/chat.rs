use std::io::Write;
use std::path::PathBuf;

use colored::Colorize;
use tokio::io::{AsyncBufReadExt, BufReader};

use penny::ChatSession;

use super::{build_assistant, db_path};

pub async fn run(db: Option<PathBuf>) -> anyhow::Result<()> {
    let session = ChatSession::new(build_assistant(&db_path(db))?);
    println!(
        "{}",
        "지출에 대해 물어보세요. /reset 대화 초기화, /quit 종료".dimmed()
    );

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("{} ", ">".bold());
        std::io::stdout().flush()?;
        let Some(line) = lines.next_line().await? else {
            break;
        };
        match line.trim() {
            "" => continue,
            "/quit" | "/exit" => break,
            "/reset" => {
                session.reset().await;
                println!("{}", "대화를 초기화했어요.".dimmed());
            }
            text => {
                let reply = session.handle_turn(text).await?;
                println!("{} {reply}", "penny:".cyan().bold());
            }
        }
    }
    Ok(())
}
