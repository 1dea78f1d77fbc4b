mod cli;

use clap::Parser;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use cli::{Cli, Commands};

#[tokio::main]
async fn main() {
    // Replies go to stdout, logs to stderr.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let db = cli.db;

    let result = match cli.command {
        Commands::Init { data_dir, budget } => cli::init::run(data_dir, budget, db),
        Commands::Add {
            amount,
            category,
            date,
            note,
        } => cli::add::run(db, amount, &category, date.as_deref(), &note),
        Commands::List { month } => cli::list::run(db, month.as_deref()).await,
        Commands::Ask { question } => cli::ask::run(db, &question.join(" ")).await,
        Commands::Chat => cli::chat::run(db).await,
        Commands::Reset => cli::reset::run(db),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}
