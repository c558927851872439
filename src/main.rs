use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

use commands::{ConfigCommand, DayCommand, FoodCommand, ReadingCommand};
use glucon::config::Config;
use glucon::{init_db, DayAggregator, FoodEntryRepository, ReadingRepository};

#[derive(Parser)]
#[command(name = "glucon")]
#[command(version)]
#[command(about = "A diary for meals and blood sugar readings", long_about = None)]
struct Cli {
    /// Path to config file
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Log and manage food entries
    Food(FoodCommand),

    /// Record and manage blood sugar readings
    Reading(ReadingCommand),

    /// Show everything logged on a day
    Day(DayCommand),

    /// Manage configuration
    Config(ConfigCommand),
}

#[tokio::main]
async fn main() {
    // Logs go to stderr so command output stays clean
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "glucon=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Load configuration
    let config = Config::load(cli.config)?;
    tracing::debug!(
        "Using database {} ({})",
        config.database_path.value.display(),
        config.database_path.source
    );

    match cli.command {
        Some(Commands::Food(cmd)) => {
            let storage = init_db(config.database_path.value.clone()).await?;
            let repo = FoodEntryRepository::new(storage.clone());
            let result = cmd.run(&repo).await;
            storage.close().await;
            result?;
        }
        Some(Commands::Reading(cmd)) => {
            let storage = init_db(config.database_path.value.clone()).await?;
            let repo = ReadingRepository::new(storage.clone());
            let result = cmd.run(&repo).await;
            storage.close().await;
            result?;
        }
        Some(Commands::Day(cmd)) => {
            let storage = init_db(config.database_path.value.clone()).await?;
            let mut aggregator = DayAggregator::new(&storage);
            let result = cmd.run(&mut aggregator).await;
            storage.close().await;
            result?;
        }
        Some(Commands::Config(cmd)) => {
            cmd.run(&config)?;
        }
        None => {
            println!("Use --help to see available commands");
        }
    }

    Ok(())
}
