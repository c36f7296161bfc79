//! Homework bot CLI
//!
//! Command-line entry point for the review status watcher.

use std::path::PathBuf;

use clap::Parser;
use homework_bot::config::load_env_file;
use homework_bot::{load_config, BotBuilder, Config};
use tokio_util::sync::CancellationToken;
use tracing::Level;

#[derive(Parser)]
#[command(name = "homework-bot")]
#[command(about = "Watches homework review statuses and relays changes to Telegram")]
#[command(version)]
struct Args {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Path to a .env file with credentials (defaults to searching for .env)
    #[arg(long)]
    env_file: Option<PathBuf>,

    /// Seconds between requests (overrides config file)
    #[arg(long)]
    retry_period: Option<u64>,

    /// Log level
    #[arg(short, long, default_value = "info")]
    log_level: Level,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(args.log_level)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::debug!(
        "Parsed command line arguments: config={:?}, env_file={:?}, retry_period={:?}, log_level={:?}",
        args.config,
        args.env_file,
        args.retry_period,
        args.log_level
    );

    let mut config = if let Some(config_path) = &args.config {
        tracing::debug!("Loading configuration from {:?}", config_path);
        load_config(config_path)?
    } else {
        tracing::debug!("Using default configuration");
        Config::default()
    };

    load_env_file(args.env_file.as_deref());
    config.resolve_secrets();

    if let Some(retry_period) = args.retry_period {
        config.polling.retry_period_seconds = retry_period;
    }

    let cancel = CancellationToken::new();
    let cancel_for_signal = cancel.clone();
    tokio::spawn(async move {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to listen for ctrl-c");
        tracing::info!("Shutdown signal received");
        cancel_for_signal.cancel();
    });

    tracing::info!("Starting homework bot");
    BotBuilder::new(config)
        .with_cancellation_token(cancel)
        .build()?
        .start()
        .await?;

    Ok(())
}
