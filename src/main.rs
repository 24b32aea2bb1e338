// ABOUTME: Main entry point for the sellcar CLI
//
// Binary: sellcar
// Usage: sellcar [COMMAND]
// - No command: runs the interactive sell wizard
// - options: list choices for a step
// - locate: search location suggestions
// - draft: show or clear the saved draft
// - submit: create the listing from the saved draft

#![allow(missing_docs)]

use anyhow::Result;
use clap::Parser;
use sellcar::cli::{self, util::CliContext, Commands, SellArgs};
use sellcar::config::AppConfig;
use std::path::Path;

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::Cli::parse();
    let config = AppConfig::load()?;

    if let Ok(log_dir) = config.log_dir() {
        setup_logging(&log_dir);
    }
    setup_panic_handler();

    let ctx = CliContext::new(config, args.format);

    match args.command {
        Some(Commands::Options(options_args)) => cli::options::execute(options_args, &ctx).await,
        Some(Commands::Locate(locate_args)) => cli::locate::execute(locate_args, &ctx).await,
        Some(Commands::Draft(draft_args)) => cli::draft::execute(draft_args, &ctx).await,
        Some(Commands::Submit(submit_args)) => cli::submit::execute(submit_args, &ctx).await,
        Some(Commands::Sell(sell_args)) => cli::sell::execute(sell_args, &ctx).await,
        None => cli::sell::execute(SellArgs::default(), &ctx).await,
    }
}

fn setup_logging(log_dir: &Path) {
    use std::fs::OpenOptions;
    use tracing_subscriber::prelude::*;

    if std::fs::create_dir_all(log_dir).is_err() {
        return;
    }

    // JSONL log file with timestamp
    let log_file = log_dir.join(format!(
        "sellcar-{}.jsonl",
        chrono::Local::now().format("%Y%m%d-%H%M%S")
    ));

    let Ok(file) = OpenOptions::new().create(true).append(true).open(&log_file) else {
        eprintln!("Could not open log file {}", log_file.display());
        return;
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_target(true)
                .with_writer(file)
                .with_ansi(false),
        )
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sellcar=info".into()),
        )
        .init();
}

fn setup_panic_handler() {
    use tracing::error;

    std::panic::set_hook(Box::new(|panic_info| {
        error!("Application panicked: {}", panic_info);
        eprintln!("Application panicked: {}", panic_info);
        eprintln!("Please check the logs for more details.");
    }));
}
