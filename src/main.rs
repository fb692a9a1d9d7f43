// src/main.rs

//! Harvester CLI
//!
//! Local entry point: takes search keywords, runs the harvest pipeline and
//! appends extracted records to the configured CSV file.

use std::path::PathBuf;

use clap::Parser;
use tokio::sync::watch;

use harvester::{
    error::{AppError, Result},
    models::Config,
    pipeline::run_harvest,
    storage::CsvSink,
};

/// Harvests structured title records from IMDb search results
#[derive(Parser, Debug)]
#[command(name = "harvester", version)]
struct Cli {
    /// Search keywords
    #[arg(required_unless_present = "keywords_file")]
    keywords: Vec<String>,

    /// File with one keyword per line, merged after positional keywords
    #[arg(long)]
    keywords_file: Option<PathBuf>,

    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "harvester.toml")]
    config: PathBuf,

    /// Override the output CSV path from the config
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Collect keywords from the command line and the optional keywords file.
fn load_keywords(cli: &Cli) -> Result<Vec<String>> {
    let mut keywords: Vec<String> = cli
        .keywords
        .iter()
        .map(|k| k.trim().to_string())
        .filter(|k| !k.is_empty())
        .collect();

    if let Some(path) = &cli.keywords_file {
        let content = std::fs::read_to_string(path)?;
        keywords.extend(
            content
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty() && !line.starts_with('#'))
                .map(str::to_string),
        );
    }

    if keywords.is_empty() {
        return Err(AppError::validation("No keywords given"));
    }
    Ok(keywords)
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut config = Config::load_or_default(&cli.config);
    if let Some(path) = &cli.output {
        config.output.csv_path = path.to_string_lossy().into_owned();
    }
    config.validate()?;

    let keywords = load_keywords(&cli)?;
    log::info!(
        "Harvester starting: {} keyword(s), output {}",
        keywords.len(),
        config.output.csv_path
    );

    // Flip the shutdown flag on Ctrl-C; the pipeline checks it between
    // links and keywords, flushing what it already has.
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            log::warn!("Ctrl-C received, finishing in-flight work");
            let _ = shutdown_tx.send(true);
        }
    });

    let mut sink = CsvSink::new(&config.output.csv_path);
    let stats = run_harvest(&config, &keywords, &mut sink, shutdown_rx).await?;

    log::info!(
        "Done: {} records appended to {}",
        stats.record_count,
        config.output.csv_path
    );
    Ok(())
}
