//! Tender-Scrape main entry point
//!
//! This is the command-line interface for the tender collector and its
//! read API.

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::net::SocketAddr;
use std::path::PathBuf;
use tender_scrape::api::{self, ApiState};
use tender_scrape::config::{load_config_with_hash, Config};
use tender_scrape::scrape::{run_scrape, RunOptions};
use tracing_subscriber::EnvFilter;

/// Tender-Scrape: collects tender listings and serves them back
///
/// Walks the paginated search results of a tender site, writes the
/// collected tenders to a CSV file and appends them to a SQLite store.
#[derive(Parser, Debug)]
#[command(name = "tender-scrape")]
#[command(version)]
#[command(about = "Tender listing collector", long_about = None)]
struct Cli {
    /// Path to an optional TOML configuration file
    #[arg(short, long, value_name = "CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose", global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Collect tenders and persist them to the CSV file and the store
    Run {
        /// Maximum number of tenders to collect
        #[arg(long = "max", value_name = "N", value_parser = clap::value_parser!(u64).range(1..))]
        max: Option<u64>,

        /// CSV output file
        #[arg(long, value_name = "PATH")]
        output: Option<PathBuf>,

        /// Start the read API once the scrape has finished
        #[arg(long)]
        serve: bool,
    },

    /// Serve the read API over the store
    Serve {
        /// Address to listen on
        #[arg(long, value_name = "ADDR")]
        bind: Option<SocketAddr>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let config = load(cli.config.as_deref())?;

    match cli.command {
        Command::Run { max, output, serve } => {
            handle_run(&config, max, output).await?;
            if serve {
                handle_serve(&config, None).await?;
            }
        }
        Command::Serve { bind } => handle_serve(&config, bind).await?,
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("tender_scrape=info,warn"),
            1 => EnvFilter::new("tender_scrape=debug,info"),
            2 => EnvFilter::new("tender_scrape=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Loads the configuration file if one was given, defaults otherwise
fn load(path: Option<&std::path::Path>) -> anyhow::Result<Config> {
    let Some(path) = path else {
        tracing::debug!("No configuration file given, using defaults");
        return Ok(Config::default());
    };

    tracing::info!("Loading configuration from: {}", path.display());
    let (config, hash) = load_config_with_hash(path)
        .with_context(|| format!("Failed to load configuration from {}", path.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", hash);
    Ok(config)
}

/// Handles `run`: collects tenders and writes both sinks
async fn handle_run(
    config: &Config,
    max: Option<u64>,
    output: Option<PathBuf>,
) -> anyhow::Result<()> {
    let mut options = RunOptions::from_config(config);
    if let Some(max) = max {
        options.max_records = usize::try_from(max).unwrap_or(usize::MAX);
    }
    if let Some(output) = output {
        options.csv_path = output;
    }

    tracing::info!(
        "Starting scrape of {} (max {} tenders, {} pages)",
        config.source.search_url,
        options.max_records,
        config.pagination.max_pages
    );

    let summary = run_scrape(config, &options).await.context("Scrape failed")?;

    tracing::info!(
        "Scrape finished: {} tenders, {} pages, {} skipped, {} rows stored ({})",
        summary.collected,
        summary.pages_visited,
        summary.skipped_items,
        summary.rows_appended,
        summary.stop_reason.as_str()
    );

    Ok(())
}

/// Handles `serve` (and `run --serve`): runs the read API until killed
async fn handle_serve(config: &Config, bind: Option<SocketAddr>) -> anyhow::Result<()> {
    let addr = match bind {
        Some(addr) => addr,
        None => config
            .api
            .bind
            .parse()
            .with_context(|| format!("Invalid bind address {}", config.api.bind))?,
    };

    let state = ApiState::new(&config.output.database_path);
    api::serve(addr, state)
        .await
        .with_context(|| format!("Read API on {} failed", addr))
}
