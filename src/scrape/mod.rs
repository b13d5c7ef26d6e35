//! Scrape module - collection and persistence of one run
//!
//! This module contains the scrape path:
//! - Record extraction for a single listing item
//! - The bounded pagination loop
//! - The run pipeline that hands the collected records to both sinks

mod extractor;
mod pagination;

pub use extractor::{extract, strip_number_prefix, ExtractionError};
pub use pagination::{collect, Collection, StopReason};

use crate::config::Config;
use crate::session::{HttpSession, PageSession};
use crate::{output, storage, Result};
use std::path::{Path, PathBuf};

/// Per-run options supplied on the command line
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Cap on the number of records collected
    pub max_records: usize,

    /// Destination of the CSV sink
    pub csv_path: PathBuf,
}

impl RunOptions {
    /// Options taken from configuration defaults
    pub fn from_config(config: &Config) -> Self {
        Self {
            max_records: config.pagination.default_max_records,
            csv_path: PathBuf::from(&config.output.csv_path),
        }
    }
}

/// Outcome of a complete run
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub collected: usize,
    pub pages_visited: u32,
    pub skipped_items: usize,
    pub stop_reason: StopReason,

    /// Rows added to the store; zero when nothing was collected
    pub rows_appended: usize,

    /// CSV file written, if any
    pub csv_path: Option<PathBuf>,
}

/// Runs a complete scrape over HTTP
///
/// This is the main entry point for a scrape. It will:
/// 1. Open an HTTP page session
/// 2. Collect records through the search results
/// 3. Write the CSV file and append to the SQLite store
///
/// # Example
///
/// ```no_run
/// use tender_scrape::config::Config;
/// use tender_scrape::scrape::{run_scrape, RunOptions};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = Config::default();
/// let summary = run_scrape(&config, &RunOptions::from_config(&config)).await?;
/// println!("{} tenders collected", summary.collected);
/// # Ok(())
/// # }
/// ```
pub async fn run_scrape(config: &Config, options: &RunOptions) -> Result<RunSummary> {
    let mut session = HttpSession::from_config(&config.source, config.timeouts.request())?;
    run_with_session(&mut session, config, options).await
}

/// Runs a complete scrape over the given session
///
/// An empty collection writes nothing and only logs a warning. Sink
/// failures are fatal for the run.
pub async fn run_with_session<S: PageSession + ?Sized>(
    session: &mut S,
    config: &Config,
    options: &RunOptions,
) -> Result<RunSummary> {
    let collection = collect(session, config, options.max_records).await;

    let mut summary = RunSummary {
        collected: collection.records.len(),
        pages_visited: collection.pages_visited,
        skipped_items: collection.skipped_items,
        stop_reason: collection.stop_reason,
        rows_appended: 0,
        csv_path: None,
    };

    if collection.records.is_empty() {
        tracing::warn!("No tenders parsed");
        return Ok(summary);
    }

    output::write_all(&collection.records, &options.csv_path)?;
    summary.csv_path = Some(options.csv_path.clone());

    summary.rows_appended =
        storage::append_all(Path::new(&config.output.database_path), &collection.records)?;

    Ok(summary)
}
