//! Pagination controller - the bounded collection loop
//!
//! This module drives a [`PageSession`] through the search results:
//! - Bootstraps the search (load page, wait for form, trigger search)
//! - Waits for listing items on every page, scrolls, extracts
//! - Advances through the next-page control until a cap is hit
//! - Closes the session on every exit path

use crate::config::Config;
use crate::scrape::extractor::extract;
use crate::session::{PageSession, SessionError};
use crate::tender::TenderRecord;

/// Why the collection loop stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The record cap was reached
    RecordCap,

    /// The page cap was reached
    PageCap,

    /// The next-page control never became clickable, or clicking it failed
    NoNextPage,

    /// Listing items did not appear on a results page
    PageLoadFailed,

    /// The search page could not be loaded or the search not started
    BootstrapFailed,
}

impl StopReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RecordCap => "record cap reached",
            Self::PageCap => "page cap reached",
            Self::NoNextPage => "no next page",
            Self::PageLoadFailed => "page load failed",
            Self::BootstrapFailed => "search page failed",
        }
    }
}

/// Records gathered by one collection run
#[derive(Debug, Clone)]
pub struct Collection {
    /// Extracted records in page order
    pub records: Vec<TenderRecord>,

    /// Number of results pages whose items were read
    pub pages_visited: u32,

    /// Items skipped because extraction failed
    pub skipped_items: usize,

    pub stop_reason: StopReason,
}

impl Collection {
    fn empty(stop_reason: StopReason) -> Self {
        Self {
            records: Vec::new(),
            pages_visited: 0,
            skipped_items: 0,
            stop_reason,
        }
    }
}

/// Collects up to `max_records` tender records from the search results
///
/// The session is closed before returning, whatever the outcome. Failures
/// never propagate: an item that fails to extract is skipped, a page that
/// fails to load or advance ends the loop with the records gathered so far.
///
/// # Arguments
///
/// * `session` - The page session to drive
/// * `config` - Source URL, selectors, page cap and timeouts
/// * `max_records` - Cap on the number of records returned
pub async fn collect<S: PageSession + ?Sized>(
    session: &mut S,
    config: &Config,
    max_records: usize,
) -> Collection {
    let collection = match bootstrap(session, config).await {
        Ok(()) => walk_pages(session, config, max_records).await,
        Err(e) => {
            tracing::error!(
                "Error loading search page {}: {}",
                config.source.search_url,
                e
            );
            Collection::empty(StopReason::BootstrapFailed)
        }
    };

    if let Err(e) = session.close().await {
        tracing::warn!("Failed to close session: {}", e);
    }

    tracing::info!(
        "Collected {} tenders from {} pages ({} skipped, stopped: {})",
        collection.records.len(),
        collection.pages_visited,
        collection.skipped_items,
        collection.stop_reason.as_str()
    );

    collection
}

/// Loads the search page and triggers the search
async fn bootstrap<S: PageSession + ?Sized>(
    session: &mut S,
    config: &Config,
) -> Result<(), SessionError> {
    session.load(&config.source.search_url).await?;
    tracing::info!("Page loaded: {}", config.source.search_url);

    session
        .wait_for(&config.selectors.search_form, config.timeouts.search_form())
        .await?;
    session.click(&config.selectors.search_button).await?;
    Ok(())
}

/// Walks results pages until a cap is hit or a page fails
async fn walk_pages<S: PageSession + ?Sized>(
    session: &mut S,
    config: &Config,
    max_records: usize,
) -> Collection {
    let selectors = &config.selectors;
    let timeouts = &config.timeouts;
    let max_pages = config.pagination.max_pages;

    let mut collection = Collection::empty(StopReason::PageCap);

    loop {
        if collection.records.len() >= max_records {
            collection.stop_reason = StopReason::RecordCap;
            break;
        }

        let page = collection.pages_visited + 1;

        if let Err(e) = session
            .wait_for(&selectors.tender_row, timeouts.tender_rows())
            .await
        {
            tracing::error!("Error loading results page {}: {}", page, e);
            collection.stop_reason = StopReason::PageLoadFailed;
            break;
        }

        if let Err(e) = settle(session, config).await {
            tracing::error!("Error loading results page {}: {}", page, e);
            collection.stop_reason = StopReason::PageLoadFailed;
            break;
        }

        let items = match session.find_all(&selectors.tender_row).await {
            Ok(items) => items,
            Err(e) => {
                tracing::error!("Error loading results page {}: {}", page, e);
                collection.stop_reason = StopReason::PageLoadFailed;
                break;
            }
        };
        collection.pages_visited = page;
        tracing::debug!("Results page {}: {} items", page, items.len());

        for item in &items {
            if collection.records.len() >= max_records {
                break;
            }
            match extract(item, selectors) {
                Ok(record) => {
                    tracing::info!("Parsed tender: {}", record.number);
                    collection.records.push(record);
                }
                Err(e) => {
                    tracing::error!("Error parsing tender element on page {}: {}", page, e);
                    collection.skipped_items += 1;
                }
            }
        }

        if collection.records.len() >= max_records {
            collection.stop_reason = StopReason::RecordCap;
            break;
        }

        if page >= max_pages {
            collection.stop_reason = StopReason::PageCap;
            break;
        }

        if let Err(e) = advance(session, config).await {
            tracing::error!("Error navigating to page {}: {}", page + 1, e);
            collection.stop_reason = StopReason::NoNextPage;
            break;
        }
    }

    collection
}

/// Scrolls to the bottom and waits for lazily loaded items to render
async fn settle<S: PageSession + ?Sized>(
    session: &mut S,
    config: &Config,
) -> Result<(), SessionError> {
    session.scroll_to_bottom().await?;

    let pause = config.timeouts.lazy_load_settle();
    if !pause.is_zero() {
        tokio::time::sleep(pause).await;
    }
    Ok(())
}

/// Clicks the next-page control once it is clickable
async fn advance<S: PageSession + ?Sized>(
    session: &mut S,
    config: &Config,
) -> Result<(), SessionError> {
    session
        .wait_for_clickable(&config.selectors.next_page, config.timeouts.next_page())
        .await?;
    session.click(&config.selectors.next_page).await
}
