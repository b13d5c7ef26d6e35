use serde::Deserialize;
use std::time::Duration;

const CHROME_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/138.0.0.0 Safari/537.36";

/// Main configuration structure for Tender-Scrape
///
/// Every section is optional; a missing file or an empty file yields the
/// defaults below.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Config {
    pub source: SourceConfig,
    pub selectors: SelectorConfig,
    pub pagination: PaginationConfig,
    pub timeouts: TimeoutConfig,
    pub output: OutputConfig,
    pub api: ApiConfig,
}

/// Where the search starts and how the session identifies itself
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct SourceConfig {
    /// URL of the search page that hosts the search form
    pub search_url: String,

    /// User agent sent with every request
    pub user_agent: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            search_url: "https://rostender.info/extsearch/".to_string(),
            user_agent: CHROME_USER_AGENT.to_string(),
        }
    }
}

/// CSS selectors for the search page and the listing items
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct SelectorConfig {
    /// Search form that must be present before the search is triggered
    pub search_form: String,

    /// Control that starts the search
    pub search_button: String,

    /// One listing item on a results page
    pub tender_row: String,

    /// Identifier element within an item
    pub number: String,

    /// Link element within an item; its text is the goods description
    pub link: String,

    /// Closing date element within an item
    pub end_date: String,

    /// Control that advances to the next results page
    pub next_page: String,

    /// Literal prefix removed from the identifier text
    pub number_prefix: String,

    /// Value stored in the customer field
    pub customer_placeholder: String,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            search_form: "#tenders-search-form".to_string(),
            search_button: "#start-search-button".to_string(),
            tender_row: ".tender-row".to_string(),
            number: ".tender__number".to_string(),
            link: ".tender-info__link".to_string(),
            end_date: ".tender__date-end .black".to_string(),
            next_page: ".pagination .next a".to_string(),
            number_prefix: "Тендер №".to_string(),
            customer_placeholder: "N/A".to_string(),
        }
    }
}

/// Collection limits
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct PaginationConfig {
    /// Maximum number of result pages visited per run
    pub max_pages: u32,

    /// Record cap used when the CLI does not pass `--max`
    pub default_max_records: usize,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            max_pages: 5,
            default_max_records: 100,
        }
    }
}

/// Bounded waits, all in milliseconds
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct TimeoutConfig {
    /// Wait for the search form on the first page
    pub search_form: u64,

    /// Wait for listing items on every results page
    pub tender_rows: u64,

    /// Wait for the next-page control to become clickable
    pub next_page: u64,

    /// Pause after scrolling to let lazily loaded items render
    pub lazy_load_settle: u64,

    /// Timeout of a single HTTP request
    pub request: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            search_form: 10_000,
            tender_rows: 20_000,
            next_page: 10_000,
            lazy_load_settle: 0,
            request: 30_000,
        }
    }
}

impl TimeoutConfig {
    pub fn search_form(&self) -> Duration {
        Duration::from_millis(self.search_form)
    }

    pub fn tender_rows(&self) -> Duration {
        Duration::from_millis(self.tender_rows)
    }

    pub fn next_page(&self) -> Duration {
        Duration::from_millis(self.next_page)
    }

    pub fn lazy_load_settle(&self) -> Duration {
        Duration::from_millis(self.lazy_load_settle)
    }

    pub fn request(&self) -> Duration {
        Duration::from_millis(self.request)
    }
}

/// Sink destinations
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct OutputConfig {
    /// Default CSV destination, overridden by `--output`
    pub csv_path: String,

    /// Path to the SQLite database file
    pub database_path: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            csv_path: "tenders.csv".to_string(),
            database_path: "tenders.db".to_string(),
        }
    }
}

/// Read API configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ApiConfig {
    /// Socket address the server listens on
    pub bind: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:8000".to_string(),
        }
    }
}
