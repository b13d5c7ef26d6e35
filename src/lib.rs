//! Tender-Scrape: a tender listing collector
//!
//! This crate walks the paginated search results of a tender listing site,
//! extracts one record per listing, and persists the collected records to a
//! CSV file and a SQLite store. A small read API exposes the stored rows.

pub mod api;
pub mod config;
pub mod output;
pub mod scrape;
pub mod session;
pub mod storage;
pub mod tender;

use thiserror::Error;

/// Main error type for Tender-Scrape operations
#[derive(Debug, Error)]
pub enum TenderError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Session error: {0}")]
    Session(#[from] session::SessionError),

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid selector in config: {0}")]
    InvalidSelector(String),
}

/// Result type alias for Tender-Scrape operations
pub type Result<T> = std::result::Result<T, TenderError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use scrape::{collect, run_scrape, Collection, RunOptions, RunSummary, StopReason};
pub use tender::{StoredTender, TenderRecord};
