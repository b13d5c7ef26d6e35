//! Configuration module for Tender-Scrape
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every key has a default, so running without a file is valid.
//!
//! # Example
//!
//! ```no_run
//! use tender_scrape::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("tenders.toml")).unwrap();
//! println!("Visiting at most {} pages", config.pagination.max_pages);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    ApiConfig, Config, OutputConfig, PaginationConfig, SelectorConfig, SourceConfig,
    TimeoutConfig,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
