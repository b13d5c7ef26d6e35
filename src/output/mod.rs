//! Output module for the flat-file sink
//!
//! This module writes collected tenders to a CSV file, replacing the file
//! on every run.

mod csv_file;

pub use csv_file::{write_all, CSV_HEADER};

use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;
