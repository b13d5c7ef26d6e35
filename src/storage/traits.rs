//! Storage traits and error types
//!
//! This module defines the trait interface for the relational sink and
//! associated error types.

use crate::tender::{StoredTender, TenderRecord};
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for tender store implementations
pub trait TenderStore {
    /// Appends every record as a new row, in input order
    ///
    /// Each row gets a fresh synthetic id; nothing is deduplicated.
    ///
    /// # Returns
    ///
    /// The number of rows inserted
    fn append_all(&mut self, records: &[TenderRecord]) -> StorageResult<usize>;

    /// Returns every stored row in storage order
    fn list_all(&self) -> StorageResult<Vec<StoredTender>>;

    /// Counts stored rows
    fn count(&self) -> StorageResult<u64>;
}
