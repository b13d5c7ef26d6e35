//! Storage module for the relational sink
//!
//! This module handles all database operations:
//! - SQLite database initialization and schema creation
//! - Appending collected tenders
//! - Listing stored tenders for the read API

mod schema;
mod sqlite;
mod traits;

pub use sqlite::SqliteTenderStore;
pub use traits::{StorageError, StorageResult, TenderStore};

use crate::tender::{StoredTender, TenderRecord};
use std::path::Path;

/// Opens the store, appends `records`, and closes it again
///
/// # Returns
///
/// * `Ok(usize)` - Number of rows appended
/// * `Err(StorageError)` - The store could not be opened or written
pub fn append_all(path: &Path, records: &[TenderRecord]) -> StorageResult<usize> {
    let mut store = SqliteTenderStore::open(path)?;
    store.append_all(records)
}

/// Opens the store, reads every row, and closes it again
pub fn list_all(path: &Path) -> StorageResult<Vec<StoredTender>> {
    let store = SqliteTenderStore::open(path)?;
    store.list_all()
}
