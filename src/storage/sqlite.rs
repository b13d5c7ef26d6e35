//! SQLite storage implementation
//!
//! This module provides a SQLite-based implementation of the TenderStore trait.

use crate::storage::schema::initialize_schema;
use crate::storage::traits::{StorageResult, TenderStore};
use crate::tender::{StoredTender, TenderRecord};
use rusqlite::{params, Connection, Row};
use std::path::Path;

/// SQLite storage backend
///
/// One instance is one open connection; callers open a store per logical
/// operation and drop it afterwards.
pub struct SqliteTenderStore {
    conn: Connection,
}

impl SqliteTenderStore {
    /// Opens (or creates) the database and ensures the schema exists
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the SQLite database file
    pub fn open(path: &Path) -> StorageResult<Self> {
        let conn = Connection::open(path)?;

        // WAL lets the read API query while a scrape is writing
        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
        ",
        )?;

        initialize_schema(&conn)?;

        Ok(Self { conn })
    }

    /// Creates an in-memory database (for testing)
    #[cfg(test)]
    pub fn open_in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        initialize_schema(&conn)?;
        Ok(Self { conn })
    }
}

fn stored_tender_from_row(row: &Row<'_>) -> rusqlite::Result<StoredTender> {
    let text = |index: usize| -> rusqlite::Result<String> {
        Ok(row.get::<_, Option<String>>(index)?.unwrap_or_default())
    };

    Ok(StoredTender {
        id: row.get(0)?,
        tender: TenderRecord {
            number: text(1)?,
            link: text(2)?,
            customer: text(3)?,
            goods: text(4)?,
            end_date: text(5)?,
        },
    })
}

impl TenderStore for SqliteTenderStore {
    fn append_all(&mut self, records: &[TenderRecord]) -> StorageResult<usize> {
        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO tenders (number, link, customer, goods, end_date)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
            )?;

            for record in records {
                stmt.execute(params![
                    record.number,
                    record.link,
                    record.customer,
                    record.goods,
                    record.end_date
                ])?;
            }
        }
        tx.commit()?;

        tracing::info!("Saved {} tenders to SQLite", records.len());
        Ok(records.len())
    }

    fn list_all(&self) -> StorageResult<Vec<StoredTender>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, number, link, customer, goods, end_date FROM tenders ORDER BY id",
        )?;

        let tenders = stmt
            .query_map([], stored_tender_from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(tenders)
    }

    fn count(&self) -> StorageResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM tenders", [], |row| row.get(0))?;
        Ok(count as u64)
    }
}
