//! Database schema definitions
//!
//! This module contains the SQL schema for the Tender-Scrape database.

/// SQL schema for the database
///
/// No uniqueness constraint beyond the synthetic id: the same tender
/// scraped twice is stored twice.
pub const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS tenders (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    number TEXT,
    link TEXT,
    customer TEXT,
    goods TEXT,
    end_date TEXT
);
"#;

/// Initializes the database schema
///
/// # Returns
///
/// * `Ok(())` - Schema exists (created now or previously)
/// * `Err(rusqlite::Error)` - Failed to initialize schema
pub fn initialize_schema(conn: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(())
}
