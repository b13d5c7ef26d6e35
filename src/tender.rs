//! Tender record types
//!
//! A [`TenderRecord`] is built by the extractor for every well-formed listing
//! item. A [`StoredTender`] is the same record read back from the store with
//! its synthetic row id.

use serde::{Deserialize, Serialize};

/// A single tender listing as shown on the search results page
///
/// Field order is the CSV column order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TenderRecord {
    /// Short identifier with the display prefix removed
    pub number: String,

    /// Absolute URL of the tender's detail page
    pub link: String,

    /// Customer name; not scraped yet, always the configured placeholder
    pub customer: String,

    /// Free-text description of the procured goods
    pub goods: String,

    /// Closing date exactly as displayed
    pub end_date: String,
}

/// A tender row read back from the relational store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredTender {
    pub id: i64,

    #[serde(flatten)]
    pub tender: TenderRecord,
}
