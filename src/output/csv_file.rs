//! CSV file sink

use crate::output::OutputResult;
use crate::tender::TenderRecord;
use std::path::Path;

/// Column order of the CSV file
pub const CSV_HEADER: [&str; 5] = ["number", "link", "customer", "goods", "end_date"];

/// Writes every record to `path`, replacing any existing file
///
/// The file gets a header row followed by one row per record in input order.
/// A path that cannot be opened for writing fails the whole operation.
pub fn write_all(records: &[TenderRecord], path: &Path) -> OutputResult<()> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)?;

    writer.write_record(CSV_HEADER)?;
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;

    tracing::info!("Saved {} tenders to {}", records.len(), path.display());
    Ok(())
}
