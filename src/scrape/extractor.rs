//! Record extraction for a single listing item

use crate::config::SelectorConfig;
use crate::session::{Element, SessionError};
use crate::tender::TenderRecord;
use thiserror::Error;

/// Why a listing item could not be turned into a record
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("Missing element '{selector}'")]
    MissingElement { selector: String },

    #[error("Element '{selector}' has no usable '{attribute}' attribute")]
    MissingAttribute { selector: String, attribute: String },

    #[error("Lookup failed: {0}")]
    Lookup(#[from] SessionError),
}

/// Extracts one tender record from a listing item
///
/// All sub-elements must be present; a missing one fails this item only.
///
/// # Arguments
///
/// * `item` - The listing item element
/// * `selectors` - Sub-element selectors and text normalization settings
pub fn extract(
    item: &Element,
    selectors: &SelectorConfig,
) -> Result<TenderRecord, ExtractionError> {
    let number_elem = require(item, &selectors.number)?;
    let number = strip_number_prefix(&number_elem.text(), &selectors.number_prefix);

    let link_elem = require(item, &selectors.link)?;
    let link = link_elem
        .absolute_url("href")
        .ok_or_else(|| ExtractionError::MissingAttribute {
            selector: selectors.link.clone(),
            attribute: "href".to_string(),
        })?;
    let goods = link_elem.text().trim().to_string();

    let end_date = require(item, &selectors.end_date)?.text().trim().to_string();

    Ok(TenderRecord {
        number,
        link: link.to_string(),
        customer: selectors.customer_placeholder.clone(),
        goods,
        end_date,
    })
}

/// Removes the display prefix from an identifier and trims the remainder
pub fn strip_number_prefix(text: &str, prefix: &str) -> String {
    text.replace(prefix, "").trim().to_string()
}

fn require(item: &Element, selector: &str) -> Result<Element, ExtractionError> {
    item.find(selector)?
        .ok_or_else(|| ExtractionError::MissingElement {
            selector: selector.to_string(),
        })
}
