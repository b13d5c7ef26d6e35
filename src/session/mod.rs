//! Page session module
//!
//! This module contains everything needed to drive a search results site:
//! - The [`PageSession`] capability with bounded readiness waits
//! - Owned [`Element`] snapshots used by the record extractor
//! - [`HttpSession`], the HTTP-backed implementation used in production

mod element;
mod http;
mod traits;

pub use element::{collapse_whitespace, parse_selector, resolve_link, Element};
pub use http::{build_http_client, HttpSession};
pub use traits::{PageSession, SessionError, SessionResult, READINESS_POLL_INTERVAL};
