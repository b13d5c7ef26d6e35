//! Integration tests
//!
//! The scrape tests drive the HTTP session against wiremock servers; the
//! API tests serve the read API on an ephemeral port.

mod api_tests;
mod scrape_tests;
