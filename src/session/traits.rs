//! Session trait and error types
//!
//! This module defines the capability the scrape loop drives: a stateful
//! page session that can load a URL, look up elements, click controls and
//! wait for elements to appear.

use crate::session::element::Element;
use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;
use tokio::time::Instant;

/// Interval between readiness checks in the provided wait methods
pub const READINESS_POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Errors that can occur while driving a page session
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("Invalid URL '{url}': {message}")]
    InvalidUrl { url: String, message: String },

    #[error("Invalid selector '{selector}': {message}")]
    InvalidSelector { selector: String, message: String },

    #[error("Timed out after {}ms waiting for '{selector}'", .timeout.as_millis())]
    Timeout { selector: String, timeout: Duration },

    #[error("No element matches '{selector}'")]
    NotFound { selector: String },

    #[error("Element '{selector}' is not clickable")]
    NotClickable { selector: String },

    #[error("No page is loaded")]
    NoPage,
}

/// Result type for session operations
pub type SessionResult<T> = Result<T, SessionError>;

/// A stateful page session
///
/// Implementations own whatever resource backs the session (an HTTP client
/// and the current document, a browser tab, an in-memory fixture). Callers
/// must call [`PageSession::close`] when done, on every exit path.
#[async_trait]
pub trait PageSession: Send {
    /// Navigates to `url`, replacing the current page
    async fn load(&mut self, url: &str) -> SessionResult<()>;

    /// Returns every element on the current page matching `selector`
    async fn find_all(&mut self, selector: &str) -> SessionResult<Vec<Element>>;

    /// Activates the first element matching `selector`
    async fn click(&mut self, selector: &str) -> SessionResult<()>;

    /// Scrolls to the bottom of the page to trigger lazily loaded content
    async fn scroll_to_bottom(&mut self) -> SessionResult<()>;

    /// Releases the session
    async fn close(&mut self) -> SessionResult<()>;

    /// Polls until at least one element matches `selector`
    ///
    /// Fails with [`SessionError::Timeout`] once `timeout` has elapsed.
    /// Lookup errors other than an empty match are returned immediately.
    async fn wait_for(&mut self, selector: &str, timeout: Duration) -> SessionResult<Vec<Element>> {
        let deadline = Instant::now() + timeout;
        loop {
            let found = self.find_all(selector).await?;
            if !found.is_empty() {
                return Ok(found);
            }
            if !pause_before_retry(deadline).await {
                return Err(SessionError::Timeout {
                    selector: selector.to_string(),
                    timeout,
                });
            }
        }
    }

    /// Polls until an element matching `selector` is clickable
    async fn wait_for_clickable(
        &mut self,
        selector: &str,
        timeout: Duration,
    ) -> SessionResult<Element> {
        let deadline = Instant::now() + timeout;
        loop {
            let found = self.find_all(selector).await?;
            if let Some(element) = found.into_iter().find(Element::is_clickable) {
                return Ok(element);
            }
            if !pause_before_retry(deadline).await {
                return Err(SessionError::Timeout {
                    selector: selector.to_string(),
                    timeout,
                });
            }
        }
    }
}

/// Sleeps until the next poll, returning false once the deadline has passed
async fn pause_before_retry(deadline: Instant) -> bool {
    let now = Instant::now();
    if now >= deadline {
        return false;
    }
    tokio::time::sleep(READINESS_POLL_INTERVAL.min(deadline - now)).await;
    true
}
