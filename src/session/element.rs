//! Owned element snapshots
//!
//! An [`Element`] keeps the outer HTML of one element plus the URL of the
//! page it came from. Lookups re-parse the fragment, which keeps the type
//! `Send` and free of borrows into the page document. Table parts are
//! re-parsed inside the table context they need, so a `<tr>` or `<td>`
//! snapshot keeps its own element.

use crate::session::traits::{SessionError, SessionResult};
use scraper::{ElementRef, Html, Selector};
use url::Url;

/// A snapshot of a single element on a loaded page
#[derive(Debug, Clone)]
pub struct Element {
    html: String,
    tag: String,
    base_url: Url,
}

impl Element {
    /// Captures `element` as found on the page at `base_url`
    pub fn capture(element: ElementRef<'_>, base_url: &Url) -> Self {
        Self {
            html: element.html(),
            tag: element.value().name().to_string(),
            base_url: base_url.clone(),
        }
    }

    /// Builds an element from raw markup; the first tag is the element
    pub fn from_html(html: impl Into<String>, base_url: &Url) -> Self {
        let html = html.into();
        let tag = leading_tag_name(&html);
        Self {
            html,
            tag,
            base_url: base_url.clone(),
        }
    }

    /// URL of the page this element was found on
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Returns the first descendant matching `selector`
    pub fn find(&self, selector: &str) -> SessionResult<Option<Element>> {
        let selector = parse_selector(selector)?;
        Ok(self
            .with_root(|root| {
                root.select(&selector)
                    .next()
                    .map(|found| Element::capture(found, &self.base_url))
            })
            .flatten())
    }

    /// Visible text with runs of whitespace collapsed to single spaces
    pub fn text(&self) -> String {
        self.with_root(|root| collapse_whitespace(root.text()))
            .unwrap_or_default()
    }

    /// Raw value of an attribute on this element
    pub fn attr(&self, name: &str) -> Option<String> {
        self.with_root(|root| root.value().attr(name).map(str::to_string))
            .flatten()
    }

    /// Resolves a URL-valued attribute against the page URL
    ///
    /// Returns `None` for missing attributes and for links that do not
    /// navigate anywhere (see [`resolve_link`]).
    pub fn absolute_url(&self, attribute: &str) -> Option<Url> {
        let value = self.attr(attribute)?;
        resolve_link(&value, &self.base_url)
    }

    /// Whether activating this element would do anything
    ///
    /// Links must resolve to an http(s) URL. Buttons and inputs must be
    /// enabled submit controls; `type="button"` and `type="reset"` never
    /// submit anything.
    pub fn is_clickable(&self) -> bool {
        self.with_root(|root| {
            let value = root.value();
            match value.name() {
                "a" => value
                    .attr("href")
                    .and_then(|href| resolve_link(href, &self.base_url))
                    .is_some(),
                "button" => {
                    value.attr("disabled").is_none()
                        && matches!(
                            value.attr("type").map(str::to_ascii_lowercase).as_deref(),
                            None | Some("submit")
                        )
                }
                "input" => {
                    value.attr("disabled").is_none()
                        && matches!(
                            value.attr("type").map(str::to_ascii_lowercase).as_deref(),
                            Some("submit") | Some("image")
                        )
                }
                _ => false,
            }
        })
        .unwrap_or(false)
    }

    /// Runs `f` against this element parsed as a fragment
    fn with_root<T>(&self, f: impl FnOnce(ElementRef<'_>) -> T) -> Option<T> {
        let (open, close) = parse_context(&self.tag);
        let fragment = Html::parse_fragment(&format!("{}{}{}", open, self.html, close));
        let root = fragment
            .root_element()
            .descendants()
            .skip(1)
            .filter_map(ElementRef::wrap)
            .find(|candidate| self.tag.is_empty() || candidate.value().name() == self.tag)?;
        Some(f(root))
    }
}

/// Markup an element must sit inside to survive fragment parsing
fn parse_context(tag: &str) -> (&'static str, &'static str) {
    match tag {
        "tr" => ("<table><tbody>", "</tbody></table>"),
        "td" | "th" => ("<table><tbody><tr>", "</tr></tbody></table>"),
        "thead" | "tbody" | "tfoot" | "caption" | "colgroup" => ("<table>", "</table>"),
        "col" => ("<table><colgroup>", "</colgroup></table>"),
        _ => ("", ""),
    }
}

/// Lowercased name of the first tag in `html`, empty if there is none
fn leading_tag_name(html: &str) -> String {
    html.trim_start()
        .strip_prefix('<')
        .map(|rest| {
            rest.chars()
                .take_while(char::is_ascii_alphanumeric)
                .collect::<String>()
                .to_ascii_lowercase()
        })
        .unwrap_or_default()
}

/// Parses a CSS selector, mapping failures to a session error
pub fn parse_selector(selector: &str) -> SessionResult<Selector> {
    Selector::parse(selector).map_err(|e| SessionError::InvalidSelector {
        selector: selector.to_string(),
        message: e.to_string(),
    })
}

/// Joins text nodes and collapses whitespace the way a browser renders it
pub fn collapse_whitespace<'a>(parts: impl Iterator<Item = &'a str>) -> String {
    let joined: String = parts.collect();
    joined.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Resolves an href to an absolute http(s) URL
///
/// Returns None if the link should be ignored:
/// - javascript:, mailto:, tel: schemes
/// - data: URIs
/// - fragment-only and empty hrefs
/// - invalid URLs or non-HTTP(S) URLs after resolution
pub fn resolve_link(href: &str, base_url: &Url) -> Option<Url> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let lower = href.to_ascii_lowercase();
    if lower.starts_with("javascript:")
        || lower.starts_with("mailto:")
        || lower.starts_with("tel:")
        || lower.starts_with("data:")
    {
        return None;
    }

    match base_url.join(href) {
        Ok(absolute_url) => {
            if absolute_url.scheme() == "http" || absolute_url.scheme() == "https" {
                Some(absolute_url)
            } else {
                None
            }
        }
        Err(_) => None,
    }
}
