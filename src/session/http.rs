//! HTTP-backed page session
//!
//! This module implements [`PageSession`] over a cookie-keeping `reqwest`
//! client:
//! - `load` fetches a page and keeps its body as the current document
//! - `click` follows links and submits forms
//! - element lookups run against the current document with `scraper`

use crate::config::SourceConfig;
use crate::session::element::{parse_selector, resolve_link, Element};
use crate::session::traits::{PageSession, SessionError, SessionResult};
use async_trait::async_trait;
use reqwest::{Client, Method};
use scraper::{ElementRef, Html};
use std::time::Duration;
use url::Url;

/// Builds an HTTP client with browser-like defaults
///
/// # Arguments
///
/// * `config` - Source configuration carrying the user agent
/// * `timeout` - Timeout for a single request
///
/// # Example
///
/// ```no_run
/// use std::time::Duration;
/// use tender_scrape::config::SourceConfig;
/// use tender_scrape::session::build_http_client;
///
/// let client = build_http_client(&SourceConfig::default(), Duration::from_secs(30)).unwrap();
/// ```
pub fn build_http_client(
    config: &SourceConfig,
    timeout: Duration,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.clone())
        .timeout(timeout)
        .connect_timeout(Duration::from_secs(10))
        .cookie_store(true)
        .gzip(true)
        .brotli(true)
        .build()
}

/// The page currently held by the session
#[derive(Debug)]
struct LoadedPage {
    url: Url,
    body: String,
}

/// What activating an element amounts to
#[derive(Debug, PartialEq)]
enum Navigation {
    /// Follow a link
    Follow(Url),

    /// Submit a form
    Submit {
        method: Method,
        action: Url,
        fields: Vec<(String, String)>,
    },
}

/// A page session that speaks plain HTTP
pub struct HttpSession {
    client: Client,
    page: Option<LoadedPage>,
}

impl HttpSession {
    /// Creates a session around an existing client
    pub fn new(client: Client) -> Self {
        Self { client, page: None }
    }

    /// Creates a session from source configuration
    pub fn from_config(config: &SourceConfig, timeout: Duration) -> SessionResult<Self> {
        let client = build_http_client(config, timeout).map_err(|source| SessionError::Http {
            url: config.search_url.clone(),
            source,
        })?;
        Ok(Self::new(client))
    }

    /// URL of the current page, if any
    #[cfg(test)]
    fn current_url(&self) -> Option<&Url> {
        self.page.as_ref().map(|page| &page.url)
    }

    fn current_page(&self) -> SessionResult<&LoadedPage> {
        self.page.as_ref().ok_or(SessionError::NoPage)
    }

    /// Sends a request and replaces the current page with the response
    async fn navigate(
        &mut self,
        method: Method,
        url: Url,
        form: Option<Vec<(String, String)>>,
    ) -> SessionResult<()> {
        tracing::debug!("{} {}", method, url);

        let mut request = self.client.request(method, url.clone());
        if let Some(fields) = form {
            request = request.form(&fields);
        }

        let response = request.send().await.map_err(|source| SessionError::Http {
            url: url.to_string(),
            source,
        })?;

        let status = response.status();
        let final_url = response.url().clone();
        if !status.is_success() {
            return Err(SessionError::Status {
                url: final_url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(|source| SessionError::Http {
            url: final_url.to_string(),
            source,
        })?;

        self.page = Some(LoadedPage {
            url: final_url,
            body,
        });
        Ok(())
    }

    /// Works out where clicking `selector` leads
    ///
    /// The first match that actually navigates is activated, so an inert
    /// copy of a control (a duplicate pagination block without an href, a
    /// `type="button"` button) does not shadow a working one further down.
    fn resolve_click(&self, selector: &str) -> SessionResult<Navigation> {
        let page = self.current_page()?;
        let parsed = parse_selector(selector)?;
        let document = Html::parse_document(&page.body);

        let mut matched = false;
        for target in document.select(&parsed) {
            matched = true;
            if let Some(navigation) = navigation_for(target, &page.url) {
                return Ok(navigation);
            }
        }

        if matched {
            Err(SessionError::NotClickable {
                selector: selector.to_string(),
            })
        } else {
            Err(SessionError::NotFound {
                selector: selector.to_string(),
            })
        }
    }
}

/// Where activating `target` leads, or `None` if it does nothing
fn navigation_for(target: ElementRef<'_>, page_url: &Url) -> Option<Navigation> {
    if target.value().name() == "a" {
        let href = target.value().attr("href")?;
        return resolve_link(href, page_url).map(Navigation::Follow);
    }

    if !Element::capture(target, page_url).is_clickable() {
        return None;
    }

    let form = target
        .ancestors()
        .filter_map(ElementRef::wrap)
        .find(|ancestor| ancestor.value().name() == "form")?;

    form_submission(form, target, page_url)
}

/// Builds the request a browser would send when `submitter` submits `form`
fn form_submission(
    form: ElementRef<'_>,
    submitter: ElementRef<'_>,
    page_url: &Url,
) -> Option<Navigation> {
    let method = match form
        .value()
        .attr("method")
        .map(str::to_ascii_lowercase)
        .as_deref()
    {
        Some("post") => Method::POST,
        _ => Method::GET,
    };

    let action = match form.value().attr("action").map(str::trim) {
        Some(action) if !action.is_empty() => page_url.join(action).ok()?,
        _ => page_url.clone(),
    };

    let mut fields = form_fields(form);
    if let Some(name) = submitter.value().attr("name") {
        let value = submitter.value().attr("value").unwrap_or_default();
        fields.push((name.to_string(), value.to_string()));
    }

    if method == Method::GET {
        let mut action = action;
        action.query_pairs_mut().clear().extend_pairs(fields.iter());
        return Some(Navigation::Follow(action));
    }

    Some(Navigation::Submit {
        method,
        action,
        fields,
    })
}

/// Collects the successful controls of a form in document order
fn form_fields(form: ElementRef<'_>) -> Vec<(String, String)> {
    let mut fields = Vec::new();
    let Ok(controls) = parse_selector("input[name], select[name], textarea[name]") else {
        return fields;
    };

    for control in form.select(&controls) {
        let value = control.value();
        if value.attr("disabled").is_some() {
            continue;
        }
        let Some(name) = value.attr("name") else {
            continue;
        };

        match value.name() {
            "input" => {
                let kind = value.attr("type").unwrap_or("text").to_ascii_lowercase();
                match kind.as_str() {
                    "submit" | "button" | "image" | "reset" | "file" => continue,
                    "checkbox" | "radio" => {
                        if value.attr("checked").is_some() {
                            let checked = value.attr("value").unwrap_or("on");
                            fields.push((name.to_string(), checked.to_string()));
                        }
                    }
                    _ => {
                        let text = value.attr("value").unwrap_or_default();
                        fields.push((name.to_string(), text.to_string()));
                    }
                }
            }
            "select" => {
                if let Some(selected) = selected_option(control) {
                    fields.push((name.to_string(), selected));
                }
            }
            "textarea" => fields.push((name.to_string(), control.text().collect())),
            _ => {}
        }
    }

    fields
}

/// Value of the selected option, falling back to the first option
fn selected_option(select: ElementRef<'_>) -> Option<String> {
    let options = parse_selector("option").ok()?;
    let all: Vec<ElementRef<'_>> = select.select(&options).collect();
    let chosen = all
        .iter()
        .find(|option| option.value().attr("selected").is_some())
        .or_else(|| all.first())?;

    Some(
        chosen
            .value()
            .attr("value")
            .map(str::to_string)
            .unwrap_or_else(|| chosen.text().collect::<String>().trim().to_string()),
    )
}

#[async_trait]
impl PageSession for HttpSession {
    async fn load(&mut self, url: &str) -> SessionResult<()> {
        let url = Url::parse(url).map_err(|e| SessionError::InvalidUrl {
            url: url.to_string(),
            message: e.to_string(),
        })?;
        self.navigate(Method::GET, url, None).await
    }

    async fn find_all(&mut self, selector: &str) -> SessionResult<Vec<Element>> {
        let page = self.current_page()?;
        let parsed = parse_selector(selector)?;
        let document = Html::parse_document(&page.body);

        Ok(document
            .select(&parsed)
            .map(|element| Element::capture(element, &page.url))
            .collect())
    }

    async fn click(&mut self, selector: &str) -> SessionResult<()> {
        match self.resolve_click(selector)? {
            Navigation::Follow(url) => self.navigate(Method::GET, url, None).await,
            Navigation::Submit {
                method,
                action,
                fields,
            } => self.navigate(method, action, Some(fields)).await,
        }
    }

    async fn scroll_to_bottom(&mut self) -> SessionResult<()> {
        // A fetched document is complete; there is nothing further to load.
        self.current_page()?;
        Ok(())
    }

    async fn close(&mut self) -> SessionResult<()> {
        if let Some(page) = self.page.take() {
            tracing::debug!("Closing session at {}", page.url);
        }
        Ok(())
    }
}
