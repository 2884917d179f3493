//! Website extraction over HTTP.
//!
//! Fetches a company homepage and mines the parts brand sites reliably
//! expose: the page title, meta description, hero headline, and the
//! sections headed "About", "Mission", "Services", and "Values". Fetch
//! failures surface as [`WebsiteExtraction::Unreachable`]; synthesis
//! carries on from the remaining sources.

use super::{WebsiteExtraction, WebsitePage};
use crate::errors::KitError;
use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;
use std::time::Duration;
use tracing::debug;

/// Configuration for website fetching.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrapeConfig {
    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: f64,
    /// User agent string.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_timeout() -> f64 {
    15.0
}

fn default_user_agent() -> String {
    "brandkit/0.1".to_string()
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: default_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

impl ScrapeConfig {
    /// Creates a configuration with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the timeout.
    #[must_use]
    pub fn with_timeout(mut self, seconds: f64) -> Self {
        self.timeout_seconds = seconds;
        self
    }

    /// Sets the user agent.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Gets the timeout as a Duration.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs_f64(self.timeout_seconds)
    }
}

/// Fetches and parses company websites into candidate attributes.
#[derive(Debug, Clone)]
pub struct WebsiteScraper {
    client: reqwest::Client,
    config: ScrapeConfig,
}

impl WebsiteScraper {
    /// Creates a scraper with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns [`KitError::Internal`] when the HTTP client cannot be
    /// constructed.
    pub fn new(config: ScrapeConfig) -> Result<Self, KitError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| KitError::Internal(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client, config })
    }

    /// The configuration this scraper was built with.
    #[must_use]
    pub fn config(&self) -> &ScrapeConfig {
        &self.config
    }

    /// Fetches one page and extracts candidate attributes from it.
    ///
    /// Never fails the caller: network and HTTP errors become the
    /// `Unreachable` variant.
    pub async fn extract(&self, url: &str) -> WebsiteExtraction {
        debug!(url, "fetching website");
        let response = match self.client.get(url).send().await {
            Ok(response) => response,
            Err(e) => {
                return WebsiteExtraction::Unreachable {
                    reason: format!("request failed: {e}"),
                }
            }
        };
        if !response.status().is_success() {
            return WebsiteExtraction::Unreachable {
                reason: format!("HTTP {}", response.status()),
            };
        }
        match response.text().await {
            Ok(body) => WebsiteExtraction::Page(parse_page(url, &body)),
            Err(e) => WebsiteExtraction::Unreachable {
                reason: format!("failed to read body: {e}"),
            },
        }
    }
}

#[allow(clippy::expect_used)]
fn selector(cell: &'static OnceLock<Selector>, css: &'static str) -> &'static Selector {
    cell.get_or_init(|| Selector::parse(css).expect("static selector is valid"))
}

fn title_selector() -> &'static Selector {
    static SEL: OnceLock<Selector> = OnceLock::new();
    selector(&SEL, "title")
}

fn meta_description_selector() -> &'static Selector {
    static SEL: OnceLock<Selector> = OnceLock::new();
    selector(&SEL, r#"meta[name="description"]"#)
}

fn h1_selector() -> &'static Selector {
    static SEL: OnceLock<Selector> = OnceLock::new();
    selector(&SEL, "h1")
}

fn heading_selector() -> &'static Selector {
    static SEL: OnceLock<Selector> = OnceLock::new();
    selector(&SEL, "h1, h2, h3")
}

fn list_item_selector() -> &'static Selector {
    static SEL: OnceLock<Selector> = OnceLock::new();
    selector(&SEL, "li")
}

/// Parses fetched HTML into a [`WebsitePage`].
pub(crate) fn parse_page(url: &str, html: &str) -> WebsitePage {
    let document = Html::parse_document(html);

    let company_name = document
        .select(title_selector())
        .next()
        .map(element_text)
        .and_then(|title| {
            let name = title
                .split(['|', '\u{2013}', '\u{2014}'])
                .next()
                .map(str::trim)
                .unwrap_or("")
                .to_string();
            if name.is_empty() {
                None
            } else {
                Some(name)
            }
        });

    let meta_description = document
        .select(meta_description_selector())
        .next()
        .and_then(|el| el.value().attr("content"))
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string);

    let tagline = document
        .select(h1_selector())
        .next()
        .map(element_text)
        .filter(|text| !text.is_empty() && text.len() <= 120);

    WebsitePage {
        url: url.to_string(),
        company_name,
        tagline,
        about: section_paragraph(&document, &["about"]),
        meta_description,
        mission: section_paragraph(&document, &["mission"]),
        services: section_items(&document, &["service", "what we do", "what we offer"]),
        values: section_items(&document, &["value"]),
    }
}

/// The first paragraph following a heading whose text mentions one of the
/// keywords.
fn section_paragraph(document: &Html, keywords: &[&str]) -> Option<String> {
    let heading = find_heading(document, keywords)?;
    heading
        .next_siblings()
        .filter_map(ElementRef::wrap)
        .find(|el| el.value().name() == "p")
        .map(element_text)
        .filter(|text| !text.is_empty())
}

/// The list items of the first list following a matching heading, falling
/// back to splitting a paragraph on commas.
fn section_items(document: &Html, keywords: &[&str]) -> Vec<String> {
    let Some(heading) = find_heading(document, keywords) else {
        return Vec::new();
    };
    for sibling in heading.next_siblings().filter_map(ElementRef::wrap) {
        match sibling.value().name() {
            "ul" | "ol" => {
                return sibling
                    .select(list_item_selector())
                    .map(element_text)
                    .filter(|item| !item.is_empty())
                    .collect();
            }
            "p" => {
                return element_text(sibling)
                    .split(',')
                    .map(str::trim)
                    .filter(|item| !item.is_empty())
                    .map(str::to_string)
                    .collect();
            }
            _ => {}
        }
    }
    Vec::new()
}

fn find_heading<'a>(document: &'a Html, keywords: &[&str]) -> Option<ElementRef<'a>> {
    document.select(heading_selector()).find(|el| {
        let text = element_text(*el).to_lowercase();
        keywords.iter().any(|kw| text.contains(kw))
    })
}

/// Element text with whitespace collapsed.
fn element_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
