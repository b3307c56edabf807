//! HTML extraction for article pages
//!
//! This module turns fetched page markup into the fields of an
//! [`ArticleRecord`](crate::record::ArticleRecord) and the set of article
//! links found on the page. Every field has an ordered list of selectors that
//! are tried from most specific to most generic; the first one yielding
//! non-empty text wins. Fields are extracted independently, so a page missing
//! one of them still produces the others.

use crate::url::ArticleFilter;
use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, SecondsFormat};
use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;
use url::Url;

/// Title used when no title selector matches
pub const TITLE_NOT_FOUND: &str = "Title not found";

/// Content used when no content selector matches
pub const CONTENT_NOT_FOUND: &str = "Content not found";

/// Title selectors, most specific first
const TITLE_SELECTORS: &[&str] = &["h1.article-title", "h1.title", "h1", "title"];

/// Content container selectors, most specific first
const CONTENT_SELECTORS: &[&str] = &["div.article-content", "div.content", "article", "div.text"];

/// Document-wide fallback for content: every paragraph on the page
const PARAGRAPH_SELECTOR: &str = "p";

/// Timestamp sources in priority order: selector and the attribute holding the value
const DATE_SELECTORS: &[(&str, &str)] = &[
    (r#"meta[property="article:published_time"]"#, "content"),
    ("time[datetime]", "datetime"),
    (r#"meta[name="date"]"#, "content"),
];

/// Fields and links extracted from one article page
#[derive(Debug, Clone)]
pub struct ParsedArticle {
    pub title: String,
    pub content: String,
    pub created_at: String,
    pub links: HashSet<String>,
}

/// Parses page markup and extracts every article field plus article links
///
/// # Example
///
/// ```
/// use article_harvester::crawler::parse_article;
/// use article_harvester::url::ArticleFilter;
/// use url::Url;
///
/// let html = r#"<html><body><h1 class="title">Foo</h1></body></html>"#;
/// let base = Url::parse("https://novinky.cz/clanek/1").unwrap();
/// let parsed = parse_article(html, &base, &ArticleFilter::default());
/// assert_eq!(parsed.title, "Foo");
/// assert_eq!(parsed.content, "Content not found");
/// ```
pub fn parse_article(html: &str, base_url: &Url, filter: &ArticleFilter) -> ParsedArticle {
    let document = Html::parse_document(html);

    ParsedArticle {
        title: extract_title(&document),
        content: extract_content(&document),
        created_at: extract_created_at(&document),
        links: extract_links(&document, base_url, filter),
    }
}

/// Extracts the article title, or [`TITLE_NOT_FOUND`]
pub fn extract_title(document: &Html) -> String {
    first_text(document, TITLE_SELECTORS).unwrap_or_else(|| TITLE_NOT_FOUND.to_string())
}

/// Extracts the article body, or [`CONTENT_NOT_FOUND`]
pub fn extract_content(document: &Html) -> String {
    first_text(document, CONTENT_SELECTORS)
        .or_else(|| paragraph_text(document))
        .unwrap_or_else(|| CONTENT_NOT_FOUND.to_string())
}

/// Extracts the publication time as ISO-8601
///
/// Falls back to the current local time when no candidate parses.
pub fn extract_created_at(document: &Html) -> String {
    for (selector, attribute) in DATE_SELECTORS {
        let Ok(selector) = Selector::parse(selector) else {
            continue;
        };

        for element in document.select(&selector) {
            if let Some(timestamp) = element
                .value()
                .attr(attribute)
                .and_then(normalize_timestamp)
            {
                return timestamp;
            }
        }
    }

    Local::now().to_rfc3339_opts(SecondsFormat::Secs, false)
}

/// Resolves every link on the page and keeps the article URLs
pub fn extract_links(document: &Html, base_url: &Url, filter: &ArticleFilter) -> HashSet<String> {
    let mut links = HashSet::new();

    let Ok(selector) = Selector::parse("a[href]") else {
        return links;
    };

    for element in document.select(&selector) {
        let Some(href) = element.value().attr("href") else {
            continue;
        };

        if let Ok(absolute) = base_url.join(href.trim()) {
            let absolute = absolute.to_string();
            if filter.is_article_url(&absolute) {
                links.insert(absolute);
            }
        }
    }

    links
}

/// Normalizes a raw timestamp to ISO-8601
///
/// Offset-bearing values keep their offset (a trailing `Z` is read as UTC and
/// written as `+00:00`); naive values stay naive; bare dates become midnight.
/// Returns `None` if the value is not a recognizable timestamp.
pub fn normalize_timestamp(raw: &str) -> Option<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    let candidate = match raw.strip_suffix('Z').or_else(|| raw.strip_suffix('z')) {
        Some(stripped) => format!("{}+00:00", stripped),
        None => raw.to_string(),
    };

    if let Ok(dt) = DateTime::parse_from_rfc3339(&candidate) {
        return Some(dt.to_rfc3339_opts(SecondsFormat::AutoSi, false));
    }

    for format in ["%Y-%m-%d %H:%M:%S%.f%:z", "%Y-%m-%dT%H:%M%:z"] {
        if let Ok(dt) = DateTime::parse_from_str(&candidate, format) {
            return Some(dt.to_rfc3339_opts(SecondsFormat::AutoSi, false));
        }
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(&candidate, format) {
            return Some(naive.format("%Y-%m-%dT%H:%M:%S%.f").to_string());
        }
    }

    NaiveDate::parse_from_str(&candidate, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.format("%Y-%m-%dT%H:%M:%S").to_string())
}

/// Returns the text of the first element matching any selector, in order
fn first_text(document: &Html, selectors: &[&str]) -> Option<String> {
    selectors.iter().find_map(|selector| {
        let selector = Selector::parse(selector).ok()?;
        document
            .select(&selector)
            .map(element_text)
            .find(|text| !text.is_empty())
    })
}

fn paragraph_text(document: &Html) -> Option<String> {
    let selector = Selector::parse(PARAGRAPH_SELECTOR).ok()?;
    let text = document
        .select(&selector)
        .map(element_text)
        .filter(|text| !text.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

    (!text.is_empty()).then_some(text)
}

/// Joins an element's text nodes, each trimmed, with single spaces
fn element_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
