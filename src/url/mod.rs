//! URL admission for the crawl frontier
//!
//! This module decides which URLs are article pages worth fetching. A URL is
//! admitted only when all of the following hold:
//! - its host belongs to one of the allowed site domains
//! - its path matches that site's article pattern
//! - it does not end in a non-document file extension

mod domain;
mod matcher;

use crate::config::SiteEntry;
use crate::ConfigError;
use regex::Regex;
use std::sync::OnceLock;
use url::Url;

pub use domain::{extract_domain, source_website};
pub use matcher::matches_site;

/// File extensions that never point at an article document
pub const BLOCKED_EXTENSIONS: &[&str] = &[".jpg", ".jpeg", ".png", ".gif", ".pdf", ".mp4"];

/// Built-in site table: domain and the path pattern of its article pages
pub const DEFAULT_SITES: &[(&str, &str)] = &[
    ("novinky.cz", "/clanek/"),
    ("idnes.cz", "/zpravy/"),
    ("ctk.cz", "/clanek/"),
];

/// An allowed site and the compiled pattern identifying its articles
#[derive(Debug, Clone)]
pub struct SiteRule {
    domain: String,
    pattern: Regex,
}

impl SiteRule {
    /// Builds a rule from a domain and a regular expression over the URL path
    pub fn new(domain: &str, pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            domain: domain.to_lowercase(),
            pattern: Regex::new(pattern)?,
        })
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }
}

/// The static domain → article-pattern table consulted for every link
#[derive(Debug, Clone)]
pub struct ArticleFilter {
    sites: Vec<SiteRule>,
}

impl ArticleFilter {
    pub fn new(sites: Vec<SiteRule>) -> Self {
        Self { sites }
    }

    /// Builds a filter from configured site entries
    ///
    /// An empty list yields the built-in table.
    pub fn from_entries(entries: &[SiteEntry]) -> Result<Self, ConfigError> {
        if entries.is_empty() {
            return Ok(Self::default());
        }

        let sites = entries
            .iter()
            .map(|entry| {
                SiteRule::new(&entry.domain, &entry.pattern).map_err(|e| {
                    ConfigError::InvalidPattern(format!("{}: {}", entry.pattern, e))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self::new(sites))
    }

    pub fn sites(&self) -> &[SiteRule] {
        &self.sites
    }

    /// Returns true if `url` is an article page on one of the allowed sites
    ///
    /// # Examples
    ///
    /// ```
    /// use article_harvester::url::ArticleFilter;
    ///
    /// let filter = ArticleFilter::default();
    /// assert!(filter.is_article_url("https://www.novinky.cz/clanek/zpravy-1"));
    /// assert!(!filter.is_article_url("https://www.novinky.cz/foto.jpg"));
    /// assert!(!filter.is_article_url("https://example.com/clanek/1"));
    /// ```
    pub fn is_article_url(&self, url: &str) -> bool {
        if has_blocked_extension(url) {
            return false;
        }

        let parsed = match Url::parse(url) {
            Ok(u) => u,
            Err(_) => return false,
        };

        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return false;
        }

        let host = match extract_domain(&parsed) {
            Some(h) => h,
            None => return false,
        };

        self.sites
            .iter()
            .filter(|site| matches_site(&site.domain, &host))
            .any(|site| site.pattern.is_match(parsed.path()))
    }
}

impl Default for ArticleFilter {
    fn default() -> Self {
        let sites = DEFAULT_SITES
            .iter()
            .map(|(domain, pattern)| {
                SiteRule::new(domain, pattern).expect("built-in article patterns are valid")
            })
            .collect();
        Self::new(sites)
    }
}

/// Checks a URL against the built-in site table
pub fn is_article_url(url: &str) -> bool {
    static DEFAULT_FILTER: OnceLock<ArticleFilter> = OnceLock::new();
    DEFAULT_FILTER
        .get_or_init(ArticleFilter::default)
        .is_article_url(url)
}

fn has_blocked_extension(url: &str) -> bool {
    let lower = url.to_lowercase();
    BLOCKED_EXTENSIONS.iter().any(|ext| lower.ends_with(ext))
}
