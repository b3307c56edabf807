//! The article record passed from fetchers to writers

use serde::{Deserialize, Serialize};

/// A structured article extracted from a fetched page
///
/// Records are immutable once produced. The field names are the ones written
/// to the JSON snapshots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleRecord {
    /// The URL the article was fetched from
    pub url: String,

    /// Article headline
    pub title: String,

    /// Article body text
    pub content: String,

    /// Publication timestamp (ISO-8601)
    pub created_at: String,

    /// Network location of the source site (host, plus port when explicit)
    pub source_website: String,
}
