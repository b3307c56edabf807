use url::Url;

/// Extracts the lowercase host of a URL
///
/// # Examples
///
/// ```
/// use url::Url;
/// use article_harvester::url::extract_domain;
///
/// let url = Url::parse("https://WWW.Novinky.CZ/clanek/1").unwrap();
/// assert_eq!(extract_domain(&url), Some("www.novinky.cz".to_string()));
/// ```
pub fn extract_domain(url: &Url) -> Option<String> {
    url.host_str().map(|h| h.to_lowercase())
}

/// Returns the network location of a URL: the host, plus `:port` when the
/// URL carries a non-default port
///
/// This is the value stored as a record's `source_website`.
pub fn source_website(url: &Url) -> String {
    match (url.host_str(), url.port()) {
        (Some(host), Some(port)) => format!("{}:{}", host, port),
        (Some(host), None) => host.to_string(),
        (None, _) => String::new(),
    }
}
