/// Checks if a host belongs to an allowed site domain
///
/// A host matches when it is the site domain itself or any subdomain of it:
/// "novinky.cz" matches "novinky.cz", "www.novinky.cz" and
/// "m.www.novinky.cz", but not "notnovinky.cz" or "novinky.cz.evil.com".
///
/// # Examples
///
/// ```
/// use article_harvester::url::matches_site;
///
/// assert!(matches_site("novinky.cz", "novinky.cz"));
/// assert!(matches_site("novinky.cz", "www.novinky.cz"));
/// assert!(!matches_site("novinky.cz", "idnes.cz"));
/// ```
pub fn matches_site(site_domain: &str, host: &str) -> bool {
    host == site_domain
        || host
            .strip_suffix(site_domain)
            .is_some_and(|prefix| prefix.ends_with('.'))
}
