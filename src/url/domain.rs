use url::Url;

/// Extracts the lowercase host from a URL
///
/// # Examples
///
/// ```
/// use url::Url;
/// use kb_mirror::url::extract_domain;
///
/// let url = Url::parse("https://KB.Example.com/path").unwrap();
/// assert_eq!(extract_domain(&url), Some("kb.example.com".to_string()));
/// ```
pub fn extract_domain(url: &Url) -> Option<String> {
    url.host_str().map(|h| h.to_lowercase())
}

/// Returns true if both URLs share scheme, host and port
///
/// The session cookie is only attached to requests that pass this check
/// against the catalog address, so images hosted elsewhere never see it.
pub fn same_origin(a: &Url, b: &Url) -> bool {
    a.scheme() == b.scheme()
        && extract_domain(a) == extract_domain(b)
        && a.port_or_known_default() == b.port_or_known_default()
}
