use url::Url;

/// Resolves an href to an absolute http(s) URL
///
/// Returns None if the link should be ignored:
/// - empty hrefs and fragment-only anchors
/// - javascript:, mailto:, tel: and data: schemes
/// - anything that does not resolve to http or https
///
/// # Examples
///
/// ```
/// use url::Url;
/// use kb_mirror::url::resolve_href;
///
/// let base = Url::parse("https://kb.example.com/").unwrap();
/// let url = resolve_href(&base, "/knowledge_base/item/42").unwrap();
/// assert_eq!(url.as_str(), "https://kb.example.com/knowledge_base/item/42");
/// ```
pub fn resolve_href(base: &Url, href: &str) -> Option<Url> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    if href.starts_with("javascript:")
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
        || href.starts_with("data:")
    {
        return None;
    }

    match base.join(href) {
        Ok(absolute) if absolute.scheme() == "http" || absolute.scheme() == "https" => {
            Some(absolute)
        }
        _ => None,
    }
}
