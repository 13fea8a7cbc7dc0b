use url::Url;

/// Builds the address of the listing page starting at `offset`
///
/// The current page address is stripped of its query string and fragment,
/// then `?offset=<offset>` is appended.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use kb_mirror::url::listing_page_url;
///
/// let current = Url::parse("https://kb.example.com/knowledge_base/category/7?offset=20").unwrap();
/// let next = listing_page_url(&current, 40);
/// assert_eq!(next.as_str(), "https://kb.example.com/knowledge_base/category/7?offset=40");
/// ```
pub fn listing_page_url(current: &Url, offset: u64) -> Url {
    let mut next = current.clone();
    next.set_fragment(None);
    next.set_query(Some(&format!("offset={}", offset)));
    next
}
