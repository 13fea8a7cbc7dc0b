//! Article content extraction
//!
//! Turns a parsed article page into an [`ArticleDraft`]. The document is
//! never modified: images become [`Fragment::Image`] entries in document
//! order and are resolved into placeholders later.

use crate::crawler::article::{ArticleDraft, Breadcrumb, ContentBlock, Fragment};
use crate::crawler::selectors::CompiledSelectors;
use crate::url::resolve_href;
use crate::KbError;
use scraper::node::Node;
use scraper::{ElementRef, Html};
use url::Url;

/// Tags whose text is never article content
const SKIPPED_TAGS: &[&str] = &["script", "style", "noscript", "template"];

/// Extracts breadcrumb, title and body from article pages
pub struct ContentExtractor<'a> {
    selectors: &'a CompiledSelectors,
}

impl<'a> ContentExtractor<'a> {
    pub fn new(selectors: &'a CompiledSelectors) -> Self {
        Self { selectors }
    }

    /// Parses `html` and extracts the article
    pub fn extract_html(&self, html: &str, source_url: &Url) -> Result<ArticleDraft, KbError> {
        let document = Html::parse_document(html);
        self.extract(&document, source_url)
    }

    /// Extracts the article from a parsed document
    ///
    /// # Returns
    ///
    /// * `Ok(ArticleDraft)` - Title and content container were found (the body may be empty)
    /// * `Err(KbError::NotFound)` - No title or no content container
    pub fn extract(&self, document: &Html, source_url: &Url) -> Result<ArticleDraft, KbError> {
        let breadcrumb = self.extract_breadcrumb(document);

        let title = document
            .select(&self.selectors.title)
            .next()
            .map(|element| collapse_whitespace(&element.text().collect::<String>()))
            .filter(|title| !title.is_empty())
            .ok_or_else(|| KbError::NotFound {
                url: source_url.to_string(),
                element: "title",
            })?;

        let content = document
            .select(&self.selectors.content)
            .next()
            .ok_or_else(|| KbError::NotFound {
                url: source_url.to_string(),
                element: "content container",
            })?;

        let blocks = extract_blocks(content, source_url);

        Ok(ArticleDraft {
            url: source_url.to_string(),
            breadcrumb,
            title,
            blocks,
        })
    }

    fn extract_breadcrumb(&self, document: &Html) -> Breadcrumb {
        let segments = document
            .select(&self.selectors.breadcrumb)
            .take(3)
            .map(|element| collapse_whitespace(&element.text().collect::<String>()))
            .collect();
        Breadcrumb::from_segments(segments)
    }
}

/// One block per direct child of the content container, in order
fn extract_blocks(content: ElementRef<'_>, source_url: &Url) -> Vec<ContentBlock> {
    let mut blocks = Vec::new();

    for child in content.children() {
        if let Some(element) = ElementRef::wrap(child) {
            if is_skipped(&element) {
                continue;
            }
            let mut fragments = Vec::new();
            collect_fragments(element, source_url, &mut fragments);
            if !fragments.is_empty() {
                blocks.push(ContentBlock { fragments });
            }
        } else if let Node::Text(text) = child.value() {
            let trimmed = text.trim();
            if !trimmed.is_empty() {
                blocks.push(ContentBlock {
                    fragments: vec![Fragment::Text(trimmed.to_string())],
                });
            }
        }
    }

    blocks
}

/// Depth-first walk collecting text runs and image references in document order
fn collect_fragments(element: ElementRef<'_>, source_url: &Url, out: &mut Vec<Fragment>) {
    if element.value().name() == "img" {
        if let Some(src) = element
            .value()
            .attr("src")
            .and_then(|src| resolve_href(source_url, src))
        {
            out.push(Fragment::Image(src));
        }
        return;
    }

    for child in element.children() {
        if let Some(child_element) = ElementRef::wrap(child) {
            if !is_skipped(&child_element) {
                collect_fragments(child_element, source_url, out);
            }
        } else if let Node::Text(text) = child.value() {
            let collapsed = collapse_whitespace(text);
            if !collapsed.is_empty() {
                out.push(Fragment::Text(collapsed));
            }
        }
    }
}

fn is_skipped(element: &ElementRef<'_>) -> bool {
    SKIPPED_TAGS.contains(&element.value().name())
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
