//! Catalog walking
//!
//! Sections are read from the catalog root; each section block lists its
//! categories; each category lists its articles over one or more listing
//! pages chained by a "load more" control.

use crate::crawler::fetcher::PageFetcher;
use crate::crawler::selectors::CompiledSelectors;
use crate::url::{listing_page_url, resolve_href};
use crate::KbError;
use scraper::{ElementRef, Html};
use std::collections::HashSet;
use url::Url;

/// State of the "load more" control on a listing page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadMore {
    /// No control: this is the last page
    Absent,

    /// The control points at the page starting at this offset
    Offset(u64),

    /// The control is present but its offset could not be read
    Invalid(String),
}

/// Links and pagination found on one listing page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingPage {
    pub articles: Vec<Url>,
    pub load_more: LoadMore,
}

/// Discovers category and article URLs
pub struct LinkCollector<'a> {
    fetcher: &'a PageFetcher,
    selectors: &'a CompiledSelectors,
    base_url: &'a Url,
    catalog_url: &'a Url,
}

impl<'a> LinkCollector<'a> {
    pub fn new(
        fetcher: &'a PageFetcher,
        selectors: &'a CompiledSelectors,
        base_url: &'a Url,
        catalog_url: &'a Url,
    ) -> Self {
        Self {
            fetcher,
            selectors,
            base_url,
            catalog_url,
        }
    }

    /// Returns every category URL of the catalog, in section-then-category order
    ///
    /// A failed catalog fetch is logged and yields no categories.
    pub async fn collect_section_links(&self) -> Vec<Url> {
        let html = match self.fetcher.fetch_html(self.catalog_url).await.into_body(self.catalog_url) {
            Ok(html) => html,
            Err(e) => {
                tracing::error!("Failed to fetch catalog {}: {}", self.catalog_url, e);
                return Vec::new();
            }
        };

        let document = Html::parse_document(&html);
        let links = parse_category_links(&document, self.selectors, self.base_url);
        tracing::info!("Found {} categories in catalog", links.len());
        links
    }

    /// Returns every article URL of a category, following "load more" pages
    ///
    /// Pages are fetched iteratively. The walk stops when a page has no
    /// "load more" control, when the next page address equals one already
    /// requested, or when a page fails to load; links gathered before the
    /// failure are kept.
    pub async fn collect_article_links(&self, category_url: &Url) -> Vec<Url> {
        tracing::info!("Collecting articles from {}", category_url);

        let mut links = Vec::new();
        let mut requested = HashSet::new();
        let mut current = category_url.clone();

        loop {
            requested.insert(current.clone());

            let page = match self.fetch_listing(&current).await {
                Ok(page) => page,
                Err(e) => {
                    tracing::error!("Failed to fetch listing page {}: {}", current, e);
                    break;
                }
            };

            for article in &page.articles {
                tracing::debug!("Found article: {}", article);
            }
            links.extend(page.articles);

            let next = match page.load_more {
                LoadMore::Absent => break,
                LoadMore::Invalid(reason) => {
                    tracing::error!("Unreadable pagination on {}: {}", current, reason);
                    break;
                }
                LoadMore::Offset(offset) => listing_page_url(&current, offset),
            };

            if requested.contains(&next) {
                tracing::debug!("Pagination of {} stopped at repeated page {}", category_url, next);
                break;
            }

            tracing::info!("Following listing page {}", next);
            current = next;
        }

        tracing::info!("Found {} articles in {}", links.len(), category_url);
        links
    }

    async fn fetch_listing(&self, url: &Url) -> Result<ListingPage, KbError> {
        let html = self.fetcher.fetch_html(url).await.into_body(url)?;
        let document = Html::parse_document(&html);
        Ok(parse_listing_page(&document, self.selectors, self.base_url))
    }
}

/// Extracts category links: for each section anchor, the categories inside its enclosing block
pub fn parse_category_links(
    document: &Html,
    selectors: &CompiledSelectors,
    base_url: &Url,
) -> Vec<Url> {
    let mut links = Vec::new();
    let sections: Vec<ElementRef<'_>> = document.select(&selectors.section_link).collect();
    tracing::info!("Found {} sections", sections.len());

    for section in sections {
        let Some(block) = section
            .ancestors()
            .filter_map(ElementRef::wrap)
            .find(|ancestor| selectors.section_block.matches(ancestor))
        else {
            tracing::warn!(
                "Section '{}' has no enclosing block",
                section.text().collect::<String>().trim()
            );
            continue;
        };

        for category in block.select(&selectors.category_link) {
            if let Some(url) = category
                .value()
                .attr("href")
                .and_then(|href| resolve_href(base_url, href))
            {
                tracing::debug!("Found category: {}", url);
                links.push(url);
            }
        }
    }

    links
}

/// Extracts article links and the "load more" state of a listing page
pub fn parse_listing_page(
    document: &Html,
    selectors: &CompiledSelectors,
    base_url: &Url,
) -> ListingPage {
    let articles = document
        .select(&selectors.article_link)
        .filter_map(|anchor| anchor.value().attr("href"))
        .filter_map(|href| resolve_href(base_url, href))
        .collect();

    let load_more = if document.select(&selectors.load_more).next().is_none() {
        LoadMore::Absent
    } else {
        match document
            .select(&selectors.offset_field)
            .next()
            .and_then(|field| field.value().attr("value"))
        {
            None => LoadMore::Invalid("no offset field".to_string()),
            Some(value) => match value.trim().parse::<u64>() {
                Ok(offset) => LoadMore::Offset(offset),
                Err(e) => LoadMore::Invalid(format!("offset '{}': {}", value, e)),
            },
        }
    };

    ListingPage {
        articles,
        load_more,
    }
}
