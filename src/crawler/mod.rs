//! Crawler module for knowledge-base mirroring
//!
//! This module contains the crawl/extract/reconcile pipeline, including:
//! - Authenticated HTTP fetching
//! - Catalog walking with paginated article listings
//! - Article extraction into ordered text/image blocks
//! - Image download and numbering
//! - Staleness detection against the stored mirror
//! - Overall crawl coordination

mod article;
mod coordinator;
mod extractor;
mod fetcher;
mod images;
mod links;
mod selectors;
mod session;
mod staleness;

pub use article::{
    ArticleDraft, ArticleRecord, Breadcrumb, ContentBlock, Fragment, Inline, Paragraph,
    NO_CATEGORY, NO_DATABASE, NO_SECTION,
};
pub use coordinator::{ArticleOutcome, Crawler};
pub use extractor::ContentExtractor;
pub use fetcher::{FetchResult, PageFetcher};
pub use images::{ImageMaterializer, ImageOutcome, ImageSequence};
pub use links::{parse_category_links, parse_listing_page, LinkCollector, ListingPage, LoadMore};
pub use selectors::CompiledSelectors;
pub use session::CrawlSession;
pub use staleness::StalenessChecker;

use crate::config::Config;
use crate::output::CrawlReport;
use crate::KbError;

/// Runs a complete crawl operation
///
/// This is the main entry point for a full crawl. It will:
/// 1. Build the HTTP client and compile the selectors
/// 2. Collect the category links of the catalog
/// 3. Collect every category's article links, page by page
/// 4. Check, extract and store each article
/// 5. Return the run report
///
/// # Arguments
///
/// * `config` - The crawler configuration
/// * `session_id` - Value of the session cookie
///
/// # Returns
///
/// * `Ok(CrawlReport)` - Crawl completed (individual failures are counted, not raised)
/// * `Err(KbError)` - The crawler could not be set up
pub async fn crawl(config: &Config, session_id: &str) -> Result<CrawlReport, KbError> {
    let crawler = Crawler::new(config, session_id)?;
    Ok(crawler.run().await)
}
