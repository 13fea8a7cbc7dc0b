//! Crawler coordinator - main crawl orchestration logic
//!
//! This module drives the whole pipeline, strictly sequentially:
//! - Walking the catalog for categories and article links
//! - Skipping articles already handled in this run
//! - Fetching and extracting each article once
//! - Checking the stored copy and only writing what changed
//! - Pausing between categories

use crate::config::Config;
use crate::crawler::extractor::ContentExtractor;
use crate::crawler::fetcher::PageFetcher;
use crate::crawler::images::ImageMaterializer;
use crate::crawler::links::LinkCollector;
use crate::crawler::selectors::CompiledSelectors;
use crate::crawler::session::CrawlSession;
use crate::crawler::staleness::StalenessChecker;
use crate::output::{render_article, CrawlReport};
use crate::state::ArticleState;
use crate::storage::{sanitize_component, ArticleStore};
use crate::KbError;
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

/// What happened to one article link
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArticleOutcome {
    /// Already handled earlier in this run
    AlreadyVisited,

    /// Stored copy is up to date; nothing was written
    Fresh,

    /// Article was written
    Written {
        path: PathBuf,
        /// State that triggered the write
        state: ArticleState,
        /// Number of `$<n>` placeholders in the stored body
        images: usize,
    },
}

/// Main crawler structure
pub struct Crawler {
    fetcher: PageFetcher,
    store: ArticleStore,
    selectors: CompiledSelectors,
    base_url: Url,
    catalog_url: Url,
    category_delay: Duration,
    session: CrawlSession,
}

impl Crawler {
    /// Creates a crawler for one run
    ///
    /// # Arguments
    ///
    /// * `config` - The validated configuration
    /// * `session_id` - Value of the session cookie
    ///
    /// # Returns
    ///
    /// * `Ok(Crawler)` - Ready to run
    /// * `Err(KbError)` - Bad URLs, selectors, cookie, or the HTTP client could not be built
    pub fn new(config: &Config, session_id: &str) -> Result<Self, KbError> {
        let base_url = Url::parse(&config.site.base_url)?;
        let catalog_url = Url::parse(config.site.catalog_url())?;

        Ok(Self {
            fetcher: PageFetcher::from_config(config, session_id)?,
            store: ArticleStore::from_config(&config.output),
            selectors: CompiledSelectors::from_config(&config.selectors)?,
            base_url,
            catalog_url,
            category_delay: Duration::from_millis(config.crawler.category_delay_ms),
            session: CrawlSession::new(),
        })
    }

    pub fn store(&self) -> &ArticleStore {
        &self.store
    }

    pub fn session(&self) -> &CrawlSession {
        &self.session
    }

    fn link_collector(&self) -> LinkCollector<'_> {
        LinkCollector::new(
            &self.fetcher,
            &self.selectors,
            &self.base_url,
            &self.catalog_url,
        )
    }

    /// Category URLs of the catalog
    pub async fn collect_categories(&self) -> Vec<Url> {
        self.link_collector().collect_section_links().await
    }

    /// Article URLs of one category, all listing pages included
    pub async fn collect_articles(&self, category_url: &Url) -> Vec<Url> {
        self.link_collector().collect_article_links(category_url).await
    }

    /// Runs a full crawl and returns its report
    ///
    /// Categories are handled in discovery order, articles in the order
    /// their links were found. No error stops the run.
    pub async fn run(mut self) -> CrawlReport {
        self.prepare_store();

        let categories = self.collect_categories().await;
        self.session.report_mut().categories = categories.len();
        tracing::info!("Starting article collection from {} categories", categories.len());

        for (index, category_url) in categories.iter().enumerate() {
            if index > 0 && !self.category_delay.is_zero() {
                tokio::time::sleep(self.category_delay).await;
            }

            let articles = self.collect_articles(category_url).await;
            self.session.report_mut().article_links += articles.len();

            for article_url in &articles {
                self.handle_article(article_url).await;
            }
        }

        let report = self.session.finish();
        tracing::info!(
            "Crawl finished: {} articles processed ({} written, {} up to date, {} failed)",
            report.processed,
            report.written,
            report.fresh,
            report.failed
        );
        report
    }

    /// Runs the pipeline for a single article
    pub async fn run_single(mut self, article_url: &Url) -> CrawlReport {
        self.prepare_store();
        self.session.report_mut().article_links = 1;
        self.handle_article(article_url).await;
        self.session.finish()
    }

    /// Processes one article and records the outcome; never fails
    pub async fn handle_article(&mut self, article_url: &Url) {
        match self.process_article(article_url).await {
            Ok(ArticleOutcome::AlreadyVisited) => {
                tracing::info!("Article {} already processed", article_url);
                self.session.report_mut().duplicates += 1;
            }
            Ok(ArticleOutcome::Fresh) => {
                tracing::info!("Article {} is up to date", article_url);
                self.session.report_mut().fresh += 1;
            }
            Ok(ArticleOutcome::Written {
                path,
                state,
                images,
            }) => {
                tracing::info!(
                    "Article {} written to {} ({}, {} images)",
                    article_url,
                    path.display(),
                    state,
                    images
                );
                self.session.report_mut().written += 1;
            }
            Err(e) if e.is_fetch_failure() => {
                tracing::error!("Failed to fetch article {}: {}", article_url, e);
                self.session.report_mut().failed += 1;
            }
            Err(e) => {
                tracing::warn!("Skipping article {}: {}", article_url, e);
                self.session.report_mut().failed += 1;
            }
        }
    }

    /// Fetches, checks and, if needed, writes one article
    ///
    /// The page is fetched and extracted once; the same draft feeds the
    /// staleness check and the write. Image files are named after the
    /// title, so an article whose title is already used by another
    /// article's images in this run fails instead of overwriting them.
    pub async fn process_article(&mut self, article_url: &Url) -> Result<ArticleOutcome, KbError> {
        if self.session.is_visited(article_url.as_str()) {
            return Ok(ArticleOutcome::AlreadyVisited);
        }

        let html = self
            .fetcher
            .fetch_html(article_url)
            .await
            .into_body(article_url)?;
        let draft = ContentExtractor::new(&self.selectors).extract_html(&html, article_url)?;

        if draft.image_count() > 0 {
            let key = sanitize_component(&draft.title);
            if let Err(claimed_by) = self.session.claim_image_key(&key, article_url.as_str()) {
                return Err(KbError::ImageKeyConflict { key, claimed_by });
            }
        }

        let state = StalenessChecker::new(&self.store).check(&draft);
        tracing::debug!("Article {} is {}", article_url, state);

        if !state.needs_update() {
            self.session.mark_visited(article_url.as_str());
            return Ok(ArticleOutcome::Fresh);
        }

        let sources = draft.image_sources();
        let assignments = ImageMaterializer::new(&self.fetcher, &self.store)
            .materialize_all(
                &mut self.session,
                &draft.title,
                &sources,
                state.keeps_existing_images(),
            )
            .await;

        let record = draft.to_record(&assignments);
        let path = self.store.article_path(&record.breadcrumb, &record.title);
        self.store.write_article(&path, &render_article(&record))?;
        self.session.mark_visited(article_url.as_str());

        Ok(ArticleOutcome::Written {
            path,
            state,
            images: record.image_urls.len(),
        })
    }

    fn prepare_store(&self) {
        if let Err(e) = self.store.prepare() {
            tracing::error!("Failed to prepare output directory: {}", e);
        }
    }
}
