//! Freshness check for stored articles
//!
//! An article is `Fresh` when the file at its derived path holds exactly
//! what would be written now and every image `1..=N` is on disk.

use crate::crawler::article::ArticleDraft;
use crate::crawler::extractor::ContentExtractor;
use crate::crawler::fetcher::PageFetcher;
use crate::output::render_article;
use crate::state::{ArticleState, StaleReason};
use crate::storage::ArticleStore;
use url::Url;

/// Decides whether a stored article must be re-written
pub struct StalenessChecker<'a> {
    store: &'a ArticleStore,
}

impl<'a> StalenessChecker<'a> {
    pub fn new(store: &'a ArticleStore) -> Self {
        Self { store }
    }

    /// Compares a freshly extracted article with what is stored
    pub fn check(&self, draft: &ArticleDraft) -> ArticleState {
        let path = self.store.article_path(&draft.breadcrumb, &draft.title);

        let stored = match self.store.read_article(&path) {
            Ok(Some(stored)) => stored,
            Ok(None) => return ArticleState::Missing,
            Err(e) => {
                tracing::warn!("Cannot read stored article {}: {}", path.display(), e);
                return ArticleState::Stale(StaleReason::Unreadable);
            }
        };

        let expected = render_article(&draft.expected_record());
        if stored.trim_end() != expected.trim_end() {
            return ArticleState::Stale(StaleReason::ContentChanged);
        }

        for ordinal in 1..=draft.image_count() as u32 {
            if !self.store.image_exists(&draft.title, ordinal) {
                return ArticleState::Stale(StaleReason::ImageMissing(ordinal));
            }
        }

        ArticleState::Fresh
    }

    /// Fetches and extracts `url`, then checks it
    ///
    /// Any fetch or extraction failure resolves to `Stale(CheckFailed)`, so
    /// a broken check never skips an article.
    pub async fn check_url(
        &self,
        fetcher: &PageFetcher,
        extractor: &ContentExtractor<'_>,
        url: &Url,
    ) -> ArticleState {
        let html = match fetcher.fetch_html(url).await.into_body(url) {
            Ok(html) => html,
            Err(e) => {
                tracing::warn!("Staleness check could not fetch {}: {}", url, e);
                return ArticleState::Stale(StaleReason::CheckFailed);
            }
        };

        match extractor.extract_html(&html, url) {
            Ok(draft) => self.check(&draft),
            Err(e) => {
                tracing::warn!("Staleness check could not extract {}: {}", url, e);
                ArticleState::Stale(StaleReason::CheckFailed)
            }
        }
    }

    /// Returns true if the article at `url` has to be fetched and written again
    pub async fn needs_update(
        &self,
        fetcher: &PageFetcher,
        extractor: &ContentExtractor<'_>,
        url: &Url,
    ) -> bool {
        self.check_url(fetcher, extractor, url).await.needs_update()
    }
}
