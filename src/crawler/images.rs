//! Image materialization
//!
//! Images are numbered per article, starting at 1, and stored as
//! `<title>-<n>.jpg`. A number is only consumed once the image file is on
//! disk, so a failed download leaves no gap and no placeholder.

use crate::crawler::fetcher::PageFetcher;
use crate::crawler::session::CrawlSession;
use crate::storage::ArticleStore;
use crate::KbError;
use url::Url;

/// Per-article image counter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageSequence {
    next: u32,
}

impl ImageSequence {
    pub fn new() -> Self {
        Self { next: 1 }
    }

    /// The number the next successful image will get
    pub fn peek(&self) -> u32 {
        self.next
    }

    /// Consumes the current number
    fn advance(&mut self) -> u32 {
        let current = self.next;
        self.next += 1;
        current
    }
}

impl Default for ImageSequence {
    fn default() -> Self {
        Self::new()
    }
}

/// How an image ended up on disk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageOutcome {
    Downloaded(u32),
    Reused(u32),
}

impl ImageOutcome {
    pub fn number(&self) -> u32 {
        match self {
            Self::Downloaded(n) | Self::Reused(n) => *n,
        }
    }
}

/// Downloads article images into the store
pub struct ImageMaterializer<'a> {
    fetcher: &'a PageFetcher,
    store: &'a ArticleStore,
}

impl<'a> ImageMaterializer<'a> {
    pub fn new(fetcher: &'a PageFetcher, store: &'a ArticleStore) -> Self {
        Self { fetcher, store }
    }

    /// Stores one image under the next number of `sequence`
    ///
    /// With `keep_existing`, a file already present for that number is
    /// kept and no request is made. On failure the sequence is untouched.
    pub async fn materialize(
        &self,
        sequence: &mut ImageSequence,
        image_url: &Url,
        article_title: &str,
        keep_existing: bool,
    ) -> Result<ImageOutcome, KbError> {
        let number = sequence.peek();

        if keep_existing && self.store.image_exists(article_title, number) {
            sequence.advance();
            return Ok(ImageOutcome::Reused(number));
        }

        let bytes = self.fetcher.fetch_bytes(image_url).await.into_body(image_url)?;
        self.store.write_image(article_title, number, &bytes)?;
        sequence.advance();

        Ok(ImageOutcome::Downloaded(number))
    }

    /// Materializes every image of an article in document order
    ///
    /// Returns one entry per source: the assigned number, or `None` for an
    /// image that could not be stored. Existing files are only reused until
    /// the first failed image.
    pub async fn materialize_all(
        &self,
        session: &mut CrawlSession,
        article_title: &str,
        sources: &[&Url],
        keep_existing: bool,
    ) -> Vec<Option<u32>> {
        let mut sequence = ImageSequence::new();
        let mut assignments = Vec::with_capacity(sources.len());
        let mut reuse = keep_existing;

        for source in sources {
            match self
                .materialize(&mut sequence, source, article_title, reuse)
                .await
            {
                Ok(outcome) => {
                    match outcome {
                        ImageOutcome::Downloaded(n) => {
                            tracing::debug!("Downloaded image {} for '{}': {}", n, article_title, source);
                            session.record_image_downloaded();
                        }
                        ImageOutcome::Reused(n) => {
                            tracing::debug!("Kept existing image {} for '{}'", n, article_title);
                        }
                    }
                    assignments.push(Some(outcome.number()));
                }
                Err(e) => {
                    tracing::warn!("Dropping image {} of '{}': {}", source, article_title, e);
                    session.record_image_failed();
                    assignments.push(None);
                    // Later numbers now belong to different sources than on disk
                    reuse = false;
                }
            }
        }

        assignments
    }
}
