use crate::output::CrawlReport;
use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};

/// Per-run crawl state
///
/// Created when a crawl starts and dropped when it ends; nothing here is
/// persisted. Only the crawler owns it, so no locking is needed.
#[derive(Debug)]
pub struct CrawlSession {
    visited: HashSet<String>,
    /// Image name prefix (sanitized title) -> article URL that owns it
    image_keys: HashMap<String, String>,
    report: CrawlReport,
}

impl CrawlSession {
    pub fn new() -> Self {
        Self {
            visited: HashSet::new(),
            image_keys: HashMap::new(),
            report: CrawlReport::start(),
        }
    }

    pub fn is_visited(&self, url: &str) -> bool {
        self.visited.contains(url)
    }

    /// Records an article as processed; returns false if it already was
    pub fn mark_visited(&mut self, url: &str) -> bool {
        self.visited.insert(url.to_string())
    }

    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }

    /// Reserves an image name prefix for one article for the rest of the run
    ///
    /// Claiming again for the same article succeeds. If another article
    /// already holds the prefix, its URL is returned as the error.
    pub fn claim_image_key(&mut self, key: &str, article_url: &str) -> Result<(), String> {
        match self.image_keys.entry(key.to_string()) {
            Entry::Occupied(owner) if owner.get() != article_url => Err(owner.get().clone()),
            Entry::Occupied(_) => Ok(()),
            Entry::Vacant(slot) => {
                slot.insert(article_url.to_string());
                Ok(())
            }
        }
    }

    pub fn images_downloaded(&self) -> u64 {
        self.report.images_downloaded
    }

    pub fn record_image_downloaded(&mut self) {
        self.report.images_downloaded += 1;
    }

    pub fn record_image_failed(&mut self) {
        self.report.images_failed += 1;
    }

    pub fn report_mut(&mut self) -> &mut CrawlReport {
        &mut self.report
    }

    /// Ends the session and returns its final report
    pub fn finish(mut self) -> CrawlReport {
        self.report.processed = self.visited.len();
        self.report.finish();
        self.report
    }
}

impl Default for CrawlSession {
    fn default() -> Self {
        Self::new()
    }
}
