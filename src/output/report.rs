//! End-of-run crawl report

use chrono::{DateTime, Utc};

/// Counters collected during one crawl run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,

    /// Categories discovered in the catalog
    pub categories: usize,

    /// Article links discovered, duplicates included
    pub article_links: usize,

    /// Distinct articles handled successfully (fresh or written)
    pub processed: usize,

    /// Articles found up to date
    pub fresh: usize,

    /// Articles written or re-written
    pub written: usize,

    /// Articles skipped because of an error
    pub failed: usize,

    /// Links skipped because the article was already handled in this run
    pub duplicates: usize,

    pub images_downloaded: u64,
    pub images_failed: u64,
}

impl CrawlReport {
    pub fn start() -> Self {
        Self {
            started_at: Utc::now(),
            finished_at: None,
            categories: 0,
            article_links: 0,
            processed: 0,
            fresh: 0,
            written: 0,
            failed: 0,
            duplicates: 0,
            images_downloaded: 0,
            images_failed: 0,
        }
    }

    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    /// Run duration in seconds, once finished
    pub fn duration_seconds(&self) -> Option<i64> {
        self.finished_at
            .map(|finished| (finished - self.started_at).num_seconds())
    }
}

/// Formats the report for the terminal
pub fn format_report(report: &CrawlReport) -> String {
    let mut out = String::new();

    out.push_str("=== Crawl Report ===\n\n");
    out.push_str(&format!("Started:  {}\n", report.started_at.to_rfc3339()));
    if let Some(finished) = report.finished_at {
        out.push_str(&format!("Finished: {}\n", finished.to_rfc3339()));
    }
    if let Some(duration) = report.duration_seconds() {
        out.push_str(&format!(
            "Duration: {} seconds ({:.2} minutes)\n",
            duration,
            duration as f64 / 60.0
        ));
    }
    out.push('\n');

    out.push_str("Catalog:\n");
    out.push_str(&format!("  Categories: {}\n", report.categories));
    out.push_str(&format!("  Article links: {}\n", report.article_links));
    out.push_str(&format!("  Duplicate links: {}\n", report.duplicates));
    out.push('\n');

    out.push_str("Articles:\n");
    out.push_str(&format!("  Processed: {}\n", report.processed));
    out.push_str(&format!("  Up to date: {}\n", report.fresh));
    out.push_str(&format!("  Written: {}\n", report.written));
    out.push_str(&format!("  Failed: {}\n", report.failed));
    out.push('\n');

    out.push_str("Images:\n");
    out.push_str(&format!("  Downloaded: {}\n", report.images_downloaded));
    out.push_str(&format!("  Failed: {}\n", report.images_failed));

    out
}

/// Prints the report to stdout
pub fn print_report(report: &CrawlReport) {
    print!("{}", format_report(report));
}
