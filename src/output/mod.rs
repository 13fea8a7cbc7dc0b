//! Output module for stored articles and crawl reports
//!
//! This module handles:
//! - Rendering an article into its on-disk text form
//! - Summarizing a crawl run

mod article;
mod report;

pub use article::{render_article, CONTENT_MARKER, METADATA_MARKER};
pub use report::{format_report, print_report, CrawlReport};
