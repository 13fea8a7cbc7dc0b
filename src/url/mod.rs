//! URL handling module for kb-mirror
//!
//! This module resolves catalog hrefs against the site base, builds the
//! paginated listing addresses, and decides which hosts receive the
//! session cookie.

mod domain;
mod pagination;
mod resolve;

// Re-export main functions
pub use domain::{extract_domain, same_origin};
pub use pagination::listing_page_url;
pub use resolve::resolve_href;
