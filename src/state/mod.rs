//! State module for tracking article freshness
//!
//! # Components
//!
//! - `ArticleState`: where a stored article stands relative to the live source
//! - `StaleReason`: why a stored article has to be re-written

mod article_state;

// Re-export main types
pub use article_state::{ArticleState, StaleReason};
