//! kb-mirror: an incremental knowledge-base mirror
//!
//! This crate walks a web knowledge base (sections, categories, articles),
//! extracts every article into a flat text file laid out by its breadcrumb
//! path, downloads the embedded images, and on later runs only re-writes the
//! articles whose text or images went missing or changed.

pub mod config;
pub mod crawler;
pub mod output;
pub mod state;
pub mod storage;
pub mod url;

use thiserror::Error;

/// Main error type for kb-mirror operations
#[derive(Debug, Error)]
pub enum KbError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP {status} for {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("Network error for {url}: {message}")]
    Network { url: String, message: String },

    #[error("No {element} found on {url}")]
    NotFound { url: String, element: &'static str },

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Invalid selector '{selector}': {message}")]
    Selector { selector: String, message: String },

    #[error("Image name '{key}' already taken by {claimed_by}")]
    ImageKeyConflict { key: String, claimed_by: String },
}

impl KbError {
    /// Returns true for failures caused by the remote side (status, timeout, transport)
    pub fn is_fetch_failure(&self) -> bool {
        matches!(
            self,
            Self::HttpStatus { .. } | Self::Timeout { .. } | Self::Network { .. }
        )
    }

    /// Returns true if the crawl may continue with the next branch after this error
    ///
    /// Only start-up problems (bad configuration, unbuildable client, bad
    /// selectors) stop the process; everything raised while handling a
    /// single section or article is skipped and logged.
    pub fn is_recoverable(&self) -> bool {
        !matches!(
            self,
            Self::Config(_) | Self::Reqwest(_) | Self::Selector { .. }
        )
    }
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid selector in config: {0}")]
    InvalidSelector(String),
}

/// Result type alias for kb-mirror operations
pub type Result<T> = std::result::Result<T, KbError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{ArticleDraft, ArticleRecord, Crawler};
pub use state::ArticleState;
pub use storage::{ArticleStore, StorageError};
