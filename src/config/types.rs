use serde::Deserialize;

/// Main configuration structure for kb-mirror
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub site: SiteConfig,
    #[serde(default)]
    pub crawler: CrawlerConfig,
    pub output: OutputConfig,
    #[serde(default)]
    pub selectors: SelectorConfig,
}

/// Where the knowledge base lives and how to authenticate against it
#[derive(Debug, Clone, Deserialize)]
pub struct SiteConfig {
    /// Base address used to resolve every relative href
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Page listing the top-level sections (defaults to the base address)
    #[serde(rename = "catalog-url", default)]
    pub catalog_url: Option<String>,

    /// Name of the session cookie
    #[serde(rename = "cookie-name", default = "default_cookie_name")]
    pub cookie_name: String,

    /// Session token value; may be supplied on the command line instead
    #[serde(rename = "session-id", default)]
    pub session_id: Option<String>,
}

impl SiteConfig {
    /// Returns the catalog root, falling back to the base address
    pub fn catalog_url(&self) -> &str {
        self.catalog_url.as_deref().unwrap_or(&self.base_url)
    }
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Per-request timeout (seconds)
    #[serde(rename = "request-timeout-secs", default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Pause between two categories (milliseconds)
    #[serde(rename = "category-delay-ms", default = "default_category_delay")]
    pub category_delay_ms: u64,

    /// User-Agent header sent with every request
    #[serde(rename = "user-agent", default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: default_request_timeout(),
            category_delay_ms: default_category_delay(),
            user_agent: default_user_agent(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Root directory of the mirrored tree
    #[serde(rename = "root-dir")]
    pub root_dir: String,

    /// Name of the image directory inside the root
    #[serde(rename = "images-dir", default = "default_images_dir")]
    pub images_dir: String,

    /// Optional append-only log file
    #[serde(rename = "log-file", default)]
    pub log_file: Option<String>,
}

/// CSS selectors describing the knowledge-base markup
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SelectorConfig {
    #[serde(rename = "section-link")]
    pub section_link: String,

    #[serde(rename = "section-block")]
    pub section_block: String,

    #[serde(rename = "category-link")]
    pub category_link: String,

    #[serde(rename = "article-link")]
    pub article_link: String,

    #[serde(rename = "load-more")]
    pub load_more: String,

    #[serde(rename = "offset-field")]
    pub offset_field: String,

    pub breadcrumb: String,

    pub title: String,

    pub content: String,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            section_link: "a.kb-title-link".to_string(),
            section_block: "div.knowBaze".to_string(),
            category_link: "a.knowBaze_section_elem".to_string(),
            article_link: "a.kb-artile-list__item".to_string(),
            load_more: r#"a.btn.btn--gray[onclick*="showMoreKnowledge"]"#.to_string(),
            offset_field: r#"input[name="offset_knowledge"]"#.to_string(),
            breadcrumb: "li.breadcrumbs__item".to_string(),
            title: "h1.kb-article-title".to_string(),
            content: "div.kb-article-content".to_string(),
        }
    }
}

fn default_cookie_name() -> String {
    "PHPSESSID".to_string()
}

fn default_request_timeout() -> u64 {
    10
}

fn default_category_delay() -> u64 {
    1000
}

fn default_user_agent() -> String {
    format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
}

fn default_images_dir() -> String {
    "images".to_string()
}
