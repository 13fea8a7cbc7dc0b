//! Configuration module for kb-mirror
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use kb_mirror::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("kb-mirror.toml")).unwrap();
//! println!("Mirroring {} into {}", config.site.base_url, config.output.root_dir);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, CrawlerConfig, OutputConfig, SelectorConfig, SiteConfig};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash};
pub use validation::{validate, validate_session_id};
