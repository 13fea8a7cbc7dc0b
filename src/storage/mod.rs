//! Storage module for the mirrored knowledge base
//!
//! This module owns everything that touches the filesystem:
//! - Mapping breadcrumb paths and titles to filesystem-safe paths
//! - Reading back stored articles for comparison
//! - Atomic article and image writes
//! - Preparing and cleaning the output tree

mod article_store;
mod sanitize;

pub use article_store::{ArticleStore, IMAGE_EXTENSION};
pub use sanitize::{sanitize_component, FORBIDDEN_CHARS};

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Failed to read {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write {path:?}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to create directory {path:?}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to remove {path:?}: {source}")]
    Remove {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to move temp file into {path:?}: {source}")]
    Persist {
        path: PathBuf,
        source: tempfile::PersistError,
    },

    #[error("Path has no parent directory: {0:?}")]
    NoParent(PathBuf),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;
