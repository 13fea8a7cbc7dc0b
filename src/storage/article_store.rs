//! Filesystem layout of the mirror
//!
//! ```text
//! <root>/<database>/<section>/<category>/<title>.txt
//! <root>/<images-dir>/<title>-<n>.jpg
//! ```

use crate::config::OutputConfig;
use crate::crawler::Breadcrumb;
use crate::storage::sanitize::sanitize_component;
use crate::storage::{StorageError, StorageResult};
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Extension used for every stored image, whatever the source format
pub const IMAGE_EXTENSION: &str = "jpg";

/// Maps articles and images to paths under the mirror root
#[derive(Debug, Clone)]
pub struct ArticleStore {
    root: PathBuf,
    images_dir: PathBuf,
}

impl ArticleStore {
    /// Creates a store rooted at `root` with images in `root/<images_dir_name>`
    pub fn new(root: impl Into<PathBuf>, images_dir_name: &str) -> Self {
        let root = root.into();
        let images_dir = root.join(images_dir_name.trim());
        Self { root, images_dir }
    }

    pub fn from_config(config: &OutputConfig) -> Self {
        Self::new(&config.root_dir, &config.images_dir)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn images_dir(&self) -> &Path {
        &self.images_dir
    }

    /// Creates the root and image directories if they do not exist
    pub fn prepare(&self) -> StorageResult<()> {
        create_dir_all(&self.root)?;
        create_dir_all(&self.images_dir)
    }

    /// Removes the whole mirror and recreates an empty tree
    pub fn clean(&self) -> StorageResult<()> {
        match fs::remove_dir_all(&self.root) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(source) => {
                return Err(StorageError::Remove {
                    path: self.root.clone(),
                    source,
                })
            }
        }
        tracing::info!("Cleaned output directory {}", self.root.display());
        self.prepare()
    }

    /// Path of the text file for an article
    pub fn article_path(&self, breadcrumb: &Breadcrumb, title: &str) -> PathBuf {
        let mut path = self.root.clone();
        for segment in breadcrumb.segments() {
            path.push(sanitize_component(segment));
        }
        path.push(format!("{}.txt", sanitize_component(title)));
        path
    }

    /// Path of the `ordinal`-th image of an article
    pub fn image_path(&self, title: &str, ordinal: u32) -> PathBuf {
        self.images_dir.join(format!(
            "{}-{}.{}",
            sanitize_component(title),
            ordinal,
            IMAGE_EXTENSION
        ))
    }

    pub fn image_exists(&self, title: &str, ordinal: u32) -> bool {
        self.image_path(title, ordinal).is_file()
    }

    /// Reads a stored article
    ///
    /// # Returns
    ///
    /// * `Ok(Some(String))` - The stored text
    /// * `Ok(None)` - No file at this path
    /// * `Err(StorageError)` - The file exists but could not be read
    pub fn read_article(&self, path: &Path) -> StorageResult<Option<String>> {
        match fs::read_to_string(path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StorageError::Read {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    /// Writes an article, creating the breadcrumb directories as needed
    pub fn write_article(&self, path: &Path, content: &str) -> StorageResult<()> {
        write_atomic(path, content.as_bytes())
    }

    /// Writes the `ordinal`-th image of an article and returns its path
    pub fn write_image(&self, title: &str, ordinal: u32, bytes: &[u8]) -> StorageResult<PathBuf> {
        let path = self.image_path(title, ordinal);
        write_atomic(&path, bytes)?;
        Ok(path)
    }
}

/// Writes through a temp file in the target directory, then renames it into place
///
/// Readers see either the previous file or the complete new one.
fn write_atomic(path: &Path, bytes: &[u8]) -> StorageResult<()> {
    let parent = path
        .parent()
        .ok_or_else(|| StorageError::NoParent(path.to_path_buf()))?;
    create_dir_all(parent)?;

    let write_err = |source| StorageError::Write {
        path: path.to_path_buf(),
        source,
    };

    let mut temp_file = NamedTempFile::new_in(parent).map_err(write_err)?;
    temp_file.write_all(bytes).map_err(write_err)?;
    temp_file.flush().map_err(write_err)?;

    temp_file.persist(path).map_err(|source| StorageError::Persist {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(())
}

fn create_dir_all(path: &Path) -> StorageResult<()> {
    fs::create_dir_all(path).map_err(|source| StorageError::CreateDir {
        path: path.to_path_buf(),
        source,
    })
}
