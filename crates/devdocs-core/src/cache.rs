//! Byte caches for entry listings, converted documents, and their indexes.
//!
//! Keys are relative, `/`-separated paths:
//!
//! - `<docset>/entries.tsv` holds an Entry Index
//! - `<docset>/<path>.md` holds converted Markdown
//! - `<docset>/<path>.sections` holds its Section Index
//!
//! Nothing expires. A cache is shared across requests behind an `Arc`.

use crate::{Error, Result};
use std::collections::HashMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Component, Path, PathBuf};
use std::sync::Mutex;
use tempfile::NamedTempFile;
use tracing::debug;

/// Key-value store for cached bytes.
pub trait Cache: Send + Sync {
    /// Bytes stored under `key`, or `None` on a miss.
    fn retrieve(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Store `data` under `key`, replacing anything already there.
    fn store(&self, key: &str, data: &[u8]) -> Result<()>;
}

/// Key of a docset's Entry Index.
#[must_use]
pub fn entries_key(docset: &str) -> String {
    format!("{docset}/entries.tsv")
}

/// Key of a converted document.
#[must_use]
pub fn document_key(docset: &str, path: &str) -> String {
    format!("{docset}/{path}.md")
}

/// Key of a converted document's Section Index.
#[must_use]
pub fn sections_key(docset: &str, path: &str) -> String {
    format!("{docset}/{path}.sections")
}

/// Cache that never holds anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCache;

impl Cache for NoCache {
    fn retrieve(&self, _key: &str) -> Result<Option<Vec<u8>>> {
        Ok(None)
    }

    fn store(&self, _key: &str, _data: &[u8]) -> Result<()> {
        Ok(())
    }
}

/// In-process cache.
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryCache {
    /// Empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.lock().map_or(0, |map| map.len())
    }

    /// Whether nothing is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Cache for MemoryCache {
    fn retrieve(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let map = self
            .entries
            .lock()
            .map_err(|_| Error::Cache("memory cache lock poisoned".into()))?;
        Ok(map.get(key).cloned())
    }

    fn store(&self, key: &str, data: &[u8]) -> Result<()> {
        let mut map = self
            .entries
            .lock()
            .map_err(|_| Error::Cache("memory cache lock poisoned".into()))?;
        map.insert(key.to_string(), data.to_vec());
        Ok(())
    }
}

/// Cache of plain files under a root directory.
#[derive(Debug, Clone)]
pub struct FileSystemCache {
    root: PathBuf,
}

impl FileSystemCache {
    /// Cache rooted at `root`. The directory is created on first store.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Default location under the platform cache directory.
    pub fn default_root() -> Result<PathBuf> {
        directories::ProjectDirs::from("io", "devdocs", "devdocs")
            .map(|dirs| dirs.cache_dir().to_path_buf())
            .ok_or_else(|| Error::Cache("Failed to determine cache directory".into()))
    }

    /// File backing `key`. Keys must be relative and may not leave the root.
    fn path_for(&self, key: &str) -> Result<PathBuf> {
        let relative = Path::new(key);
        let valid = !key.is_empty()
            && relative
                .components()
                .all(|c| matches!(c, Component::Normal(_)));
        if !valid {
            return Err(Error::Cache(format!("invalid cache key '{key}'")));
        }
        Ok(self.root.join(relative))
    }
}

impl Cache for FileSystemCache {
    fn retrieve(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let path = self.path_for(key)?;
        match fs::read(&path) {
            Ok(data) => {
                debug!(key, bytes = data.len(), "cache hit");
                Ok(Some(data))
            },
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(key, "cache miss");
                Ok(None)
            },
            Err(e) => Err(Error::Cache(format!(
                "Failed to read {}: {e}",
                path.display()
            ))),
        }
    }

    fn store(&self, key: &str, data: &[u8]) -> Result<()> {
        let path = self.path_for(key)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                Error::Cache(format!("Failed to create {}: {e}", parent.display()))
            })?;
        }

        let dir = path.parent().unwrap_or(&self.root);
        let write_failed =
            |e: io::Error| Error::Cache(format!("Failed to write {}: {e}", path.display()));
        let mut tmp = NamedTempFile::new_in(dir).map_err(write_failed)?;
        tmp.write_all(data).map_err(write_failed)?;
        tmp.persist(&path).map_err(|e| write_failed(e.error))?;
        debug!(key, bytes = data.len(), "cache store");
        Ok(())
    }
}
