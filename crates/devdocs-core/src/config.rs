//! Configuration for the devdocs client.
//!
//! Settings are read from a TOML file and then adjusted by environment
//! variables. A missing file means defaults.
//!
//! ```toml
//! [client]
//! root_url = "https://devdocs.io/"
//! documents_url = "https://documents.devdocs.io/"
//! timeout_secs = 10
//!
//! [cache]
//! enabled = true
//! dir = "/tmp/devdocs-cache"
//!
//! [pager]
//! command = "less -R"
//! ```
//!
//! | Variable                | Overrides              |
//! |-------------------------|------------------------|
//! | `DEVDOCS_URL`           | `client.root_url`      |
//! | `DEVDOCS_DOCUMENTS_URL` | `client.documents_url` |
//! | `DEVDOCS_CACHE_DIR`     | `cache.dir`            |

use crate::client::{ClientOptions, DEFAULT_DOCUMENTS_URL, DEFAULT_ROOT_URL, DEFAULT_TIMEOUT};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Remote endpoints.
    pub client: ClientConfig,
    /// On-disk cache.
    pub cache: CacheConfig,
    /// Pager used by console output.
    pub pager: PagerConfig,
}

/// `[client]` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Aggregator root URL.
    pub root_url: String,
    /// Base URL of document pages.
    pub documents_url: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            root_url: DEFAULT_ROOT_URL.to_string(),
            documents_url: DEFAULT_DOCUMENTS_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT.as_secs(),
        }
    }
}

/// `[cache]` table. `dir` falls back to the platform cache directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Whether results are cached.
    pub enabled: bool,
    /// Cache directory; `None` uses the platform default.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            dir: None,
        }
    }
}

/// `[pager]` table. Without a command the environment decides.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PagerConfig {
    /// Pager command line; `None` falls back to the environment.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
}

impl Config {
    /// Load from `path` when given, else from the default location, then apply
    /// environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => Self::default_path()?,
        };

        let mut config = Self::load_file(&path)?;
        config.apply_overrides(|name| std::env::var(name).ok());
        Ok(config)
    }

    /// Parse one file; a missing file yields defaults.
    pub fn load_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read config: {e}")))?;
        toml::from_str(&content).map_err(|e| Error::Config(format!("Failed to parse config: {e}")))
    }

    /// Write as TOML, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| Error::Config(format!("Failed to create config directory: {e}")))?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {e}")))?;
        fs::write(path, content).map_err(|e| Error::Config(format!("Failed to write config: {e}")))
    }

    /// `config.toml` in the platform config directory.
    pub fn default_path() -> Result<PathBuf> {
        directories::ProjectDirs::from("io", "devdocs", "devdocs")
            .map(|dirs| dirs.config_dir().join("config.toml"))
            .ok_or_else(|| Error::Config("Failed to determine project directories".into()))
    }

    /// Apply overrides from `lookup`; blank values are ignored.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(url) = get("DEVDOCS_URL") {
            self.client.root_url = url;
        }
        if let Some(url) = get("DEVDOCS_DOCUMENTS_URL") {
            self.client.documents_url = url;
        }
        if let Some(dir) = get("DEVDOCS_CACHE_DIR") {
            self.cache.dir = Some(PathBuf::from(dir.trim()));
        }
    }

    /// Options for [`Client::new`](crate::Client::new).
    #[must_use]
    pub fn client_options(&self) -> ClientOptions {
        ClientOptions {
            root_url: self.client.root_url.clone(),
            documents_url: self.client.documents_url.clone(),
            timeout: Duration::from_secs(self.client.timeout_secs),
        }
    }
}
