//! Persisted preference store
//!
//! A minimal string key-value boundary. The production implementation keeps
//! a flat TOML map in the user config directory; the daemon only ever stores
//! the language preference there, but the store itself is key-agnostic.

use std::collections::BTreeMap;
use std::path::PathBuf;

use async_trait::async_trait;

use crate::{Error, Result};

/// Asynchronous string key-value store
#[async_trait]
pub trait PrefStore: Send + Sync {
    /// Read the value for `key`, `None` if never written
    ///
    /// # Errors
    ///
    /// Returns error if the underlying storage cannot be read
    async fn read(&self, key: &str) -> Result<Option<String>>;

    /// Write `value` under `key`, replacing any previous value
    ///
    /// # Errors
    ///
    /// Returns error if the underlying storage cannot be written
    async fn write(&self, key: &str, value: &str) -> Result<()>;
}

/// TOML-file-backed preference store
///
/// The whole store is one small map, rewritten atomically-enough for a
/// single-process daemon on every write. A missing file reads as empty; a
/// corrupt file is logged and treated as empty rather than wedging startup.
pub struct FilePrefStore {
    path: PathBuf,
}

impl FilePrefStore {
    /// Create a store backed by the given file path
    #[must_use]
    pub const fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Default store path: `~/.config/omni/lumen/preferences.toml`
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        directories::BaseDirs::new().map(|d| {
            d.config_dir()
                .join("omni")
                .join("lumen")
                .join("preferences.toml")
        })
    }

    async fn load_map(&self) -> Result<BTreeMap<String, String>> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => return Err(e.into()),
        };

        match toml::from_str(&content) {
            Ok(map) => Ok(map),
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "failed to parse preference file, treating as empty"
                );
                Ok(BTreeMap::new())
            }
        }
    }
}

#[async_trait]
impl PrefStore for FilePrefStore {
    async fn read(&self, key: &str) -> Result<Option<String>> {
        Ok(self.load_map().await?.remove(key))
    }

    async fn write(&self, key: &str, value: &str) -> Result<()> {
        let mut map = self.load_map().await?;
        map.insert(key.to_string(), value.to_string());

        let content =
            toml::to_string(&map).map_err(|e| Error::Store(format!("serialize: {e}")))?;

        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&self.path, content).await?;

        tracing::debug!(key, path = %self.path.display(), "preference written");
        Ok(())
    }
}
