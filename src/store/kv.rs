//! String-keyed document storage
//!
//! The store is encoding-agnostic: values are opaque strings, and callers
//! own parsing and serialization. `FileStore` keeps one file per key under
//! a data directory; `MemoryStore` backs tests and any caller that wants a
//! throwaway store.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use thiserror::Error;

/// Storage error types
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Storage I/O failed for key '{key}': {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid storage key '{0}'")]
    InvalidKey(String),
}

/// Durable string-keyed persistence.
///
/// `get` returns the previously stored value, or `None` if the key was
/// never written. `set` overwrites; each write is independent (no
/// cross-key transaction).
pub trait KeyValue {
    fn get(&self, key: &str) -> impl std::future::Future<Output = Result<Option<String>, StoreError>> + Send;
    fn set(&self, key: &str, value: &str) -> impl std::future::Future<Output = Result<(), StoreError>> + Send;
}

// =============================================================================
// File-backed store
// =============================================================================

/// One file per key under a data directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StoreError> {
        // Keys are logical names, not paths
        if key.is_empty() || key.contains(['/', '\\', '.']) {
            return Err(StoreError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(format!("{}.json", key)))
    }
}

impl KeyValue for FileStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let path = self.path_for(key)?;
        match tokio::fs::read_to_string(&path).await {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::Io {
                key: key.to_string(),
                source: e,
            }),
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let path = self.path_for(key)?;
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| StoreError::Io {
                    key: key.to_string(),
                    source: e,
                })?;
        }
        tokio::fs::write(&path, value)
            .await
            .map_err(|e| StoreError::Io {
                key: key.to_string(),
                source: e,
            })
    }
}

// =============================================================================
// In-memory store
// =============================================================================

/// HashMap-backed store for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryStore {
    map: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-seed a key, bypassing the async interface (test setup)
    pub fn seed(&self, key: &str, value: &str) {
        self.map
            .lock()
            .expect("memory store lock poisoned")
            .insert(key.to_string(), value.to_string());
    }

    /// Raw snapshot of a key (test inspection)
    pub fn raw(&self, key: &str) -> Option<String> {
        self.map
            .lock()
            .expect("memory store lock poisoned")
            .get(key)
            .cloned()
    }
}

impl KeyValue for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self
            .map
            .lock()
            .expect("memory store lock poisoned")
            .get(key)
            .cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.map
            .lock()
            .expect("memory store lock poisoned")
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Default data directory for the file store (~/.local/share/reeltui)
pub fn default_data_dir() -> Option<PathBuf> {
    dirs::data_dir().map(|p| p.join("reeltui"))
}

/// Build a file store rooted at `dir`, or at the default data dir
pub fn file_store_at(dir: Option<&Path>) -> anyhow::Result<FileStore> {
    let dir = match dir {
        Some(d) => d.to_path_buf(),
        None => default_data_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?,
    };
    Ok(FileStore::new(dir))
}
