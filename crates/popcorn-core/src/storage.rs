//! Durable storage for the watched list.
//!
//! [`PersistenceStore`] reads and writes the whole collection as one JSON
//! array under a fixed key. The key/value layer underneath is a
//! [`StorageBackend`] so the runtime can be given an in-memory backend.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::error::PopcornError;
use crate::models::WatchedEntry;

/// Key the watched list is stored under unless configured otherwise.
pub const WATCHED_KEY: &str = "watched";

/// Raw string key/value storage.
pub trait StorageBackend: Send + Sync {
    /// Read the value for `key`, `None` if nothing was ever written.
    fn read(&self, key: &str) -> Result<Option<String>, PopcornError>;

    /// Replace the value for `key`.
    fn write(&self, key: &str, value: &str) -> Result<(), PopcornError>;
}

/// One `<key>.json` file per key inside a directory.
pub struct FileBackend {
    dir: PathBuf,
}

impl FileBackend {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl StorageBackend for FileBackend {
    fn read(&self, key: &str) -> Result<Option<String>, PopcornError> {
        match std::fs::read_to_string(self.path_for(key)) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&self, key: &str, value: &str) -> Result<(), PopcornError> {
        std::fs::create_dir_all(&self.dir)?;
        std::fs::write(self.path_for(key), value)?;
        Ok(())
    }
}

/// Process-local backend. Contents are lost on drop.
#[derive(Default)]
pub struct MemoryBackend {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Backend pre-seeded with one raw value.
    pub fn with_value(key: &str, value: &str) -> Self {
        let backend = Self::new();
        backend
            .values
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(key.to_string(), value.to_string());
        backend
    }
}

impl StorageBackend for MemoryBackend {
    fn read(&self, key: &str) -> Result<Option<String>, PopcornError> {
        let values = self.values.lock().unwrap_or_else(|e| e.into_inner());
        Ok(values.get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<(), PopcornError> {
        let mut values = self.values.lock().unwrap_or_else(|e| e.into_inner());
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Whole-collection load/save of watched entries.
///
/// Never fails towards the caller: unreadable or corrupt content loads as an
/// empty list, and failed writes are logged and dropped.
pub struct PersistenceStore {
    backend: Box<dyn StorageBackend>,
    key: String,
}

impl PersistenceStore {
    pub fn new(backend: impl StorageBackend + 'static) -> Self {
        Self::with_key(backend, WATCHED_KEY)
    }

    pub fn with_key(backend: impl StorageBackend + 'static, key: &str) -> Self {
        Self {
            backend: Box::new(backend),
            key: key.to_string(),
        }
    }

    /// In-memory store, for tests and embedders without a data directory.
    pub fn memory() -> Self {
        Self::new(MemoryBackend::new())
    }

    pub fn load(&self) -> Vec<WatchedEntry> {
        let raw = match self.backend.read(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                tracing::warn!(key = %self.key, "Failed to read watched list: {e}");
                return Vec::new();
            }
        };

        match serde_json::from_str(&raw) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!(key = %self.key, "Discarding unparsable watched list: {e}");
                Vec::new()
            }
        }
    }

    pub fn save(&self, entries: &[WatchedEntry]) {
        let json = match serde_json::to_string(entries) {
            Ok(json) => json,
            Err(e) => {
                tracing::warn!(key = %self.key, "Failed to serialize watched list: {e}");
                return;
            }
        };

        if let Err(e) = self.backend.write(&self.key, &json) {
            tracing::warn!(key = %self.key, "Failed to save watched list: {e}");
        }
    }
}
