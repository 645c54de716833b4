//! Local key-value persistence, the stand-in for browser local storage.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::debug;

use storefront_core::{AppError, AppResult};

/// Synchronous key-value persistence for client state.
///
/// Mutations are synchronous and immediately durable; there is no
/// concurrency protocol beyond the store's own lock.
pub trait LocalStore: Send + Sync {
    /// Read the value stored under `key`.
    fn get(&self, key: &str) -> AppResult<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    fn put(&self, key: &str, value: &str) -> AppResult<()>;

    /// Remove the value stored under `key`, if any.
    fn remove(&self, key: &str) -> AppResult<()>;
}

/// JSON-file-backed store.
///
/// The whole map is rewritten on every mutation; the data volumes here
/// (a cart and two tokens) make that a non-issue.
#[derive(Debug)]
pub struct FileStore {
    /// Backing file path.
    path: PathBuf,
    /// In-memory copy of the file contents.
    entries: Mutex<BTreeMap<String, String>>,
}

impl FileStore {
    /// Open a store, loading existing contents if the file is present.
    ///
    /// A file that exists but cannot be parsed is treated as empty rather
    /// than erroring: client state is best-effort and re-creatable.
    pub fn open(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref().to_path_buf();
        let entries = match std::fs::read_to_string(&path) {
            Ok(raw) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                debug!("Discarding unreadable local store {}: {}", path.display(), e);
                BTreeMap::new()
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };
        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    /// Write the current map back to disk.
    fn flush(&self, entries: &BTreeMap<String, String>) -> AppResult<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let raw = serde_json::to_string_pretty(entries)?;
        std::fs::write(&self.path, raw)?;
        Ok(())
    }

    /// Lock the entry map.
    fn lock(&self) -> AppResult<std::sync::MutexGuard<'_, BTreeMap<String, String>>> {
        self.entries
            .lock()
            .map_err(|_| AppError::storage("Local store lock poisoned"))
    }
}

impl LocalStore for FileStore {
    fn get(&self, key: &str) -> AppResult<Option<String>> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn put(&self, key: &str, value: &str) -> AppResult<()> {
        let mut entries = self.lock()?;
        entries.insert(key.to_string(), value.to_string());
        self.flush(&entries)
    }

    fn remove(&self, key: &str) -> AppResult<()> {
        let mut entries = self.lock()?;
        if entries.remove(key).is_some() {
            self.flush(&entries)?;
        }
        Ok(())
    }
}

/// Purely in-memory store for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryStore {
    /// Entry map.
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl LocalStore for MemoryStore {
    fn get(&self, key: &str) -> AppResult<Option<String>> {
        Ok(self
            .entries
            .lock()
            .map_err(|_| AppError::storage("Local store lock poisoned"))?
            .get(key)
            .cloned())
    }

    fn put(&self, key: &str, value: &str) -> AppResult<()> {
        self.entries
            .lock()
            .map_err(|_| AppError::storage("Local store lock poisoned"))?
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> AppResult<()> {
        self.entries
            .lock()
            .map_err(|_| AppError::storage("Local store lock poisoned"))?
            .remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("storefront-store-{}-{}", std::process::id(), name))
    }

    #[test]
    fn test_file_store_round_trip() {
        let path = temp_path("roundtrip.json");
        let _ = std::fs::remove_file(&path);

        let store = FileStore::open(&path).unwrap();
        store.put("cart", "[]").unwrap();
        assert_eq!(store.get("cart").unwrap(), Some("[]".to_string()));

        // A fresh handle sees the persisted value.
        let reopened = FileStore::open(&path).unwrap();
        assert_eq!(reopened.get("cart").unwrap(), Some("[]".to_string()));

        reopened.remove("cart").unwrap();
        assert_eq!(reopened.get("cart").unwrap(), None);

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_file_store_tolerates_garbage() {
        let path = temp_path("garbage.json");
        std::fs::write(&path, "not json at all").unwrap();

        let store = FileStore::open(&path).unwrap();
        assert_eq!(store.get("anything").unwrap(), None);

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_memory_store() {
        let store = MemoryStore::new();
        store.put("k", "v").unwrap();
        assert_eq!(store.get("k").unwrap(), Some("v".to_string()));
        store.remove("k").unwrap();
        assert_eq!(store.get("k").unwrap(), None);
    }
}
