use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::error::{HexaflixError, Result};
use crate::store::KeyValueStore;

/// File-backed store: one JSON document holding every key, rewritten in
/// full on each mutation. Writers within a process are serialized by the
/// inner mutex; there is no cross-process locking, so concurrent processes
/// can race each other.
pub struct FileStore {
    entries: Mutex<HashMap<String, String>>,
    path: PathBuf,
}

impl FileStore {
    /// Open (or create) the store at `path`, creating parent directories
    /// as needed.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                HexaflixError::Storage(format!(
                    "failed to create store directory {}: {e}",
                    parent.display()
                ))
            })?;
        }

        let entries = if path.exists() {
            let raw = std::fs::read_to_string(&path).map_err(|e| {
                HexaflixError::Storage(format!("failed to read {}: {e}", path.display()))
            })?;
            if raw.trim().is_empty() {
                HashMap::new()
            } else {
                serde_json::from_str(&raw).map_err(|e| {
                    HexaflixError::Storage(format!("corrupt store at {}: {e}", path.display()))
                })?
            }
        } else {
            HashMap::new()
        };

        Ok(Self {
            entries: Mutex::new(entries),
            path,
        })
    }

    /// Return the path this store was opened with.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Persist the whole document. Write failures are fatal to the mutation
    /// that triggered them.
    fn flush(&self, entries: &HashMap<String, String>) -> Result<()> {
        let raw = serde_json::to_string_pretty(entries)?;
        std::fs::write(&self.path, raw).map_err(|e| {
            HexaflixError::Storage(format!("failed to write {}: {e}", self.path.display()))
        })
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, String>>> {
        self.entries
            .lock()
            .map_err(|e| HexaflixError::Storage(format!("failed to acquire store lock: {e}")))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.lock()?;
        entries.insert(key.to_string(), value.to_string());
        self.flush(&entries)
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut entries = self.lock()?;
        if entries.remove(key).is_some() {
            self.flush(&entries)?;
        }
        Ok(())
    }
}
