use std::collections::HashMap;
use std::sync::Mutex;

use crate::error::{HexaflixError, Result};
use crate::store::KeyValueStore;

/// In-process store for tests and ephemeral runs. Nothing survives the
/// process.
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let entries = self
            .entries
            .lock()
            .map_err(|e| HexaflixError::Storage(format!("failed to acquire store lock: {e}")))?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|e| HexaflixError::Storage(format!("failed to acquire store lock: {e}")))?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|e| HexaflixError::Storage(format!("failed to acquire store lock: {e}")))?;
        entries.remove(key);
        Ok(())
    }
}
