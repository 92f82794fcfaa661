mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use std::path::PathBuf;

use crate::config::HexaflixConfig;
use crate::error::{HexaflixError, Result};

/// Small key-value capability the profile state persists through. Values
/// are JSON documents stored as strings.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
}

/// Enum wrapper for store backends. Dispatches to the concrete implementation.
pub enum Store {
    File(FileStore),
    Memory(MemoryStore),
}

impl KeyValueStore for Store {
    fn get(&self, key: &str) -> Result<Option<String>> {
        match self {
            Store::File(s) => s.get(key),
            Store::Memory(s) => s.get(key),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        match self {
            Store::File(s) => s.set(key, value),
            Store::Memory(s) => s.set(key, value),
        }
    }

    fn remove(&self, key: &str) -> Result<()> {
        match self {
            Store::File(s) => s.remove(key),
            Store::Memory(s) => s.remove(key),
        }
    }
}

/// Create a store backend from the given configuration.
pub fn create_store(config: &HexaflixConfig) -> Result<Store> {
    match config.storage.backend.as_str() {
        "file" => {
            let path = match &config.storage.path {
                Some(p) => PathBuf::from(p),
                None => default_store_path()?,
            };
            Ok(Store::File(FileStore::open(&path)?))
        }
        "memory" => Ok(Store::Memory(MemoryStore::new())),
        other => Err(HexaflixError::Config(format!(
            "unknown storage backend: {other}"
        ))),
    }
}

/// Default profile path: `~/.config/hexaflix/profile.json`
fn default_store_path() -> Result<PathBuf> {
    dirs::config_dir()
        .map(|p| p.join("hexaflix").join("profile.json"))
        .ok_or_else(|| HexaflixError::Config("cannot determine config directory".to_string()))
}
