//! Session persistence collaborator.
//!
//! The cart snapshot is serialized to durable local storage under a fixed
//! namespace key and restored on load. The [`SessionStore`] trait keeps the
//! backend swappable: production uses [`JsonFileStore`], tests use
//! [`MemoryStore`].

use std::collections::HashMap;
use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur when reading or writing session storage.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Filesystem error.
    #[error("io error: {0}")]
    Io(String),
}

/// Durable key-value storage for session state.
pub trait SessionStore {
    /// Read the value stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read.
    fn load(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be written.
    fn save(&mut self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove the value stored under `key`; absent keys are not an error.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be written.
    fn clear(&mut self, key: &str) -> Result<(), StorageError>;
}

/// File-backed session store: each key becomes `<dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    /// Create a store rooted at `dir`. The directory is created on first
    /// write, not here.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl SessionStore for JsonFileStore {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        match std::fs::read_to_string(self.path_for(key)) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::Io(e.to_string())),
        }
    }

    fn save(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        std::fs::create_dir_all(&self.dir).map_err(|e| StorageError::Io(e.to_string()))?;
        std::fs::write(self.path_for(key), value).map_err(|e| StorageError::Io(e.to_string()))
    }

    fn clear(&mut self, key: &str) -> Result<(), StorageError> {
        match std::fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::Io(e.to_string())),
        }
    }
}

/// In-memory session store for tests and ephemeral sessions.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw access to the stored value, for assertions.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }
}

impl SessionStore for MemoryStore {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.values.get(key).cloned())
    }

    fn save(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.values.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn clear(&mut self, key: &str) -> Result<(), StorageError> {
        self.values.remove(key);
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_roundtrip() {
        let mut store = MemoryStore::new();
        assert_eq!(store.load("cart-storage").unwrap(), None);

        store.save("cart-storage", "{\"items\":[]}").unwrap();
        assert_eq!(
            store.load("cart-storage").unwrap().as_deref(),
            Some("{\"items\":[]}")
        );

        store.clear("cart-storage").unwrap();
        assert_eq!(store.load("cart-storage").unwrap(), None);
        // Clearing an absent key is a no-op.
        store.clear("cart-storage").unwrap();
    }

    #[test]
    fn test_file_store_roundtrip() {
        let dir = std::env::temp_dir().join(format!(
            "organic-oils-storage-test-{}",
            std::process::id()
        ));
        let _ = std::fs::remove_dir_all(&dir);

        let mut store = JsonFileStore::new(&dir);
        assert_eq!(store.load("cart-storage").unwrap(), None);

        store.save("cart-storage", "{\"items\":[]}").unwrap();
        assert_eq!(
            store.load("cart-storage").unwrap().as_deref(),
            Some("{\"items\":[]}")
        );

        store.clear("cart-storage").unwrap();
        assert_eq!(store.load("cart-storage").unwrap(), None);

        let _ = std::fs::remove_dir_all(&dir);
    }
}
