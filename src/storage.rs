//! Client Storage Module
//!
//! File-per-key persistence under the platform data directory. Holds the
//! session entries that survive restarts.

use std::path::PathBuf;
use serde::{Deserialize, Serialize};
use tracing::{info, error, debug};

/// Durable key/value storage backed by one file per key
pub struct ClientStorage {
    storage_path: PathBuf,
}

impl ClientStorage {
    /// Create storage rooted at the platform data directory
    pub fn new() -> Self {
        let storage_path = dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("RouteGenius");

        Self::at(storage_path)
    }

    /// Create storage rooted at an explicit directory
    pub fn at(storage_path: PathBuf) -> Self {
        if let Err(e) = std::fs::create_dir_all(&storage_path) {
            error!("Failed to create storage directory: {}", e);
        }

        debug!("Client storage initialized at: {:?}", storage_path);

        Self { storage_path }
    }

    /// Save a value as JSON under a key
    pub fn save<T: Serialize>(&self, key: &str, data: &T) -> Result<(), StorageError> {
        let json = serde_json::to_string(data)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;
        self.save_raw(key, &json)
    }

    /// Save a verbatim string under a key
    pub fn save_raw(&self, key: &str, data: &str) -> Result<(), StorageError> {
        let file_path = self.entry_path(key);
        std::fs::write(&file_path, data)
            .map_err(|e| StorageError::Io(e.to_string()))?;

        info!("Saved entry for key: {}", key);
        Ok(())
    }

    /// Load and deserialize the JSON value stored under a key
    pub fn load<T: for<'de> Deserialize<'de>>(&self, key: &str) -> Result<T, StorageError> {
        let json = self.load_raw(key)?;

        serde_json::from_str(&json)
            .map_err(|e| StorageError::Serialization(e.to_string()))
    }

    /// Load the verbatim string stored under a key
    pub fn load_raw(&self, key: &str) -> Result<String, StorageError> {
        let file_path = self.entry_path(key);

        std::fs::read_to_string(&file_path)
            .map_err(|e| StorageError::Io(e.to_string()))
    }

    /// Delete the entry stored under a key
    pub fn delete(&self, key: &str) -> Result<(), StorageError> {
        let file_path = self.entry_path(key);

        if file_path.exists() {
            std::fs::remove_file(&file_path)
                .map_err(|e| StorageError::Io(e.to_string()))?;
            info!("Deleted entry for key: {}", key);
        }

        Ok(())
    }

    /// Check if a key exists
    pub fn exists(&self, key: &str) -> bool {
        self.entry_path(key).exists()
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        self.storage_path.join(format!("{}.dat", key))
    }
}

impl Default for ClientStorage {
    fn default() -> Self {
        Self::new()
    }
}

/// Storage errors
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_storage() -> (tempfile::TempDir, ClientStorage) {
        let dir = tempfile::tempdir().unwrap();
        let storage = ClientStorage::at(dir.path().to_path_buf());
        (dir, storage)
    }

    #[test]
    fn test_json_round_trip() {
        let (_dir, storage) = temp_storage();
        storage.save("numbers", &vec![1, 2, 3]).unwrap();
        let loaded: Vec<i32> = storage.load("numbers").unwrap();
        assert_eq!(loaded, vec![1, 2, 3]);
    }

    #[test]
    fn test_raw_entry_is_stored_verbatim() {
        let (_dir, storage) = temp_storage();
        storage.save_raw("token", "ey.not.json").unwrap();
        assert_eq!(storage.load_raw("token").unwrap(), "ey.not.json");
        // A raw token is not valid JSON and must not load as one
        assert!(matches!(
            storage.load::<String>("token"),
            Err(StorageError::Serialization(_))
        ));
    }

    #[test]
    fn test_missing_key_is_io_error() {
        let (_dir, storage) = temp_storage();
        assert!(!storage.exists("absent"));
        assert!(matches!(
            storage.load_raw("absent"),
            Err(StorageError::Io(_))
        ));
    }

    #[test]
    fn test_delete_is_idempotent() {
        let (_dir, storage) = temp_storage();
        storage.save_raw("user", "{}").unwrap();
        storage.delete("user").unwrap();
        assert!(!storage.exists("user"));
        // Deleting again is not an error
        storage.delete("user").unwrap();
    }
}
