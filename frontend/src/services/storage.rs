use gloo::storage::{LocalStorage, Storage};

use super::traits::{KeyValueStore, StorageError};

/// [`KeyValueStore`] over the origin's `localStorage`
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalStore;

impl LocalStore {
    /// Whether the page may use `localStorage` at all. Access throws in
    /// sandboxed frames and some private browsing modes.
    pub fn available() -> bool {
        web_sys::window()
            .and_then(|window| window.local_storage().ok().flatten())
            .is_some()
    }

    fn storage() -> Result<web_sys::Storage, StorageError> {
        // `LocalStorage::raw` panics without storage, so check availability first
        if !Self::available() {
            return Err(StorageError::Unavailable);
        }
        Ok(LocalStorage::raw())
    }
}

impl KeyValueStore for LocalStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Self::storage()?
            .get_item(key)
            .map_err(|e| StorageError::Rejected(format!("{:?}", e)))
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        Self::storage()?
            .set_item(key, value)
            .map_err(|e| StorageError::Rejected(format!("{:?}", e)))
    }
}
