//! Key/value persistence for the high score and settings
//!
//! Mirrors the LocalStorage model: string values under fixed string keys.
//! - `MemoryStore`: in-process, for tests and storage-less hosts
//! - `JsonFileStore`: native, a single JSON object on disk
//! - `LocalStorageStore`: wasm32, browser LocalStorage
//!
//! Nothing in here is allowed to fail the simulation; callers log and fall
//! back to defaults.

use std::collections::BTreeMap;

#[cfg(not(target_arch = "wasm32"))]
mod file;
#[cfg(target_arch = "wasm32")]
mod local_storage;

#[cfg(not(target_arch = "wasm32"))]
pub use file::JsonFileStore;
#[cfg(target_arch = "wasm32")]
pub use local_storage::LocalStorageStore;

/// Adapter-layer failures
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("value under `{key}` is not an integer: {value:?}")]
    NotAnInteger { key: String, value: String },
    #[error("storage unavailable")]
    Unavailable,
}

/// String key/value storage surviving process restarts
pub trait Store {
    fn get_item(&self, key: &str) -> Result<Option<String>, Error>;
    fn set_item(&mut self, key: &str, value: &str) -> Result<(), Error>;

    /// Read an integer value
    fn get_int(&self, key: &str) -> Result<Option<i64>, Error> {
        match self.get_item(key)? {
            Some(value) => value
                .trim()
                .parse()
                .map(Some)
                .map_err(|_| Error::NotAnInteger {
                    key: key.to_string(),
                    value,
                }),
            None => Ok(None),
        }
    }

    /// Write an integer value
    fn set_int(&mut self, key: &str, value: i64) -> Result<(), Error> {
        self.set_item(key, &value.to_string())
    }
}

impl<S: Store + ?Sized> Store for Box<S> {
    fn get_item(&self, key: &str) -> Result<Option<String>, Error> {
        (**self).get_item(key)
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), Error> {
        (**self).set_item(key, value)
    }
}

/// Volatile store
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    items: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Store for MemoryStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, Error> {
        Ok(self.items.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), Error> {
        self.items.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
