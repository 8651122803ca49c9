//! Browser LocalStorage store (wasm32 only)

use super::{Error, Store};

#[derive(Debug, Clone, Default)]
pub struct LocalStorageStore;

impl LocalStorageStore {
    pub fn new() -> Self {
        Self
    }

    fn storage() -> Result<web_sys::Storage, Error> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .ok_or(Error::Unavailable)
    }
}

impl Store for LocalStorageStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, Error> {
        Self::storage()?
            .get_item(key)
            .map_err(|_| Error::Unavailable)
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), Error> {
        Self::storage()?
            .set_item(key, value)
            .map_err(|_| Error::Unavailable)
    }
}
