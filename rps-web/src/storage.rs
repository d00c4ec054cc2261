//! `localStorage` backend for the engagement store.
use crate::dom;
use crate::error::WebError;
use rps_game::KeyValueBackend;
use web_sys::Storage;

/// Browser storage. When `localStorage` is blocked every read is empty and every write fails,
/// which the store treats as "nothing persisted".
pub struct LocalStorageBackend {
    storage: Option<Storage>,
}

impl LocalStorageBackend {
    #[must_use]
    pub fn open() -> Self {
        let storage = match dom::local_storage() {
            Ok(storage) => Some(storage),
            Err(err) => {
                log::warn!("persistence disabled: {err}");
                None
            }
        };
        Self { storage }
    }

    fn storage(&self) -> Result<&Storage, WebError> {
        self.storage.as_ref().ok_or(WebError::StorageUnavailable)
    }
}

impl KeyValueBackend for LocalStorageBackend {
    type Error = WebError;

    fn get(&self, key: &str) -> Option<String> {
        self.storage.as_ref()?.get_item(key).ok().flatten()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), Self::Error> {
        self.storage()?.set_item(key, value)?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), Self::Error> {
        self.storage()?.remove_item(key)?;
        Ok(())
    }
}
