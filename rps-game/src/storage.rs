//! Durable key/value persistence with typed, fail-soft accessors.
//!
//! [`KeyValueBackend`] is the raw string store (browser `localStorage` in production,
//! [`MemoryBackend`] in tests). [`PersistenceStore`] wraps it and is the only way the rest of
//! the crate reads or writes durable state: malformed values read back as absent, and failed
//! writes are logged rather than propagated.

use crate::clock::Timestamp;
use crate::config::StorageKeys;
use crate::score::Tally;
use crate::theme::Theme;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;
use std::time::Duration;
use thiserror::Error;

/// Raw string storage local to the browsing context.
pub trait KeyValueBackend {
    type Error: std::error::Error + 'static;

    fn get(&self, key: &str) -> Option<String>;

    /// Store `value` under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend refuses the write (quota, private mode, ...).
    fn set(&mut self, key: &str, value: &str) -> Result<(), Self::Error>;

    /// Delete `key` if present.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend refuses the removal.
    fn remove(&mut self, key: &str) -> Result<(), Self::Error>;
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StorageError {
    #[error("storage rejected write to `{key}`")]
    WriteRejected { key: String },
}

/// In-memory backend. Clones share the same map, so a "reload" can hand the
/// same contents to a fresh store.
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    entries: Rc<RefCell<HashMap<String, String>>>,
    reject_writes: Rc<Cell<bool>>,
}

impl MemoryBackend {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent `set`/`remove` fail, like a full or disabled `localStorage`.
    pub fn reject_writes(&self, reject: bool) {
        self.reject_writes.set(reject);
    }

    /// Seed a raw value, bypassing the typed layer.
    pub fn insert_raw(&self, key: &str, value: &str) {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
    }

    #[must_use]
    pub fn raw(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    pub fn clear(&self) {
        self.entries.borrow_mut().clear();
    }
}

impl KeyValueBackend for MemoryBackend {
    type Error = StorageError;

    fn get(&self, key: &str) -> Option<String> {
        self.raw(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), Self::Error> {
        if self.reject_writes.get() {
            return Err(StorageError::WriteRejected {
                key: key.to_string(),
            });
        }
        self.insert_raw(key, value);
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), Self::Error> {
        if self.reject_writes.get() {
            return Err(StorageError::WriteRejected {
                key: key.to_string(),
            });
        }
        self.entries.borrow_mut().remove(key);
        Ok(())
    }
}

/// The moment the user declined the install banner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DismissalRecord {
    pub dismissed_at: Timestamp,
}

impl DismissalRecord {
    #[must_use]
    pub fn expires_at(&self, cooldown: Duration) -> Timestamp {
        self.dismissed_at.saturating_add(cooldown)
    }

    /// Whether the banner is still suppressed at `now`.
    #[must_use]
    pub fn suppresses(&self, now: Timestamp, cooldown: Duration) -> bool {
        now < self.expires_at(cooldown)
    }
}

/// Typed façade over a [`KeyValueBackend`].
#[derive(Debug)]
pub struct PersistenceStore<B> {
    backend: B,
    keys: StorageKeys,
}

impl<B: KeyValueBackend> PersistenceStore<B> {
    pub const fn new(backend: B, keys: StorageKeys) -> Self {
        Self { backend, keys }
    }

    pub const fn backend(&self) -> &B {
        &self.backend
    }

    pub fn into_backend(self) -> B {
        self.backend
    }

    #[must_use]
    pub fn dismissal(&self) -> Option<DismissalRecord> {
        let raw = self.backend.get(&self.keys.dismissal)?;
        match Timestamp::parse_millis(&raw) {
            Some(dismissed_at) => Some(DismissalRecord { dismissed_at }),
            None => {
                log::warn!("ignoring malformed dismissal timestamp {raw:?}");
                None
            }
        }
    }

    /// Persist a dismissal at `at`. Returns whether the write reached the backend.
    pub fn record_dismissal(&mut self, at: Timestamp) -> bool {
        let key = self.keys.dismissal.clone();
        self.write(&key, &at.to_string())
    }

    /// Forget any dismissal. Returns whether the removal reached the backend.
    pub fn clear_dismissal(&mut self) -> bool {
        if let Err(err) = self.backend.remove(&self.keys.dismissal) {
            log::warn!("could not clear dismissal: {err}");
            return false;
        }
        true
    }

    #[must_use]
    pub fn theme(&self) -> Option<Theme> {
        let raw = self.backend.get(&self.keys.theme)?;
        match raw.parse() {
            Ok(theme) => Some(theme),
            Err(err) => {
                log::warn!("ignoring stored theme: {err}");
                None
            }
        }
    }

    pub fn store_theme(&mut self, theme: Theme) -> bool {
        let key = self.keys.theme.clone();
        self.write(&key, theme.as_str())
    }

    /// Lifetime counters; zero when absent or unreadable.
    ///
    /// A JSON object with a bad counter keeps its good ones: out-of-range counters clamp to
    /// `u32::MAX` and non-numeric ones read as zero.
    #[must_use]
    pub fn all_time(&self) -> Tally {
        let Some(raw) = self.backend.get(&self.keys.all_time) else {
            return Tally::default();
        };
        match serde_json::from_str(&raw) {
            Ok(tally) => tally,
            Err(err) => {
                log::warn!("recovering malformed all-time scores {raw:?}: {err}");
                recover_tally(&raw)
            }
        }
    }

    pub fn store_all_time(&mut self, tally: &Tally) -> bool {
        let Ok(encoded) = serde_json::to_string(tally) else {
            return false;
        };
        let key = self.keys.all_time.clone();
        self.write(&key, &encoded)
    }

    fn write(&mut self, key: &str, value: &str) -> bool {
        match self.backend.set(key, value) {
            Ok(()) => true,
            Err(err) => {
                log::warn!("persisting `{key}` failed: {err}");
                false
            }
        }
    }
}

fn recover_tally(raw: &str) -> Tally {
    let Ok(serde_json::Value::Object(fields)) = serde_json::from_str(raw) else {
        return Tally::default();
    };
    let counter = |name: &str| {
        fields
            .get(name)
            .and_then(serde_json::Value::as_u64)
            .map_or(0, |n| u32::try_from(n).unwrap_or(u32::MAX))
    };
    Tally {
        wins: counter("wins"),
        losses: counter("losses"),
        draws: counter("draws"),
    }
}
