//! Persistence seam for the palette.
//!
//! [`KeyValueStore`] is the blob store the palette writes through (SQLite in
//! the binary, [`MemoryStore`] in tests and as an ephemeral fallback).
//! [`ListStore`] layers bounded, ordered color lists on top of it: every list
//! is a JSON array of canonical hex strings stored under its own key.

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};
use std::fmt;

use thiserror::Error;
use tracing::warn;

use crate::color::{self, ColorValue};

/// Maximum entries kept in the generated-history list.
pub const GENERATED_HISTORY_CAPACITY: usize = 15;
/// Maximum entries kept in the deleted-history list.
pub const DELETED_HISTORY_CAPACITY: usize = 10;

/// Errors surfaced by the persistence layer.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The stored blob is not a JSON array of strings.
    #[error("stored list {key:?} is corrupt: {source}")]
    Corrupt {
        key: String,
        #[source]
        source: serde_json::Error,
    },
    /// The backend could not be read or written.
    #[error("storage unavailable: {0}")]
    Unavailable(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        StoreError::Unavailable(Box::new(err))
    }
}

/// A string-keyed blob store. Writes replace the previous blob entirely.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Box<T> {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).set(key, value)
    }
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for &T {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).set(key, value)
    }
}

/// Process-local store. Nothing survives the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RefCell<HashMap<String, String>>,
    unavailable: Cell<bool>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulates a backend outage: every read and write fails while set.
    #[cfg(test)]
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.set(unavailable);
    }

    fn check_available(&self) -> Result<(), StoreError> {
        if self.unavailable.get() {
            return Err(StoreError::Unavailable("memory store switched off".into()));
        }
        Ok(())
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.check_available()?;
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.check_available()?;
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// The three persisted color lists.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ListKind {
    Saved,
    GeneratedHistory,
    DeletedHistory,
}

impl ListKind {
    /// Storage key of the list's blob.
    pub fn key(self) -> &'static str {
        match self {
            ListKind::Saved => "saved_colors",
            ListKind::GeneratedHistory => "generated_history",
            ListKind::DeletedHistory => "deleted_history",
        }
    }

    /// `None` means unbounded.
    pub fn capacity(self) -> Option<usize> {
        match self {
            ListKind::Saved => None,
            ListKind::GeneratedHistory => Some(GENERATED_HISTORY_CAPACITY),
            ListKind::DeletedHistory => Some(DELETED_HISTORY_CAPACITY),
        }
    }
}

impl fmt::Display for ListKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Bounded, ordered color lists persisted through a [`KeyValueStore`].
pub struct ListStore<S> {
    backend: S,
}

impl<S: KeyValueStore> ListStore<S> {
    pub fn new(backend: S) -> Self {
        Self { backend }
    }

    #[cfg(test)]
    pub fn backend(&self) -> &S {
        &self.backend
    }

    /// Reads the list under `key`. A missing key is an empty list.
    ///
    /// Entries that are not colors are dropped and duplicates collapse onto
    /// their first occurrence, so the result always holds unique colors.
    pub fn try_load(&self, key: &str) -> Result<Vec<ColorValue>, StoreError> {
        let Some(blob) = self.backend.get(key)? else {
            return Ok(Vec::new());
        };
        let raw: Vec<String> =
            serde_json::from_str(&blob).map_err(|source| StoreError::Corrupt {
                key: key.to_string(),
                source,
            })?;

        let mut seen = HashSet::new();
        let mut colors = Vec::with_capacity(raw.len());
        for entry in raw {
            match color::normalize(&entry) {
                Ok(color) => {
                    if seen.insert(color) {
                        colors.push(color);
                    }
                }
                Err(err) => warn!(key, error = %err, "dropping stored entry"),
            }
        }
        Ok(colors)
    }

    /// Fail-soft variant of [`ListStore::try_load`]: any failure reads as empty.
    pub fn load(&self, key: &str) -> Vec<ColorValue> {
        self.try_load(key).unwrap_or_else(|err| {
            warn!(key, error = %err, "treating stored list as empty");
            Vec::new()
        })
    }

    /// Overwrites the list under `key`. With a capacity, only the last
    /// `capacity` entries are written.
    pub fn save(
        &self,
        key: &str,
        colors: &[ColorValue],
        capacity: Option<usize>,
    ) -> Result<(), StoreError> {
        let start = capacity.map_or(0, |cap| colors.len().saturating_sub(cap));
        let blob = serde_json::to_string(&colors[start..])
            .map_err(|err| StoreError::Unavailable(Box::new(err)))?;
        self.backend.set(key, &blob)
    }

    pub fn try_load_list(&self, kind: ListKind) -> Result<Vec<ColorValue>, StoreError> {
        self.try_load(kind.key())
    }

    pub fn load_list(&self, kind: ListKind) -> Vec<ColorValue> {
        self.load(kind.key())
    }

    pub fn save_list(&self, kind: ListKind, colors: &[ColorValue]) -> Result<(), StoreError> {
        self.save(kind.key(), colors, kind.capacity())
    }
}
