use super::backend::StorageBackend;
use crate::error::{RecordzError, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// What `load` found in the slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotState {
    /// The slot parsed as the expected shape
    Stored,
    /// Nothing was ever written there
    Missing,
    /// Present but unreadable or the wrong shape; the default was used
    Corrupt(String),
}

/// JSON persistence over a [`StorageBackend`], parameterized by key and default.
///
/// Reads never fail: a missing or corrupt slot yields the caller's default.
/// Writes fail with [`RecordzError::StorageWrite`], which callers treat as
/// recoverable.
pub struct Persistence<B: StorageBackend> {
    backend: B,
}

impl<B: StorageBackend> Persistence<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Load a collection, falling back to `default` when the slot is absent,
    /// unparseable, or not an array of `T`.
    pub fn load<T, F>(&self, key: &str, default: F) -> Vec<T>
    where
        T: DeserializeOwned,
        F: FnOnce() -> Vec<T>,
    {
        self.load_detailed(key, default).0
    }

    pub fn load_detailed<T, F>(&self, key: &str, default: F) -> (Vec<T>, SlotState)
    where
        T: DeserializeOwned,
        F: FnOnce() -> Vec<T>,
    {
        self.load_value(key, default)
    }

    /// Same contract as [`Persistence::load`] for any JSON shape.
    pub fn load_value<T, F>(&self, key: &str, default: F) -> (T, SlotState)
    where
        T: DeserializeOwned,
        F: FnOnce() -> T,
    {
        let raw = match self.backend.read_slot(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                tracing::debug!(key, "slot is empty, using defaults");
                return (default(), SlotState::Missing);
            }
            Err(e) => {
                tracing::warn!(key, error = %e, "could not read slot, using defaults");
                return (default(), SlotState::Corrupt(e.to_string()));
            }
        };

        match serde_json::from_str(&raw) {
            Ok(value) => (value, SlotState::Stored),
            Err(e) => {
                tracing::warn!(key, error = %e, "slot is corrupt, using defaults");
                (default(), SlotState::Corrupt(e.to_string()))
            }
        }
    }

    pub fn save<T: Serialize>(&self, key: &str, items: &[T]) -> Result<()> {
        self.save_value(key, items)
    }

    pub fn save_value<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        let write_error = |reason: String| RecordzError::StorageWrite {
            key: key.to_string(),
            reason,
        };
        let content = serde_json::to_string_pretty(value).map_err(|e| write_error(e.to_string()))?;
        self.backend
            .write_slot(key, &content)
            .map_err(|e| write_error(e.to_string()))?;
        tracing::debug!(key, bytes = content.len(), "slot saved");
        Ok(())
    }
}
