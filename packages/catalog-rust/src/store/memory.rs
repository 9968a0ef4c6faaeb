//! In-memory [`KeyValueStore`] backed by [`DashMap`].
//!
//! Contents live as long as the process. Suitable for tests and for
//! sessions that should not persist presets.

use dashmap::DashMap;
use nftview_core::storage::{KeyValueStore, StoreError};

/// In-memory store backed by [`DashMap`] for concurrent access.
pub struct MemoryStore {
    entries: DashMap<String, String>,
}

impl MemoryStore {
    /// Creates a new, empty `MemoryStore`.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for MemoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryStore")
            .field("len", &self.entries.len())
            .finish()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.get(key).map(|v| v.value().clone()))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.entries.remove(key);
        Ok(())
    }
}
