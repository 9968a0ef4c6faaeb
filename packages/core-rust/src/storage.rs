//! Key-value storage port.
//!
//! Defines [`KeyValueStore`], the narrow interface the preset store needs
//! from the outside world (browser local storage in a web front end, a file
//! or a map elsewhere). Keeping it this small lets the engine and presets
//! be tested without any real storage behind them.

use std::sync::Arc;

/// Failure of the external store. Never fatal: callers surface it and
/// carry on with their in-memory state.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("key-value store is unavailable")]
    Unavailable,
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("stored data is malformed: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Synchronous string key-value store.
///
/// Used as a generic parameter or behind `Arc<dyn KeyValueStore>`.
pub trait KeyValueStore: Send + Sync {
    /// Retrieve the value for `key`, or `None` if not present.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Insert or replace the value for `key`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the backend cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Remove `key`. Removing a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the backend cannot be written.
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Arc<S> {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        (**self).remove(key)
    }
}

/// Prefixes every key so several applications can share one backend.
#[derive(Debug, Clone)]
pub struct Namespaced<S> {
    inner: S,
    prefix: String,
}

impl<S: KeyValueStore> Namespaced<S> {
    /// Keys become `<namespace>:<key>`.
    #[must_use]
    pub fn new(inner: S, namespace: &str) -> Self {
        Self {
            inner,
            prefix: format!("{namespace}:"),
        }
    }

    fn key(&self, key: &str) -> String {
        format!("{}{key}", self.prefix)
    }
}

impl<S: KeyValueStore> KeyValueStore for Namespaced<S> {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.inner.get(&self.key(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.inner.set(&self.key(key), value)
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.inner.remove(&self.key(key))
    }
}

/// Store for environments without persistent storage. Every operation
/// fails with [`StoreError::Unavailable`].
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableStore;

impl KeyValueStore for UnavailableStore {
    fn get(&self, _key: &str) -> Result<Option<String>, StoreError> {
        Err(StoreError::Unavailable)
    }

    fn set(&self, _key: &str, _value: &str) -> Result<(), StoreError> {
        Err(StoreError::Unavailable)
    }

    fn remove(&self, _key: &str) -> Result<(), StoreError> {
        Err(StoreError::Unavailable)
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::collections::BTreeMap;

    use parking_lot::Mutex;

    use super::{KeyValueStore, StoreError};

    /// Plain map-backed store for unit tests.
    #[derive(Debug, Default)]
    pub(crate) struct MapStore {
        pub(crate) entries: Mutex<BTreeMap<String, String>>,
    }

    impl KeyValueStore for MapStore {
        fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
            Ok(self.entries.lock().get(key).cloned())
        }

        fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
            self.entries.lock().insert(key.to_string(), value.to_string());
            Ok(())
        }

        fn remove(&self, key: &str) -> Result<(), StoreError> {
            self.entries.lock().remove(key);
            Ok(())
        }
    }
}
