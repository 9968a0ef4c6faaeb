//! Named, persisted snapshots of filter and view state.
//!
//! All presets live as one JSON array under [`PRESETS_KEY`]:
//! `[{name, filterStates, visibleColumns, rowsPerPage, timestamp}, ...]`.
//! Every operation reports failure through [`PresetError`] and leaves the
//! caller's in-memory view untouched when the store misbehaves.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::clock::{ClockSource, SystemClock};
use crate::filter::FilterState;
use crate::storage::{KeyValueStore, StoreError};
use crate::view::{TableView, ViewSnapshot, ViewState};

/// Store key holding the preset list.
pub const PRESETS_KEY: &str = "filterPresets";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preset {
    pub name: String,
    #[serde(rename = "filterStates")]
    pub filters: FilterState,
    pub visible_columns: Vec<String>,
    pub rows_per_page: usize,
    /// Save time, milliseconds since Unix epoch.
    pub timestamp: u64,
}

impl Preset {
    /// Captures the current filters, visible columns and page size of `view`.
    #[must_use]
    pub fn capture(name: &str, view: &TableView, timestamp: u64) -> Self {
        Self {
            name: name.to_string(),
            filters: view.filter_state().clone(),
            visible_columns: view.visible_columns().to_vec(),
            rows_per_page: view.rows_per_page(),
            timestamp,
        }
    }

    /// The snapshot this preset restores; always starts on page 1.
    #[must_use]
    pub fn snapshot(&self) -> ViewSnapshot {
        ViewSnapshot {
            filters: self.filters.clone(),
            view: ViewState {
                visible_columns: self.visible_columns.clone(),
                rows_per_page: self.rows_per_page,
                current_page: 1,
            },
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PresetError {
    #[error("preset name must not be empty")]
    EmptyName,
    #[error("no preset named {0:?}")]
    NotFound(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Preset persistence over a [`KeyValueStore`].
pub struct PresetStore<S> {
    store: S,
    clock: Box<dyn ClockSource>,
}

impl<S: KeyValueStore> PresetStore<S> {
    #[must_use]
    pub fn new(store: S) -> Self {
        Self::with_clock(store, Box::new(SystemClock))
    }

    #[must_use]
    pub fn with_clock(store: S, clock: Box<dyn ClockSource>) -> Self {
        Self { store, clock }
    }

    /// All presets, most recently saved first.
    ///
    /// # Errors
    ///
    /// Fails when the store is unavailable or holds malformed data.
    pub fn list(&self) -> Result<Vec<Preset>, PresetError> {
        let mut presets = self.read_all()?;
        presets.sort_by(|a, b| b.timestamp.cmp(&a.timestamp).then_with(|| a.name.cmp(&b.name)));
        Ok(presets)
    }

    /// Saves the current state of `view` as `name`, replacing any preset
    /// with the same name.
    ///
    /// # Errors
    ///
    /// Fails on an empty name or when the store cannot be read or written.
    pub fn save(&self, name: &str, view: &TableView) -> Result<Preset, PresetError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(PresetError::EmptyName);
        }
        let preset = Preset::capture(name, view, self.clock.now());
        let mut presets = self.read_all()?;
        presets.retain(|p| p.name != name);
        presets.push(preset.clone());
        self.write_all(&presets)?;
        debug!(name, total = presets.len(), "preset saved");
        Ok(preset)
    }

    /// Fetches the preset called `name`.
    ///
    /// # Errors
    ///
    /// [`PresetError::NotFound`] for unknown names, or a store failure.
    pub fn load(&self, name: &str) -> Result<Preset, PresetError> {
        let name = name.trim();
        self.read_all()?
            .into_iter()
            .find(|p| p.name == name)
            .ok_or_else(|| PresetError::NotFound(name.to_string()))
    }

    /// Restores the preset called `name` into `view`, on page 1.
    ///
    /// # Errors
    ///
    /// Same as [`PresetStore::load`]; `view` is untouched on error.
    pub fn load_into(&self, name: &str, view: &mut TableView) -> Result<Preset, PresetError> {
        let preset = self.load(name)?;
        view.apply_snapshot(preset.snapshot());
        Ok(preset)
    }

    /// Deletes `name`. Returns whether a preset was removed.
    ///
    /// # Errors
    ///
    /// Fails when the store cannot be read or written.
    pub fn delete(&self, name: &str) -> Result<bool, PresetError> {
        let name = name.trim();
        let mut presets = self.read_all()?;
        let before = presets.len();
        presets.retain(|p| p.name != name);
        if presets.len() == before {
            return Ok(false);
        }
        self.write_all(&presets)?;
        Ok(true)
    }

    /// Deletes every preset.
    ///
    /// # Errors
    ///
    /// Fails when the store cannot be written.
    pub fn clear(&self) -> Result<(), PresetError> {
        self.store
            .remove(PRESETS_KEY)
            .inspect_err(|err| warn!(error = %err, "clearing presets failed"))?;
        Ok(())
    }

    fn read_all(&self) -> Result<Vec<Preset>, PresetError> {
        let raw = self
            .store
            .get(PRESETS_KEY)
            .inspect_err(|err| warn!(error = %err, "reading presets failed"))?;
        match raw {
            None => Ok(Vec::new()),
            Some(json) => serde_json::from_str(&json)
                .map_err(|err| {
                    warn!(error = %err, "stored presets are malformed");
                    PresetError::Store(StoreError::Malformed(err))
                }),
        }
    }

    fn write_all(&self, presets: &[Preset]) -> Result<(), PresetError> {
        let json = serde_json::to_string(presets).map_err(StoreError::from)?;
        self.store
            .set(PRESETS_KEY, &json)
            .inspect_err(|err| warn!(error = %err, "writing presets failed"))?;
        Ok(())
    }
}

impl<S> std::fmt::Debug for PresetStore<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PresetStore").finish_non_exhaustive()
    }
}
