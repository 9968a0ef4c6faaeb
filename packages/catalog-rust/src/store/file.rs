//! [`KeyValueStore`] persisted as a single JSON object on disk.
//!
//! Every write reads the current file, applies the change and replaces the
//! file through a sibling temp file and a rename. A mutex serializes writers
//! within the process; concurrent processes are last-writer-wins.

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use nftview_core::storage::{KeyValueStore, StoreError};
use parking_lot::Mutex;
use tracing::debug;

#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileStore {
    /// Store at `path`. The file is created on first write.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_map(&self) -> Result<BTreeMap<String, String>, StoreError> {
        match fs::read_to_string(&self.path) {
            Ok(text) if text.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(text) => Ok(serde_json::from_str(&text)?),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(err) => Err(err.into()),
        }
    }

    fn write_map(&self, map: &BTreeMap<String, String>) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, serde_json::to_string_pretty(map)?)?;
        fs::rename(&tmp, &self.path)?;
        debug!(path = %self.path.display(), keys = map.len(), "store file written");
        Ok(())
    }

    fn update(&self, apply: impl FnOnce(&mut BTreeMap<String, String>)) -> Result<(), StoreError> {
        let _guard = self.lock.lock();
        let mut map = self.read_map()?;
        apply(&mut map);
        self.write_map(&map)
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let _guard = self.lock.lock();
        Ok(self.read_map()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.update(|map| {
            map.insert(key.to_string(), value.to_string());
        })
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.update(|map| {
            map.remove(key);
        })
    }
}

#[cfg(test)]
mod tests {
    use nftview_core::filter::{RangeFilter, SortDirection};
    use nftview_core::preset::PresetStore;
    use nftview_core::storage::Namespaced;

    use super::*;
    use crate::test_fixtures::write_sample;
    use crate::{Catalog, CatalogConfig};

    #[test]
    fn missing_file_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("presets.json"));
        assert_eq!(store.get("anything").unwrap(), None);
        assert!(!store.path().exists());
    }

    #[test]
    fn writes_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("presets.json");

        let store = FileStore::new(&path);
        store.set("a", "1").unwrap();
        store.set("b", "2").unwrap();
        store.remove("a").unwrap();

        let reopened = FileStore::new(&path);
        assert_eq!(reopened.get("a").unwrap(), None);
        assert_eq!(reopened.get("b").unwrap().as_deref(), Some("2"));

        let on_disk: BTreeMap<String, String> =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(on_disk.len(), 1);
        assert!(!path.with_extension("tmp").exists());
    }

    #[test]
    fn corrupt_file_is_an_error_and_left_alone() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("presets.json");
        fs::write(&path, "not json").unwrap();

        let store = FileStore::new(&path);
        assert!(matches!(store.get("a"), Err(StoreError::Malformed(_))));
        assert!(matches!(store.set("a", "1"), Err(StoreError::Malformed(_))));
        assert_eq!(fs::read_to_string(&path).unwrap(), "not json");
    }

    #[test]
    fn directory_path_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());
        assert!(matches!(store.get("a"), Err(StoreError::Io(_))));
    }

    #[test]
    fn presets_and_query_survive_a_restart() {
        let data = tempfile::tempdir().unwrap();
        write_sample(data.path());
        let catalog = Catalog::load(&CatalogConfig::with_data_dir(data.path())).unwrap();
        let preset_path = data.path().join("presets.json");

        let mut view = catalog.open_view("ALL-CHARACTERS").unwrap();
        view.add_filter_value("class", "Mage");
        view.set_range("level", RangeFilter::new("10", ""));
        view.set_sort("priceAmount", SortDirection::Desc, None);
        let query = view.query_string();
        let expected = view.render_page();
        {
            let presets = PresetStore::new(Namespaced::new(FileStore::new(&preset_path), "nftview"));
            presets.save("mages", &view).unwrap();
        }

        let presets = PresetStore::new(Namespaced::new(FileStore::new(&preset_path), "nftview"));
        let mut restored = catalog.open_view("ALL-CHARACTERS").unwrap();
        presets.load_into("mages", &mut restored).unwrap();
        assert_eq!(restored.render_page(), expected);

        let mut from_url = catalog.open_view("ALL-CHARACTERS").unwrap();
        from_url.apply_query(&format!("https://example.test/collection/ALL-CHARACTERS?{query}"));
        assert_eq!(from_url.render_page(), expected);
        let names: Vec<_> = expected.iter().map(|row| row.cells[1].clone()).collect();
        assert_eq!(names, vec!["Cid", "Amy"]);
    }
}
