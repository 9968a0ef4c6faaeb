//! Catalog configuration types.

use std::path::{Path, PathBuf};

/// Where collection data lives and how preset keys are namespaced.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// Root directory holding the site file and one directory per collection.
    pub data_dir: PathBuf,
    /// Site configuration file name, relative to `data_dir`.
    pub site_file: String,
    /// Per-collection metadata file name.
    pub info_file: String,
    /// Per-collection token file name.
    pub nfts_file: String,
    /// Per-collection CSV token file name, read when `nfts_file` is absent.
    pub nfts_csv_file: String,
    /// Suffix of flat `<collection><suffix>` CSV files in `data_dir`.
    pub nfts_csv_suffix: String,
    /// Prefix applied to every preset storage key.
    pub namespace: String,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            site_file: "info.json".to_string(),
            info_file: "info.json".to_string(),
            nfts_file: "nfts.json".to_string(),
            nfts_csv_file: "nfts.csv".to_string(),
            nfts_csv_suffix: "_nfts.csv".to_string(),
            namespace: "nftview".to_string(),
        }
    }
}

impl CatalogConfig {
    /// Default layout rooted at `data_dir`.
    #[must_use]
    pub fn with_data_dir(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn site_path(&self) -> PathBuf {
        self.data_dir.join(&self.site_file)
    }

    #[must_use]
    pub fn info_path(&self, collection: &str) -> PathBuf {
        self.collection_dir(collection).join(&self.info_file)
    }

    #[must_use]
    pub fn nfts_path(&self, collection: &str) -> PathBuf {
        self.collection_dir(collection).join(&self.nfts_file)
    }

    /// CSV token file candidates, in lookup order: inside the collection
    /// directory, then the flat file next to the site file.
    #[must_use]
    pub fn nfts_csv_paths(&self, collection: &str) -> [PathBuf; 2] {
        [
            self.collection_dir(collection).join(&self.nfts_csv_file),
            self.data_dir.join(format!("{collection}{}", self.nfts_csv_suffix)),
        ]
    }

    fn collection_dir(&self, collection: &str) -> PathBuf {
        Path::new(&self.data_dir).join(collection)
    }
}
