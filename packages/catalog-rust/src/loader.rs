//! Reads the site configuration and per-collection data files.
//!
//! Layout under the data directory:
//!
//! ```text
//! info.json                  site configuration (collections, columns, capabilities)
//! <collection>/info.json     collection metadata
//! <collection>/nfts.json     token identifier -> token object
//! <collection>/nfts.csv      one token per record, read when nfts.json is absent
//! <collection>_nfts.csv      flat variant of the above
//! ```
//!
//! The site file is required. A collection whose files are missing or
//! malformed is replaced by an empty fallback so the rest of the site still
//! loads. CSV collections may omit `info.json`.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use nftview_core::types::{Row, Value};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::CatalogConfig;

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to read csv {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

// ---------------------------------------------------------------------------
// Site configuration
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct SiteInfo {
    pub variables: Variables,
    /// Localized strings keyed by language code.
    #[serde(default)]
    pub contents: BTreeMap<String, LocaleContents>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Variables {
    pub collections: CollectionGroups,
    #[serde(default)]
    pub table_info: TableInfo,
    /// Capability lists keyed by collection kind.
    #[serde(rename = "tabelEntries", default)]
    pub table_entries: BTreeMap<String, Capabilities>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionGroups {
    #[serde(default)]
    pub characters: Vec<String>,
    #[serde(default)]
    pub weapons: Vec<String>,
    pub all_characters: String,
    pub all_weapons: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableInfo {
    pub nfts_per_page: Option<NftsPerPage>,
}

/// Page size setting: a bare number or a default plus selectable options.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum NftsPerPage {
    Fixed(usize),
    Choices {
        default: usize,
        #[serde(default)]
        options: Vec<usize>,
    },
}

/// Column ids granted each interactive capability.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Capabilities {
    #[serde(default)]
    pub searchable: Vec<String>,
    #[serde(default)]
    pub sortable: Vec<String>,
    #[serde(default)]
    pub filterable: Vec<String>,
    #[serde(rename = "rangeble", default)]
    pub rangeable: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LocaleContents {
    #[serde(default)]
    pub components: Components,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Components {
    #[serde(rename = "collectionTable", default)]
    pub collection_table: BTreeMap<String, TableLabels>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TableLabels {
    /// Column id to header label, in display order.
    #[serde(default)]
    pub columns: serde_json::Map<String, serde_json::Value>,
}

impl SiteInfo {
    /// Column ids and labels for `kind` in `locale`, in display order.
    #[must_use]
    pub fn column_labels(&self, locale: &str, kind: &str) -> Vec<(String, String)> {
        let Some(labels) = self
            .contents
            .get(locale)
            .and_then(|c| c.components.collection_table.get(kind))
        else {
            return Vec::new();
        };
        labels
            .columns
            .iter()
            .map(|(id, label)| {
                let label = label.as_str().map_or_else(|| id.clone(), str::to_string);
                (id.clone(), label)
            })
            .collect()
    }

    /// Every concrete collection, characters first, in configured order.
    pub fn collection_ids(&self) -> impl Iterator<Item = &str> {
        let groups = &self.variables.collections;
        groups
            .characters
            .iter()
            .chain(groups.weapons.iter())
            .map(String::as_str)
    }
}

// ---------------------------------------------------------------------------
// Collections
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assets {
    #[serde(default)]
    pub website: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionInfo {
    pub collection: String,
    pub name: String,
    #[serde(default)]
    pub ticker: String,
    #[serde(default)]
    pub holder_count: u64,
    #[serde(default)]
    pub nft_count: u64,
    #[serde(default)]
    pub assets: Assets,
}

impl CollectionInfo {
    /// Placeholder metadata for a collection that failed to load.
    #[must_use]
    pub fn fallback(collection: &str) -> Self {
        Self {
            collection: collection.to_string(),
            name: collection.to_string(),
            ticker: collection.to_string(),
            holder_count: 0,
            nft_count: 0,
            assets: Assets::default(),
        }
    }
}

/// One collection's metadata and tokens, tokens in file order.
#[derive(Debug, Clone, PartialEq)]
pub struct CollectionData {
    pub info: CollectionInfo,
    pub nfts: Vec<(String, Row)>,
}

impl CollectionData {
    #[must_use]
    pub fn fallback(collection: &str) -> Self {
        Self {
            info: CollectionInfo::fallback(collection),
            nfts: Vec::new(),
        }
    }

    #[must_use]
    pub fn token(&self, identifier: &str) -> Option<&Row> {
        self.nfts
            .iter()
            .find(|(id, _)| id == identifier)
            .map(|(_, row)| row)
    }
}

/// Everything read from the data directory.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub site: SiteInfo,
    pub collections: BTreeMap<String, CollectionData>,
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, LoadError> {
    let text = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| LoadError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Reads the site configuration file.
///
/// # Errors
///
/// Returns [`LoadError`] when the file is missing or malformed.
pub fn load_site(config: &CatalogConfig) -> Result<SiteInfo, LoadError> {
    read_json(&config.site_path())
}

/// Reads one collection's metadata and tokens.
///
/// Tokens come from `nfts.json` when present, otherwise from the first CSV
/// file found (see [`CatalogConfig::nfts_csv_paths`]). Token entries that
/// are not JSON objects are skipped with a warning. A JSON token without an
/// `identifier` field gets its map key as identifier.
///
/// # Errors
///
/// Returns [`LoadError`] when a file is missing or malformed.
pub fn load_collection(config: &CatalogConfig, collection: &str) -> Result<CollectionData, LoadError> {
    let json_path = config.nfts_path(collection);
    let csv_path = if json_path.exists() {
        None
    } else {
        config.nfts_csv_paths(collection).into_iter().find(|p| p.exists())
    };

    let Some(csv_path) = csv_path else {
        let info: CollectionInfo = read_json(&config.info_path(collection))?;
        let nfts = read_json_tokens(&json_path, collection)?;
        debug!(collection, tokens = nfts.len(), "collection loaded");
        return Ok(CollectionData { info, nfts });
    };

    let info = match read_json(&config.info_path(collection)) {
        Ok(info) => info,
        Err(LoadError::Io { source, .. }) if source.kind() == std::io::ErrorKind::NotFound => {
            debug!(collection, "no collection metadata next to csv tokens");
            CollectionInfo::fallback(collection)
        }
        Err(err) => return Err(err),
    };
    let nfts = read_csv_tokens(&csv_path, collection)?;
    debug!(collection, tokens = nfts.len(), path = %csv_path.display(), "collection loaded from csv");
    Ok(CollectionData { info, nfts })
}

fn read_json_tokens(path: &Path, collection: &str) -> Result<Vec<(String, Row)>, LoadError> {
    let raw: serde_json::Map<String, serde_json::Value> = read_json(path)?;
    let mut nfts = Vec::with_capacity(raw.len());
    for (identifier, token) in raw {
        match serde_json::from_value::<Row>(token) {
            Ok(row) => {
                let row = if row.get("identifier").is_some() {
                    row
                } else {
                    row.with("identifier", Value::String(identifier.clone()))
                };
                nfts.push((identifier, row));
            }
            Err(err) => warn!(collection, identifier, error = %err, "skipping malformed token"),
        }
    }
    Ok(nfts)
}

/// One token per record, keyed by its `identifier` column. Spaces in
/// header names become underscores so they match column ids.
fn read_csv_tokens(path: &Path, collection: &str) -> Result<Vec<(String, Row)>, LoadError> {
    let csv_error = |source| LoadError::Csv {
        path: path.to_path_buf(),
        source,
    };
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .map_err(csv_error)?;
    let headers: Vec<String> = reader
        .headers()
        .map_err(csv_error)?
        .iter()
        .map(|h| h.trim().replace(' ', "_"))
        .collect();

    let mut nfts = Vec::new();
    for (index, record) in reader.records().enumerate() {
        let record = match record {
            Ok(record) => record,
            Err(err) => {
                warn!(collection, record = index + 1, error = %err, "skipping malformed csv record");
                continue;
            }
        };
        let row: Row = headers
            .iter()
            .zip(record.iter())
            .map(|(header, cell)| (header.clone(), csv_cell(cell)))
            .collect();
        match row.get("identifier") {
            Some(Value::String(identifier)) if !identifier.is_empty() => {
                nfts.push((identifier.clone(), row));
            }
            _ => warn!(collection, record = index + 1, "skipping csv record without identifier"),
        }
    }
    Ok(nfts)
}

/// Types a CSV cell: empty is null, then integer, finite float, boolean,
/// and text for everything else.
fn csv_cell(cell: &str) -> Value {
    let text = cell.trim();
    if text.is_empty() {
        return Value::Null;
    }
    if let Ok(i) = text.parse::<i64>() {
        return Value::Int(i);
    }
    if let Ok(n) = text.parse::<f64>() {
        if n.is_finite() {
            return Value::Float(n);
        }
    }
    match text {
        "true" | "True" => Value::Bool(true),
        "false" | "False" => Value::Bool(false),
        _ => Value::String(cell.to_string()),
    }
}

/// Reads the site file and every configured collection.
///
/// # Errors
///
/// Only a missing or malformed site file is an error; broken collections
/// fall back to empty ones.
pub fn load_dataset(config: &CatalogConfig) -> Result<Dataset, LoadError> {
    let site = load_site(config)?;
    let mut collections = BTreeMap::new();
    for collection in site.collection_ids() {
        let data = load_collection(config, collection).unwrap_or_else(|err| {
            warn!(collection, error = %err, "failed to load collection, using empty fallback");
            CollectionData::fallback(collection)
        });
        collections.insert(collection.to_string(), data);
    }
    info!(
        data_dir = %config.data_dir.display(),
        collections = collections.len(),
        "dataset loaded"
    );
    Ok(Dataset { site, collections })
}
