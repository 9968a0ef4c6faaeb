//! Resolves collection identifiers to table columns and rows.
//!
//! Concrete collections come straight from the dataset. The two aggregate
//! identifiers (`allCharacters`, `allWeapons`) concatenate every member
//! collection of their kind, in configured order.

use nftview_core::column::ColumnDef;
use nftview_core::types::Row;
use nftview_core::view::{TableView, ViewConfig};
use tracing::debug;

use crate::config::CatalogConfig;
use crate::loader::{self, CollectionData, CollectionInfo, Dataset, LoadError, NftsPerPage, SiteInfo};

/// Locale whose labels are used for column headers.
pub const DEFAULT_LOCALE: &str = "en";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollectionKind {
    Characters,
    Weapons,
}

impl CollectionKind {
    /// Key used for this kind in the site configuration.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            CollectionKind::Characters => "characters",
            CollectionKind::Weapons => "weapons",
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("unknown collection {0:?}")]
    UnknownCollection(String),
    #[error("no token {identifier:?} in collection {collection:?}")]
    UnknownToken {
        collection: String,
        identifier: String,
    },
}

/// One line of the collection listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    pub id: String,
    pub kind: CollectionKind,
    pub name: String,
    pub nft_count: usize,
    pub aggregate: bool,
}

/// Columns and rows for one collection identifier.
#[derive(Debug, Clone)]
pub struct CollectionTable {
    pub id: String,
    pub kind: CollectionKind,
    pub columns: Vec<ColumnDef>,
    pub rows: Vec<Row>,
}

#[derive(Debug, Clone)]
pub struct Catalog {
    dataset: Dataset,
    locale: String,
}

impl Catalog {
    /// Loads the dataset described by `config`.
    ///
    /// # Errors
    ///
    /// Fails only when the site configuration cannot be read.
    pub fn load(config: &CatalogConfig) -> Result<Self, LoadError> {
        loader::load_dataset(config).map(Self::new)
    }

    #[must_use]
    pub fn new(dataset: Dataset) -> Self {
        Self {
            dataset,
            locale: DEFAULT_LOCALE.to_string(),
        }
    }

    #[must_use]
    pub fn site(&self) -> &SiteInfo {
        &self.dataset.site
    }

    #[must_use]
    pub fn collection(&self, id: &str) -> Option<&CollectionData> {
        self.dataset.collections.get(id)
    }

    #[must_use]
    pub fn info(&self, id: &str) -> Option<&CollectionInfo> {
        self.collection(id).map(|data| &data.info)
    }

    #[must_use]
    pub fn is_aggregate(&self, id: &str) -> bool {
        let groups = &self.site().variables.collections;
        id == groups.all_characters || id == groups.all_weapons
    }

    /// Kind of a concrete or aggregate collection identifier.
    #[must_use]
    pub fn kind_of(&self, id: &str) -> Option<CollectionKind> {
        let groups = &self.site().variables.collections;
        if id == groups.all_characters || groups.characters.iter().any(|c| c == id) {
            Some(CollectionKind::Characters)
        } else if id == groups.all_weapons || groups.weapons.iter().any(|c| c == id) {
            Some(CollectionKind::Weapons)
        } else {
            None
        }
    }

    /// Concrete collections behind `id`: itself, or every member of an
    /// aggregate.
    ///
    /// # Errors
    ///
    /// [`CatalogError::UnknownCollection`] for identifiers the site does
    /// not configure.
    pub fn members(&self, id: &str) -> Result<Vec<&CollectionData>, CatalogError> {
        let groups = &self.site().variables.collections;
        let ids: Vec<&String> = if id == groups.all_characters {
            groups.characters.iter().collect()
        } else if id == groups.all_weapons {
            groups.weapons.iter().collect()
        } else if self.kind_of(id).is_some() {
            groups
                .characters
                .iter()
                .chain(groups.weapons.iter())
                .filter(|c| *c == id)
                .collect()
        } else {
            return Err(CatalogError::UnknownCollection(id.to_string()));
        };
        Ok(ids.into_iter().filter_map(|c| self.collection(c)).collect())
    }

    /// Every concrete collection followed by the two aggregates.
    #[must_use]
    pub fn entries(&self) -> Vec<CatalogEntry> {
        let groups = &self.site().variables.collections;
        let mut entries: Vec<CatalogEntry> = self
            .site()
            .collection_ids()
            .filter_map(|id| {
                let kind = self.kind_of(id)?;
                let data = self.collection(id)?;
                Some(CatalogEntry {
                    id: id.to_string(),
                    kind,
                    name: data.info.name.clone(),
                    nft_count: data.nfts.len(),
                    aggregate: false,
                })
            })
            .collect();
        for (id, kind) in [
            (&groups.all_characters, CollectionKind::Characters),
            (&groups.all_weapons, CollectionKind::Weapons),
        ] {
            let nft_count = self
                .members(id)
                .map(|members| members.iter().map(|m| m.nfts.len()).sum::<usize>())
                .unwrap_or_default();
            entries.push(CatalogEntry {
                id: id.clone(),
                kind,
                name: id.clone(),
                nft_count,
                aggregate: true,
            });
        }
        entries
    }

    /// Column descriptors for `kind`: labels in configured order, each with
    /// the capabilities the site grants it.
    #[must_use]
    pub fn columns(&self, kind: CollectionKind) -> Vec<ColumnDef> {
        let caps = self
            .site()
            .variables
            .table_entries
            .get(kind.as_str())
            .cloned()
            .unwrap_or_default();
        self.site()
            .column_labels(&self.locale, kind.as_str())
            .into_iter()
            .map(|(id, label)| {
                let mut column = ColumnDef::new(&id, &label);
                column.searchable = caps.searchable.contains(&id);
                column.sortable = caps.sortable.contains(&id);
                column.filterable = caps.filterable.contains(&id);
                column.rangeable = caps.rangeable.contains(&id);
                column
            })
            .collect()
    }

    /// Page size defaults from the site configuration.
    #[must_use]
    pub fn view_config(&self) -> ViewConfig {
        let defaults = ViewConfig::default();
        match &self.site().variables.table_info.nfts_per_page {
            None => defaults,
            Some(NftsPerPage::Fixed(size)) => ViewConfig {
                rows_per_page: *size,
                ..defaults
            },
            Some(NftsPerPage::Choices { default, options }) => ViewConfig {
                rows_per_page: *default,
                rows_per_page_options: if options.is_empty() {
                    defaults.rows_per_page_options
                } else {
                    options.clone()
                },
            },
        }
    }

    /// Columns and rows for a concrete or aggregate collection.
    ///
    /// # Errors
    ///
    /// [`CatalogError::UnknownCollection`] for unconfigured identifiers.
    pub fn table(&self, id: &str) -> Result<CollectionTable, CatalogError> {
        let kind = self
            .kind_of(id)
            .ok_or_else(|| CatalogError::UnknownCollection(id.to_string()))?;
        let rows: Vec<Row> = self
            .members(id)?
            .into_iter()
            .flat_map(|data| data.nfts.iter().map(|(_, row)| row.clone()))
            .collect();
        debug!(collection = id, kind = kind.as_str(), rows = rows.len(), "table resolved");
        Ok(CollectionTable {
            id: id.to_string(),
            kind,
            columns: self.columns(kind),
            rows,
        })
    }

    /// A fresh view over [`Catalog::table`].
    ///
    /// # Errors
    ///
    /// Same as [`Catalog::table`].
    pub fn open_view(&self, id: &str) -> Result<TableView, CatalogError> {
        let table = self.table(id)?;
        Ok(TableView::new(table.columns, table.rows, &self.view_config()))
    }
}
