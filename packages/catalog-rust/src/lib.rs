//! `NftView` Catalog: loads collection data from disk, resolves collection
//! tables and token details, and provides preset storage backends.

pub mod catalog;
pub mod config;
pub mod detail;
pub mod loader;
pub mod render;
pub mod store;

#[cfg(test)]
pub(crate) mod test_fixtures;

pub use catalog::{Catalog, CatalogEntry, CatalogError, CollectionKind, CollectionTable};
pub use config::CatalogConfig;
pub use detail::{DetailField, TokenDetail};
pub use loader::{CollectionData, CollectionInfo, Dataset, LoadError, SiteInfo};
pub use store::{FileStore, MemoryStore};
