//! Backends for the core [`KeyValueStore`](nftview_core::storage::KeyValueStore) port.
//!
//! - [`MemoryStore`]: process-lifetime map, for sessions without a preset file
//! - [`FileStore`]: one JSON object on disk, rewritten on every change

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;
