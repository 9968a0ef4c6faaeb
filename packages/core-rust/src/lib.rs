//! `NftView` Core: table engine for NFT collection listings with filters,
//! multi-key sort, pagination, URL query sync and saved presets.

pub mod clock;
pub mod column;
pub mod filter;
pub mod format;
pub mod observer;
pub mod pagination;
pub mod predicate;
pub mod preset;
pub mod query;
pub mod sort;
pub mod storage;
pub mod types;
pub mod view;

pub use clock::{ClockSource, SystemClock};
pub use column::{CellFormat, ColumnDef, ColumnSet};
pub use filter::{FilterState, RangeFilter, SortDirection, SortKey};
pub use format::{format_value, try_format, FormatError};
pub use observer::{CompositeViewObserver, ViewObserver};
pub use preset::{Preset, PresetError, PresetStore, PRESETS_KEY};
pub use query::{QueryCodec, QuerySync};
pub use storage::{KeyValueStore, Namespaced, StoreError, UnavailableStore};
pub use types::{Row, Value};
pub use view::{
    HeaderCell, RenderedRow, TableView, ViewConfig, ViewSnapshot, ViewState,
    DEFAULT_ROWS_PER_PAGE,
};
