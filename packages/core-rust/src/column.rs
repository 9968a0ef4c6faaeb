//! Column descriptors and the per-view column set.

use serde::{Deserialize, Serialize};

/// How a column's raw values are rendered for display, search and sort.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CellFormat {
    /// Rendered as-is.
    #[default]
    Text,
    /// Wallet address, elided to `first6...last6` when long.
    Address,
    /// Monetary amount, rounded to two decimals with trailing zeros trimmed.
    Decimal,
    /// Plain number in canonical form (`"07"` becomes `7`).
    Number,
    /// Image URL. Rendered as-is in text contexts; front ends draw a thumbnail.
    Image,
}

impl CellFormat {
    /// Picks the formatter conventionally used for a column id in the
    /// collection data.
    #[must_use]
    pub fn for_column(id: &str) -> Self {
        match id {
            "owner" => CellFormat::Address,
            "priceAmount" => CellFormat::Decimal,
            "level" | "stars" | "experience" => CellFormat::Number,
            "thumbnailUrl" | "url" => CellFormat::Image,
            _ => CellFormat::Text,
        }
    }
}

/// Static metadata for one table column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnDef {
    /// Key into each row.
    pub id: String,
    /// Header label.
    pub display_name: String,
    pub searchable: bool,
    pub sortable: bool,
    pub filterable: bool,
    pub rangeable: bool,
    #[serde(default)]
    pub format: CellFormat,
}

impl ColumnDef {
    /// Creates a column with no interactive capabilities and the
    /// conventional formatter for its id.
    #[must_use]
    pub fn new(id: &str, display_name: &str) -> Self {
        Self {
            id: id.to_string(),
            display_name: display_name.to_string(),
            searchable: false,
            sortable: false,
            filterable: false,
            rangeable: false,
            format: CellFormat::for_column(id),
        }
    }

    #[must_use]
    pub fn searchable(mut self) -> Self {
        self.searchable = true;
        self
    }

    #[must_use]
    pub fn sortable(mut self) -> Self {
        self.sortable = true;
        self
    }

    #[must_use]
    pub fn filterable(mut self) -> Self {
        self.filterable = true;
        self
    }

    #[must_use]
    pub fn rangeable(mut self) -> Self {
        self.rangeable = true;
        self
    }

    #[must_use]
    pub fn with_format(mut self, format: CellFormat) -> Self {
        self.format = format;
        self
    }

    /// Whether the header offers any search/sort/filter/range control.
    #[must_use]
    pub fn has_capabilities(&self) -> bool {
        self.searchable || self.sortable || self.filterable || self.rangeable
    }
}

/// Ordered, id-unique list of column descriptors for one view.
///
/// Later duplicates of an id are dropped so every lookup is unambiguous.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ColumnSet {
    columns: Vec<ColumnDef>,
}

impl ColumnSet {
    #[must_use]
    pub fn new(columns: Vec<ColumnDef>) -> Self {
        let mut unique: Vec<ColumnDef> = Vec::with_capacity(columns.len());
        for column in columns {
            if unique.iter().all(|c| c.id != column.id) {
                unique.push(column);
            }
        }
        Self { columns: unique }
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&ColumnDef> {
        self.columns.iter().find(|c| c.id == id)
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Position of `id` in descriptor order.
    #[must_use]
    pub fn position(&self, id: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.id == id)
    }

    /// Column ids in descriptor order.
    #[must_use]
    pub fn ids(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.id.clone()).collect()
    }

    /// Formatter for `id`, falling back to the conventional one for
    /// columns outside the set.
    #[must_use]
    pub fn format_of(&self, id: &str) -> CellFormat {
        self.get(id)
            .map_or_else(|| CellFormat::for_column(id), |c| c.format)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ColumnDef> {
        self.columns.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

impl From<Vec<ColumnDef>> for ColumnSet {
    fn from(columns: Vec<ColumnDef>) -> Self {
        Self::new(columns)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conventional_formats_by_column_id() {
        assert_eq!(CellFormat::for_column("owner"), CellFormat::Address);
        assert_eq!(CellFormat::for_column("priceAmount"), CellFormat::Decimal);
        assert_eq!(CellFormat::for_column("level"), CellFormat::Number);
        assert_eq!(CellFormat::for_column("stars"), CellFormat::Number);
        assert_eq!(CellFormat::for_column("thumbnailUrl"), CellFormat::Image);
        assert_eq!(CellFormat::for_column("name"), CellFormat::Text);
    }

    #[test]
    fn builder_sets_capabilities() {
        let col = ColumnDef::new("level", "Level").sortable().rangeable();
        assert!(col.sortable);
        assert!(col.rangeable);
        assert!(!col.searchable);
        assert!(!col.filterable);
        assert!(col.has_capabilities());
        assert!(!ColumnDef::new("thumbnailUrl", "Image").has_capabilities());
    }

    #[test]
    fn column_set_drops_duplicate_ids() {
        let set = ColumnSet::new(vec![
            ColumnDef::new("name", "Name"),
            ColumnDef::new("level", "Level"),
            ColumnDef::new("name", "Other"),
        ]);
        assert_eq!(set.len(), 2);
        assert_eq!(set.ids(), vec!["name", "level"]);
        assert_eq!(set.get("name").unwrap().display_name, "Name");
        assert_eq!(set.position("level"), Some(1));
    }

    #[test]
    fn column_def_serde_uses_camel_case_and_default_format() {
        let col: ColumnDef = serde_json::from_str(
            r#"{"id":"owner","displayName":"Owner","searchable":true,"sortable":false,"filterable":false,"rangeable":false}"#,
        )
        .unwrap();
        assert_eq!(col.display_name, "Owner");
        assert_eq!(col.format, CellFormat::Text);
    }
}
