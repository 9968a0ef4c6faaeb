//! The tabular view engine.
//!
//! [`TableView`] owns a row set and its column descriptors, holds the
//! current [`FilterState`] and [`ViewState`], and keeps the derived
//! filtered/sorted row order up to date. Mutators run to completion
//! synchronously; the derived order is recomputed only when the rows, the
//! filter state or the visible columns change, never on page moves.
//!
//! # Page invariants
//!
//! After every transition `1 <= current_page <= max(1, total_pages)`.
//! Any filter change or rows-per-page change resets the page to 1. Sort
//! and visibility changes keep the page unless the page count shrank below
//! it, in which case it snaps back to 1.

use std::collections::BTreeSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::column::{ColumnDef, ColumnSet};
use crate::filter::{FilterState, RangeFilter, SortDirection};
use crate::format::{format_value, try_format};
use crate::observer::{CompositeViewObserver, ViewObserver};
use crate::pagination;
use crate::predicate::RowPredicate;
use crate::sort::sort_indices;
use crate::types::Row;

/// Rows per page when the caller supplies none.
pub const DEFAULT_ROWS_PER_PAGE: usize = 25;

/// Caller-supplied defaults for a new view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewConfig {
    /// Initial rows per page. Zero falls back to [`DEFAULT_ROWS_PER_PAGE`].
    pub rows_per_page: usize,
    /// Choices offered by front ends for the rows-per-page selector.
    pub rows_per_page_options: Vec<usize>,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            rows_per_page: DEFAULT_ROWS_PER_PAGE,
            rows_per_page_options: vec![10, 25, 50, 100],
        }
    }
}

/// Column visibility and pagination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewState {
    /// Visible column ids, in descriptor order.
    pub visible_columns: Vec<String>,
    pub rows_per_page: usize,
    /// 1-based.
    pub current_page: usize,
}

/// Complete restorable state of a view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewSnapshot {
    pub filters: FilterState,
    pub view: ViewState,
}

/// Header rendering contract for one visible column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderCell {
    pub id: String,
    pub label: String,
    /// Whether the header opens search/sort/filter/range controls.
    pub interactive: bool,
    /// Whether any selection on this column is active (header indicator).
    pub active: bool,
    pub sort: Option<SortDirection>,
}

/// One row of the current page, formatted for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedRow {
    /// Stable render key.
    pub key: String,
    /// One display string per visible column.
    pub cells: Vec<String>,
}

/// Filtering, sorting and pagination over an immutable row set.
#[derive(Debug)]
pub struct TableView {
    columns: ColumnSet,
    rows: Vec<Row>,
    filters: FilterState,
    view: ViewState,
    default_rows_per_page: usize,
    /// Positions into `rows` of the filtered rows, in sorted order.
    order: Vec<usize>,
    observers: CompositeViewObserver,
}

impl TableView {
    /// Creates a view with blank filters, every column visible and page 1.
    #[must_use]
    pub fn new(columns: impl Into<ColumnSet>, rows: Vec<Row>, config: &ViewConfig) -> Self {
        let columns = columns.into();
        let rows_per_page = if config.rows_per_page == 0 {
            DEFAULT_ROWS_PER_PAGE
        } else {
            config.rows_per_page
        };
        let mut view = Self {
            filters: FilterState::initial(&columns),
            view: ViewState {
                visible_columns: columns.ids(),
                rows_per_page,
                current_page: 1,
            },
            default_rows_per_page: rows_per_page,
            order: Vec::new(),
            columns,
            rows,
            observers: CompositeViewObserver::default(),
        };
        view.recompute();
        view
    }

    /// Registers an observer notified after every effective state change.
    pub fn add_observer(&mut self, observer: Arc<dyn ViewObserver>) {
        self.observers.add(observer);
    }

    // -- accessors --------------------------------------------------------

    #[must_use]
    pub fn columns(&self) -> &ColumnSet {
        &self.columns
    }

    #[must_use]
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    #[must_use]
    pub fn filter_state(&self) -> &FilterState {
        &self.filters
    }

    #[must_use]
    pub fn view_state(&self) -> &ViewState {
        &self.view
    }

    #[must_use]
    pub fn snapshot(&self) -> ViewSnapshot {
        ViewSnapshot {
            filters: self.filters.clone(),
            view: self.view.clone(),
        }
    }

    #[must_use]
    pub fn default_rows_per_page(&self) -> usize {
        self.default_rows_per_page
    }

    #[must_use]
    pub fn current_page(&self) -> usize {
        self.view.current_page
    }

    #[must_use]
    pub fn rows_per_page(&self) -> usize {
        self.view.rows_per_page
    }

    #[must_use]
    pub fn visible_columns(&self) -> &[String] {
        &self.view.visible_columns
    }

    /// Number of rows before filtering.
    #[must_use]
    pub fn total_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of rows passing every active filter.
    #[must_use]
    pub fn filtered_count(&self) -> usize {
        self.order.len()
    }

    #[must_use]
    pub fn total_pages(&self) -> usize {
        pagination::total_pages(self.order.len(), self.view.rows_per_page)
    }

    // -- derived rows -----------------------------------------------------

    /// Every row passing the filters, in sorted order.
    #[must_use]
    pub fn filtered_sorted_rows(&self) -> Vec<&Row> {
        self.order.iter().map(|&i| &self.rows[i]).collect()
    }

    /// Rows of the current page.
    #[must_use]
    pub fn page_rows(&self) -> Vec<&Row> {
        self.page_indices().iter().map(|&i| &self.rows[i]).collect()
    }

    fn page_indices(&self) -> &[usize] {
        pagination::page(&self.order, self.view.current_page, self.view.rows_per_page)
    }

    /// Sorted distinct display values of `column` over all rows, ignoring
    /// empty values and cells that cannot be formatted.
    #[must_use]
    pub fn unique_values(&self, column: &str) -> Vec<String> {
        let format = self.columns.format_of(column);
        let values: BTreeSet<String> = self
            .rows
            .iter()
            .map(|row| row.value(column))
            .filter(|value| !value.is_empty())
            .filter_map(|value| try_format(value, format).ok())
            .collect();
        values.into_iter().collect()
    }

    #[must_use]
    pub fn has_active_filters(&self, column: &str) -> bool {
        self.filters.has_active(column)
    }

    #[must_use]
    pub fn sort_direction(&self, column: &str) -> Option<SortDirection> {
        self.filters.sort_for(column).map(|key| key.direction)
    }

    /// Header cells for the visible columns.
    #[must_use]
    pub fn headers(&self) -> Vec<HeaderCell> {
        self.visible_defs()
            .map(|column| HeaderCell {
                id: column.id.clone(),
                label: column.display_name.clone(),
                interactive: column.has_capabilities(),
                active: self.filters.has_active(&column.id),
                sort: self.sort_direction(&column.id),
            })
            .collect()
    }

    /// Display string for one cell. Formatting failures render as the
    /// error placeholder and never abort the surrounding table.
    #[must_use]
    pub fn render_cell(&self, row: &Row, column: &str) -> String {
        format_value(row.value(column), self.columns.format_of(column), column)
    }

    /// The current page, formatted for the visible columns.
    #[must_use]
    pub fn render_page(&self) -> Vec<RenderedRow> {
        let visible: Vec<&ColumnDef> = self.visible_defs().collect();
        self.page_indices()
            .iter()
            .map(|&i| {
                let row = &self.rows[i];
                RenderedRow {
                    key: row.key(i),
                    cells: visible
                        .iter()
                        .map(|column| format_value(row.value(&column.id), column.format, &column.id))
                        .collect(),
                }
            })
            .collect()
    }

    fn visible_defs(&self) -> impl Iterator<Item = &ColumnDef> {
        self.view
            .visible_columns
            .iter()
            .filter_map(|id| self.columns.get(id))
    }

    // -- mutators ---------------------------------------------------------

    pub fn set_search(&mut self, column: &str, text: &str) {
        let next = self.filters.with_search(&self.columns, column, text);
        self.replace_filters(next);
    }

    /// Adds or replaces the sort key for `column`. Without a priority the
    /// key is applied after every existing key.
    pub fn set_sort(&mut self, column: &str, direction: SortDirection, priority: Option<u32>) {
        let next = self
            .filters
            .with_sort(&self.columns, column, direction, priority);
        self.replace_sort(next);
    }

    pub fn remove_sort(&mut self, column: &str) {
        let next = self.filters.without_sort(column);
        self.replace_sort(next);
    }

    pub fn add_filter_value(&mut self, column: &str, value: &str) {
        let next = self.filters.with_filter_value(&self.columns, column, value);
        self.replace_filters(next);
    }

    pub fn remove_filter_value(&mut self, column: &str, value: &str) {
        let next = self.filters.without_filter_value(column, value);
        self.replace_filters(next);
    }

    pub fn set_range(&mut self, column: &str, range: RangeFilter) {
        let next = self.filters.with_range(&self.columns, column, range);
        self.replace_filters(next);
    }

    /// Clears search, filter, range and sort for `column` in one step.
    pub fn clear_column(&mut self, column: &str) {
        let next = self.filters.cleared_column(column);
        self.replace_filters(next);
    }

    /// Resets every selection and returns to page 1.
    pub fn clear_all(&mut self) {
        let before = self.snapshot();
        self.filters = FilterState::initial(&self.columns);
        self.view.current_page = 1;
        self.recompute();
        self.commit(&before);
    }

    /// Shows exactly the known columns among `ids`, in descriptor order.
    pub fn set_visible_columns<I, S>(&mut self, ids: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let requested: BTreeSet<String> = ids.into_iter().map(|id| id.as_ref().to_string()).collect();
        let visible: Vec<String> = self
            .columns
            .ids()
            .into_iter()
            .filter(|id| requested.contains(id))
            .collect();
        if visible == self.view.visible_columns {
            return;
        }
        let before = self.snapshot();
        self.view.visible_columns = visible;
        self.recompute();
        self.commit(&before);
    }

    /// Changes the page size and returns to page 1. Zero is ignored.
    pub fn set_rows_per_page(&mut self, rows_per_page: usize) {
        if rows_per_page == 0 {
            return;
        }
        let before = self.snapshot();
        self.view.rows_per_page = rows_per_page;
        self.view.current_page = 1;
        self.commit(&before);
    }

    /// Moves to `page`, clamped into the valid page range.
    pub fn set_page(&mut self, page: usize) {
        let before = self.snapshot();
        self.view.current_page = pagination::clamp_page(page, self.total_pages());
        self.commit(&before);
    }

    /// Replaces the whole state and notifies observers if anything changed.
    ///
    /// Used for state the user picked explicitly, such as a saved preset.
    /// Re-homing follows [`TableView::restore`].
    pub fn apply_snapshot(&mut self, snapshot: ViewSnapshot) {
        let before = self.snapshot();
        self.restore(snapshot);
        self.commit(&before);
    }

    /// Replaces the whole state without notifying observers.
    ///
    /// Used when state arrives from the URL, which must not be written back.
    /// The snapshot is re-homed onto this view's columns first, so stale or
    /// foreign entries cannot break the filter-state invariants.
    pub fn restore(&mut self, snapshot: ViewSnapshot) {
        let ViewSnapshot { filters, view } = snapshot;
        self.filters = filters.sanitized(&self.columns);
        let known: BTreeSet<String> = view.visible_columns.into_iter().collect();
        self.view.visible_columns = self
            .columns
            .ids()
            .into_iter()
            .filter(|id| known.contains(id))
            .collect();
        self.view.rows_per_page = if view.rows_per_page == 0 {
            self.default_rows_per_page
        } else {
            view.rows_per_page
        };
        self.recompute();
        self.view.current_page = pagination::clamp_page(view.current_page, self.total_pages());
    }

    // -- internals --------------------------------------------------------

    fn replace_filters(&mut self, next: FilterState) {
        if next == self.filters {
            return;
        }
        let before = self.snapshot();
        self.filters = next;
        self.view.current_page = 1;
        self.recompute();
        self.commit(&before);
    }

    fn replace_sort(&mut self, next: FilterState) {
        if next == self.filters {
            return;
        }
        let before = self.snapshot();
        self.filters = next;
        self.recompute();
        self.commit(&before);
    }

    fn recompute(&mut self) {
        let predicate =
            RowPredicate::compile(&self.filters, &self.columns, &self.view.visible_columns);
        let mut order: Vec<usize> = if predicate.is_trivial() {
            (0..self.rows.len()).collect()
        } else {
            (0..self.rows.len())
                .filter(|&i| predicate.matches(&self.rows[i]))
                .collect()
        };
        sort_indices(
            &mut order,
            &self.rows,
            self.filters.sort_keys(),
            &self.columns,
            &self.view.visible_columns,
        );
        debug!(
            total = self.rows.len(),
            matched = order.len(),
            sort_keys = self.filters.sort_keys().len(),
            "table view recomputed"
        );
        self.order = order;

        if self.view.current_page > self.total_pages().max(1) {
            self.view.current_page = 1;
        }
    }

    fn commit(&self, before: &ViewSnapshot) {
        if self.observers.is_empty() {
            return;
        }
        let after = self.snapshot();
        if after != *before {
            self.observers.on_change(&after);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use proptest::prelude::*;

    use super::*;
    use crate::types::Value;

    fn columns() -> Vec<ColumnDef> {
        vec![
            ColumnDef::new("identifier", "ID").searchable(),
            ColumnDef::new("name", "Name").searchable().sortable(),
            ColumnDef::new("class", "Class").filterable().sortable(),
            ColumnDef::new("level", "Level").sortable().rangeable(),
            ColumnDef::new("thumbnailUrl", "Image"),
        ]
    }

    fn hero(i: i64, name: &str, class: &str, level: i64) -> Row {
        Row::new()
            .with("identifier", format!("HERO-{i:02}"))
            .with("name", name)
            .with("class", class)
            .with("level", Value::Int(level))
    }

    fn heroes() -> Vec<Row> {
        vec![
            hero(1, "Aria", "Mage", 3),
            hero(2, "Bram", "Tank", 7),
            hero(3, "Cass", "Rogue", 5),
            hero(4, "Dax", "Mage", 9),
            hero(5, "Eve", "Rogue", 1),
        ]
    }

    fn view_with(rows_per_page: usize) -> TableView {
        let config = ViewConfig {
            rows_per_page,
            ..ViewConfig::default()
        };
        TableView::new(columns(), heroes(), &config)
    }

    fn names(rows: &[&Row]) -> Vec<String> {
        rows.iter().map(|r| r.value("name").to_string()).collect()
    }

    #[derive(Default)]
    struct Counter {
        calls: AtomicUsize,
    }

    impl ViewObserver for Counter {
        fn on_change(&self, _snapshot: &ViewSnapshot) {
            self.calls.fetch_add(1, Ordering::Relaxed);
        }
    }

    // ---- initialization ----

    #[test]
    fn new_view_shows_everything() {
        let view = view_with(0);
        assert_eq!(view.rows_per_page(), DEFAULT_ROWS_PER_PAGE);
        assert_eq!(view.current_page(), 1);
        assert_eq!(view.visible_columns().len(), 5);
        assert_eq!(view.filtered_count(), 5);
        assert_eq!(view.total_pages(), 1);
        assert!(view.filter_state().is_blank());
    }

    // ---- filtering ----

    #[test]
    fn filters_combine_with_and() {
        let mut view = view_with(25);
        view.add_filter_value("class", "Mage");
        view.add_filter_value("class", "Rogue");
        view.set_range("level", RangeFilter::new("2", ""));
        assert_eq!(names(&view.filtered_sorted_rows()), vec!["Aria", "Cass", "Dax"]);
        assert_eq!(view.total_count(), 5);

        view.remove_filter_value("class", "Mage");
        assert_eq!(names(&view.filtered_sorted_rows()), vec!["Cass"]);
    }

    #[test]
    fn filter_changes_reset_page() {
        let mut view = view_with(2);
        view.set_page(3);
        assert_eq!(view.current_page(), 3);
        view.set_search("name", "a");
        assert_eq!(view.current_page(), 1);
    }

    #[test]
    fn hiding_a_column_suspends_its_filter() {
        let mut view = view_with(25);
        view.set_search("name", "zzz");
        assert_eq!(view.filtered_count(), 0);

        view.set_visible_columns(["identifier", "class", "level"]);
        assert_eq!(view.filtered_count(), 5);
        assert_eq!(view.filter_state().search("name"), "zzz");

        view.set_visible_columns(["name", "identifier"]);
        assert_eq!(view.visible_columns(), &["identifier", "name"]);
        assert_eq!(view.filtered_count(), 0);
    }

    // ---- sorting ----

    #[test]
    fn sort_by_priority_and_keep_page() {
        let mut view = view_with(2);
        view.set_page(2);
        view.set_sort("class", SortDirection::Asc, None);
        view.set_sort("level", SortDirection::Desc, None);
        assert_eq!(view.current_page(), 2);
        assert_eq!(
            names(&view.filtered_sorted_rows()),
            vec!["Dax", "Aria", "Cass", "Eve", "Bram"]
        );
        assert_eq!(names(&view.page_rows()), vec!["Cass", "Eve"]);
        assert_eq!(view.sort_direction("level"), Some(SortDirection::Desc));

        view.remove_sort("class");
        assert_eq!(
            names(&view.filtered_sorted_rows()),
            vec!["Dax", "Bram", "Cass", "Aria", "Eve"]
        );
    }

    #[test]
    fn sort_on_incapable_column_is_a_no_op() {
        let mut view = view_with(25);
        view.set_sort("identifier", SortDirection::Desc, None);
        assert!(view.filter_state().sort_keys().is_empty());
    }

    // ---- pagination ----

    #[test]
    fn page_clamps_when_filters_shrink_results() {
        let mut view = view_with(2);
        assert_eq!(view.total_pages(), 3);
        view.set_page(3);
        view.set_visible_columns(["name"]);
        assert_eq!(view.current_page(), 3);

        view.set_visible_columns(["name", "class"]);
        view.set_sort("class", SortDirection::Asc, None);
        assert_eq!(view.current_page(), 3);

        // level is hidden, so the range does not constrain yet
        view.set_range("level", RangeFilter::new("0", "4"));
        assert_eq!(view.filtered_count(), 5);
        view.set_page(3);
        assert_eq!(view.current_page(), 3);

        view.set_visible_columns(["name", "class", "level"]);
        assert_eq!(view.filtered_count(), 2);
        assert_eq!(view.total_pages(), 1);
        assert_eq!(view.current_page(), 1);
    }

    #[test]
    fn set_page_is_clamped() {
        let mut view = view_with(2);
        view.set_page(99);
        assert_eq!(view.current_page(), 3);
        view.set_page(0);
        assert_eq!(view.current_page(), 1);
    }

    #[test]
    fn rows_per_page_change_resets_page() {
        let mut view = view_with(2);
        view.set_page(2);
        view.set_rows_per_page(1);
        assert_eq!(view.current_page(), 1);
        assert_eq!(view.total_pages(), 5);
        view.set_rows_per_page(0);
        assert_eq!(view.rows_per_page(), 1);
    }

    #[test]
    fn empty_result_keeps_page_one() {
        let mut view = view_with(2);
        view.set_search("name", "nobody");
        assert_eq!(view.total_pages(), 0);
        assert_eq!(view.current_page(), 1);
        assert!(view.page_rows().is_empty());
        view.set_page(5);
        assert_eq!(view.current_page(), 1);
    }

    // ---- clearing ----

    #[test]
    fn clear_column_and_clear_all() {
        let mut view = view_with(2);
        view.set_search("name", "a");
        view.add_filter_value("class", "Mage");
        view.set_sort("name", SortDirection::Desc, None);
        view.clear_column("name");
        assert!(!view.has_active_filters("name"));
        assert!(view.has_active_filters("class"));

        view.set_page(2);
        view.clear_all();
        assert!(view.filter_state().is_blank());
        assert_eq!(view.filter_state(), &FilterState::initial(view.columns()));
        assert_eq!(view.current_page(), 1);
    }

    // ---- rendering contract ----

    #[test]
    fn unique_values_are_sorted_display_values() {
        let mut rows = heroes();
        rows.push(Row::new().with("name", "Nobody").with("class", ""));
        let view = TableView::new(columns(), rows, &ViewConfig::default());
        assert_eq!(view.unique_values("class"), vec!["Mage", "Rogue", "Tank"]);
        assert_eq!(view.unique_values("level"), vec!["1", "3", "5", "7", "9"]);
    }

    #[test]
    fn headers_report_capabilities_and_activity() {
        let mut view = view_with(25);
        view.set_sort("level", SortDirection::Asc, None);
        let headers = view.headers();
        assert_eq!(headers.len(), 5);
        let level = headers.iter().find(|h| h.id == "level").unwrap();
        assert!(level.interactive && level.active);
        assert_eq!(level.sort, Some(SortDirection::Asc));
        let image = headers.iter().find(|h| h.id == "thumbnailUrl").unwrap();
        assert!(!image.interactive);
        assert!(!image.active);
    }

    #[test]
    fn bad_cells_render_placeholder_and_rest_survives() {
        let rows = vec![hero(1, "Aria", "Mage", 3).with("name", Value::Array(vec![]))];
        let view = TableView::new(columns(), rows, &ViewConfig::default());
        let page = view.render_page();
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].key, "HERO-01");
        assert_eq!(page[0].cells, vec!["HERO-01", "Error", "Mage", "3", "-"]);
    }

    // ---- observers ----

    #[test]
    fn observers_see_only_effective_changes() {
        let counter = Arc::new(Counter::default());
        let mut view = view_with(2);
        view.add_observer(counter.clone());

        view.set_search("name", "a");
        view.set_search("name", "a");
        view.set_sort("identifier", SortDirection::Asc, None);
        view.set_page(1);
        assert_eq!(counter.calls.load(Ordering::Relaxed), 1);

        let snapshot = view.snapshot();
        view.clear_all();
        view.restore(snapshot);
        assert_eq!(counter.calls.load(Ordering::Relaxed), 2);
        assert_eq!(view.filter_state().search("name"), "a");
    }

    #[test]
    fn restore_is_silent_but_apply_snapshot_notifies() {
        let counter = Arc::new(Counter::default());
        let mut view = view_with(2);
        view.set_search("name", "a");
        let snapshot = view.snapshot();
        view.clear_all();
        view.add_observer(counter.clone());

        view.restore(snapshot.clone());
        assert_eq!(counter.calls.load(Ordering::Relaxed), 0);

        view.clear_all();
        assert_eq!(counter.calls.load(Ordering::Relaxed), 1);
        view.apply_snapshot(snapshot.clone());
        assert_eq!(counter.calls.load(Ordering::Relaxed), 2);
        assert_eq!(view.filter_state().search("name"), "a");

        view.apply_snapshot(snapshot);
        assert_eq!(counter.calls.load(Ordering::Relaxed), 2);
    }

    // ---- properties ----

    #[derive(Debug, Clone)]
    enum Op {
        Search(String),
        Sort(bool, Option<u32>),
        AddClass(String),
        RemoveClass(String),
        Range(i64, i64),
        Clear,
        ClearAll,
        Visible(Vec<bool>),
        Rows(usize),
        Page(usize),
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            "[a-e]{0,2}".prop_map(Op::Search),
            (any::<bool>(), proptest::option::of(1u32..4)).prop_map(|(d, p)| Op::Sort(d, p)),
            prop::sample::select(vec!["Mage", "Tank", "Rogue"]).prop_map(|c| Op::AddClass(c.to_string())),
            prop::sample::select(vec!["Mage", "Tank", "Rogue"]).prop_map(|c| Op::RemoveClass(c.to_string())),
            (0i64..10, 0i64..10).prop_map(|(a, b)| Op::Range(a, b)),
            Just(Op::Clear),
            Just(Op::ClearAll),
            prop::collection::vec(any::<bool>(), 5).prop_map(Op::Visible),
            (0usize..4).prop_map(Op::Rows),
            (0usize..8).prop_map(Op::Page),
        ]
    }

    fn apply(view: &mut TableView, op: &Op) {
        match op {
            Op::Search(text) => view.set_search("name", text),
            Op::Sort(desc, priority) => {
                let direction = if *desc { SortDirection::Desc } else { SortDirection::Asc };
                view.set_sort("level", direction, *priority);
            }
            Op::AddClass(c) => view.add_filter_value("class", c),
            Op::RemoveClass(c) => view.remove_filter_value("class", c),
            Op::Range(a, b) => view.set_range("level", RangeFilter::new(&a.to_string(), &b.to_string())),
            Op::Clear => view.clear_column("class"),
            Op::ClearAll => view.clear_all(),
            Op::Visible(mask) => {
                let ids: Vec<String> = view
                    .columns()
                    .ids()
                    .into_iter()
                    .zip(mask)
                    .filter(|(_, keep)| **keep)
                    .map(|(id, _)| id)
                    .collect();
                view.set_visible_columns(ids);
            }
            Op::Rows(n) => view.set_rows_per_page(*n),
            Op::Page(p) => view.set_page(*p),
        }
    }

    proptest! {
        #[test]
        fn page_invariant_holds_after_any_transition(ops in prop::collection::vec(op(), 0..30)) {
            let mut view = view_with(2);
            let source = heroes();
            for op in &ops {
                apply(&mut view, op);
                prop_assert!(view.current_page() >= 1);
                prop_assert!(view.current_page() <= view.total_pages().max(1));
                prop_assert!(view.page_rows().len() <= view.rows_per_page());
                prop_assert_eq!(view.rows(), source.as_slice());
            }
        }

        #[test]
        fn recomputing_is_idempotent(ops in prop::collection::vec(op(), 0..20)) {
            let mut view = view_with(2);
            for op in &ops {
                apply(&mut view, op);
            }
            let first: Vec<Row> = view.filtered_sorted_rows().into_iter().cloned().collect();
            let snapshot = view.snapshot();
            let mut again = TableView::new(columns(), heroes(), &ViewConfig::default());
            again.restore(snapshot.clone());
            again.restore(snapshot);
            let second: Vec<Row> = again.filtered_sorted_rows().into_iter().cloned().collect();
            prop_assert_eq!(first, second);
        }

        #[test]
        fn pages_concatenate_to_filtered_rows(ops in prop::collection::vec(op(), 0..20)) {
            let mut view = view_with(2);
            for op in &ops {
                apply(&mut view, op);
            }
            let all: Vec<Row> = view.filtered_sorted_rows().into_iter().cloned().collect();
            let mut rebuilt = Vec::new();
            for page in 1..=view.total_pages() {
                view.set_page(page);
                rebuilt.extend(view.page_rows().into_iter().cloned());
            }
            prop_assert_eq!(rebuilt, all);
        }
    }
}
