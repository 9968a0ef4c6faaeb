//! URL query-string codec for view state.
//!
//! # Parameters
//!
//! | name            | value                                        |
//! |-----------------|----------------------------------------------|
//! | `search_<col>`  | search text                                  |
//! | `sort`          | `col:dir:priority`, comma-joined             |
//! | `filter_<col>`  | accepted values, comma-joined                |
//! | `range_<col>`   | `min-max`, either side may be empty          |
//! | `page`          | current page                                 |
//! | `rows`          | rows per page                                |
//! | `columns`       | visible column ids, comma-joined             |
//!
//! Parameters at their default value are omitted. Inside comma-joined
//! lists a literal `,` is written `\,` and a literal `\` is written `\\`.
//! Decoding ignores unknown names and malformed values, so any query
//! string, including one from an older or different table, loads safely.

use std::sync::LazyLock;

use parking_lot::Mutex;
use regex::Regex;
use url::form_urlencoded;

use crate::column::ColumnSet;
use crate::filter::{FilterState, RangeFilter, SortDirection};
use crate::observer::ViewObserver;
use crate::view::{TableView, ViewSnapshot, ViewState};

static RANGE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(-?[0-9.]+)?-(-?[0-9.]+)?$").expect("range parameter pattern is valid")
});

const SEARCH_PREFIX: &str = "search_";
const FILTER_PREFIX: &str = "filter_";
const RANGE_PREFIX: &str = "range_";

/// Encodes and decodes [`ViewSnapshot`]s for one column set.
#[derive(Debug, Clone)]
pub struct QueryCodec {
    columns: ColumnSet,
    default_rows_per_page: usize,
}

impl QueryCodec {
    #[must_use]
    pub fn new(columns: ColumnSet, default_rows_per_page: usize) -> Self {
        Self {
            columns,
            default_rows_per_page,
        }
    }

    #[must_use]
    pub fn for_view(view: &TableView) -> Self {
        Self::new(view.columns().clone(), view.default_rows_per_page())
    }

    /// Serializes `snapshot`, leaving out everything at its default.
    #[must_use]
    pub fn encode(&self, snapshot: &ViewSnapshot) -> String {
        let filters = &snapshot.filters;
        let mut out = form_urlencoded::Serializer::new(String::new());

        for column in self.columns.iter() {
            let text = filters.search(&column.id);
            if !text.is_empty() {
                out.append_pair(&format!("{SEARCH_PREFIX}{}", column.id), text);
            }
        }

        if !filters.sort_keys().is_empty() {
            let sort = filters
                .sort_keys()
                .iter()
                .map(|key| {
                    format!(
                        "{}:{}:{}",
                        escape(&key.column),
                        key.direction.as_str(),
                        key.priority
                    )
                })
                .collect::<Vec<_>>()
                .join(",");
            out.append_pair("sort", &sort);
        }

        for column in self.columns.iter() {
            if let Some(values) = filters.filter_values(&column.id) {
                if !values.is_empty() {
                    out.append_pair(
                        &format!("{FILTER_PREFIX}{}", column.id),
                        &join_escaped(values.iter().map(String::as_str)),
                    );
                }
            }
            if let Some(range) = filters.range(&column.id) {
                if range.is_active() {
                    let bound = |b: Option<f64>| b.map(|n| n.to_string()).unwrap_or_default();
                    out.append_pair(
                        &format!("{RANGE_PREFIX}{}", column.id),
                        &format!("{}-{}", bound(range.min_bound()), bound(range.max_bound())),
                    );
                }
            }
        }

        let view = &snapshot.view;
        if view.current_page != 1 {
            out.append_pair("page", &view.current_page.to_string());
        }
        if view.rows_per_page != self.default_rows_per_page {
            out.append_pair("rows", &view.rows_per_page.to_string());
        }
        if view.visible_columns != self.columns.ids() {
            out.append_pair(
                "columns",
                &join_escaped(view.visible_columns.iter().map(String::as_str)),
            );
        }

        out.finish()
    }

    /// Parses a query string (or a full URL) into a snapshot.
    ///
    /// The result is not clamped against any row set; restoring it into a
    /// [`TableView`] does that.
    #[must_use]
    pub fn decode(&self, input: &str) -> ViewSnapshot {
        let mut filters = FilterState::initial(&self.columns);
        let mut view = ViewState {
            visible_columns: self.columns.ids(),
            rows_per_page: self.default_rows_per_page,
            current_page: 1,
        };
        let mut sort: Vec<(String, SortDirection, Option<u32>)> = Vec::new();

        for (name, value) in form_urlencoded::parse(query_part(input).as_bytes()) {
            match &*name {
                "sort" => sort.extend(split_escaped(&value).iter().filter_map(|e| parse_sort(e))),
                "page" => {
                    if let Ok(page) = value.trim().parse::<usize>() {
                        view.current_page = page;
                    }
                }
                "rows" => {
                    if let Ok(rows) = value.trim().parse::<usize>() {
                        if rows > 0 {
                            view.rows_per_page = rows;
                        }
                    }
                }
                "columns" => {
                    let wanted = split_escaped(&value);
                    view.visible_columns = self
                        .columns
                        .ids()
                        .into_iter()
                        .filter(|id| wanted.contains(id))
                        .collect();
                }
                name => {
                    if let Some(column) = name.strip_prefix(SEARCH_PREFIX) {
                        filters = filters.with_search(&self.columns, column, &value);
                    } else if let Some(column) = name.strip_prefix(FILTER_PREFIX) {
                        for accepted in split_escaped(&value) {
                            filters = filters.with_filter_value(&self.columns, column, &accepted);
                        }
                    } else if let Some(column) = name.strip_prefix(RANGE_PREFIX) {
                        if let Some(caps) = RANGE_PATTERN.captures(value.trim()) {
                            let side = |i: usize| caps.get(i).map_or("", |m| m.as_str());
                            let range = RangeFilter::new(side(1), side(2));
                            filters = filters.with_range(&self.columns, column, range);
                        }
                    }
                }
            }
        }

        // Explicit priorities first, in priority order; bare keys keep
        // their position and are appended after.
        sort.sort_by_key(|(_, _, priority)| priority.map_or(u64::MAX, u64::from));
        for (column, direction, priority) in sort {
            filters = filters.with_sort(&self.columns, &column, direction, priority);
        }

        ViewSnapshot { filters, view }
    }
}

/// Strips everything up to `?` and from `#`, so full URLs decode too.
fn query_part(input: &str) -> &str {
    let query = input.split_once('?').map_or(input, |(_, q)| q);
    query.split_once('#').map_or(query, |(q, _)| q)
}

/// `col:dir:priority` or `col:dir`. The column may itself contain `:`.
fn parse_sort(entry: &str) -> Option<(String, SortDirection, Option<u32>)> {
    let (head, last) = entry.rsplit_once(':')?;
    if let Ok(priority) = last.trim().parse::<u32>() {
        let (column, direction) = head.rsplit_once(':')?;
        return SortDirection::parse(direction).map(|d| (column.to_string(), d, Some(priority)));
    }
    SortDirection::parse(last).map(|d| (head.to_string(), d, None))
}

fn escape(item: &str) -> String {
    item.replace('\\', "\\\\").replace(',', "\\,")
}

fn join_escaped<'a>(items: impl Iterator<Item = &'a str>) -> String {
    items.map(escape).collect::<Vec<_>>().join(",")
}

/// Inverse of [`join_escaped`]. A present but empty list is one empty item.
fn split_escaped(list: &str) -> Vec<String> {
    let mut items = Vec::new();
    let mut current = String::new();
    let mut chars = list.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => current.extend(chars.next()),
            ',' => items.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    items.push(current);
    items
}

/// Observer that keeps the query string of the latest committed state,
/// for a front end to mirror into the address bar.
#[derive(Debug)]
pub struct QuerySync {
    codec: QueryCodec,
    latest: Mutex<String>,
}

impl QuerySync {
    /// Starts from the view's current state.
    #[must_use]
    pub fn for_view(view: &TableView) -> Self {
        let codec = QueryCodec::for_view(view);
        let latest = Mutex::new(codec.encode(&view.snapshot()));
        Self { codec, latest }
    }

    /// Query string of the most recent state.
    #[must_use]
    pub fn current(&self) -> String {
        self.latest.lock().clone()
    }
}

impl ViewObserver for QuerySync {
    fn on_change(&self, snapshot: &ViewSnapshot) {
        *self.latest.lock() = self.codec.encode(snapshot);
    }
}

impl TableView {
    /// Query string reproducing the current state.
    #[must_use]
    pub fn query_string(&self) -> String {
        QueryCodec::for_view(self).encode(&self.snapshot())
    }

    /// Loads state from a query string or URL. Observers are not notified.
    pub fn apply_query(&mut self, query: &str) {
        let snapshot = QueryCodec::for_view(self).decode(query);
        self.restore(snapshot);
    }
}
