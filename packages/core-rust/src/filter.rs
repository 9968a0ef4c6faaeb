//! Immutable filter state: search, categorical filter, numeric range and
//! multi-key sort selections, each keyed by column id.
//!
//! Every transition is a pure function returning a new [`FilterState`].
//! Transitions that name an unknown column, or a column lacking the
//! relevant capability, return an unchanged copy, so a sub-map only ever
//! holds entries for capable columns.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::column::ColumnSet;
use crate::types::parse_finite;

/// Direction of one sort key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    /// Parses `asc`/`desc` case-insensitively. Anything else is `None`.
    #[must_use]
    pub fn parse(text: &str) -> Option<Self> {
        match text.trim().to_ascii_lowercase().as_str() {
            "asc" => Some(SortDirection::Asc),
            "desc" => Some(SortDirection::Desc),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

/// One entry of the multi-key sort. Lower `priority` is applied first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SortKey {
    pub column: String,
    pub direction: SortDirection,
    pub priority: u32,
}

/// Inclusive numeric bounds, kept as the text the user typed.
///
/// A bound that does not parse as a finite number is open. The filter is
/// active when at least one bound parses.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RangeFilter {
    pub min: String,
    pub max: String,
}

impl RangeFilter {
    #[must_use]
    pub fn new(min: &str, max: &str) -> Self {
        Self {
            min: min.to_string(),
            max: max.to_string(),
        }
    }

    #[must_use]
    pub fn min_bound(&self) -> Option<f64> {
        parse_finite(&self.min)
    }

    #[must_use]
    pub fn max_bound(&self) -> Option<f64> {
        parse_finite(&self.max)
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.min_bound().is_some() || self.max_bound().is_some()
    }

    /// Whether `n` lies within the bounds. With `min > max` nothing does.
    #[must_use]
    pub fn contains(&self, n: f64) -> bool {
        let min = self.min_bound().unwrap_or(f64::NEG_INFINITY);
        let max = self.max_bound().unwrap_or(f64::INFINITY);
        n >= min && n <= max
    }
}

/// All active search/filter/range/sort selections of one table view.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FilterState {
    #[serde(rename = "searchable", default)]
    search: BTreeMap<String, String>,
    #[serde(rename = "sortable", default)]
    sort: Vec<SortKey>,
    #[serde(rename = "filterable", default)]
    filter: BTreeMap<String, BTreeSet<String>>,
    #[serde(rename = "rangeble", default)]
    range: BTreeMap<String, RangeFilter>,
}

impl FilterState {
    /// Empty state with one blank entry per capability flagged on each column.
    #[must_use]
    pub fn initial(columns: &ColumnSet) -> Self {
        let mut state = Self::default();
        for column in columns.iter() {
            if column.searchable {
                state.search.insert(column.id.clone(), String::new());
            }
            if column.filterable {
                state.filter.insert(column.id.clone(), BTreeSet::new());
            }
            if column.rangeable {
                state.range.insert(column.id.clone(), RangeFilter::default());
            }
        }
        state
    }

    /// Re-homes a state of unknown provenance (URL, preset) onto `columns`:
    /// entries for unknown or incapable columns are dropped and missing blank
    /// entries are added. Sort keys keep their priorities; they are ordered
    /// by priority and only the first key per column survives.
    #[must_use]
    pub fn sanitized(&self, columns: &ColumnSet) -> Self {
        let mut state = Self::initial(columns);
        for (column, text) in &self.search {
            if let Some(slot) = state.search.get_mut(column) {
                slot.clone_from(text);
            }
        }
        for (column, values) in &self.filter {
            if let Some(slot) = state.filter.get_mut(column) {
                slot.clone_from(values);
            }
        }
        for (column, range) in &self.range {
            if let Some(slot) = state.range.get_mut(column) {
                slot.clone_from(range);
            }
        }
        let mut keys: Vec<&SortKey> = self
            .sort
            .iter()
            .filter(|key| columns.get(&key.column).is_some_and(|c| c.sortable))
            .collect();
        keys.sort_by_key(|key| key.priority);
        for key in keys {
            if state.sort_for(&key.column).is_none() {
                state.sort.push(key.clone());
            }
        }
        state
    }

    // -- transitions ------------------------------------------------------

    #[must_use]
    pub fn with_search(&self, columns: &ColumnSet, column: &str, text: &str) -> Self {
        let mut next = self.clone();
        if columns.get(column).is_some_and(|c| c.searchable) {
            next.search.insert(column.to_string(), text.to_string());
        }
        next
    }

    /// Adds or replaces the sort key for `column`.
    ///
    /// Without an explicit priority the key is appended after all existing
    /// keys. Keys stay ordered by ascending priority; equal priorities keep
    /// insertion order.
    #[must_use]
    pub fn with_sort(
        &self,
        columns: &ColumnSet,
        column: &str,
        direction: SortDirection,
        priority: Option<u32>,
    ) -> Self {
        let mut next = self.clone();
        if !columns.get(column).is_some_and(|c| c.sortable) {
            return next;
        }
        next.sort.retain(|key| key.column != column);
        let priority = priority.unwrap_or_else(|| {
            next.sort
                .iter()
                .map(|key| key.priority)
                .max()
                .map_or(1, |max| max.saturating_add(1))
        });
        next.sort.push(SortKey {
            column: column.to_string(),
            direction,
            priority,
        });
        next.sort.sort_by_key(|key| key.priority);
        next
    }

    #[must_use]
    pub fn without_sort(&self, column: &str) -> Self {
        let mut next = self.clone();
        next.sort.retain(|key| key.column != column);
        next
    }

    #[must_use]
    pub fn with_filter_value(&self, columns: &ColumnSet, column: &str, value: &str) -> Self {
        let mut next = self.clone();
        if columns.get(column).is_some_and(|c| c.filterable) {
            next.filter
                .entry(column.to_string())
                .or_default()
                .insert(value.to_string());
        }
        next
    }

    #[must_use]
    pub fn without_filter_value(&self, column: &str, value: &str) -> Self {
        let mut next = self.clone();
        if let Some(values) = next.filter.get_mut(column) {
            values.remove(value);
        }
        next
    }

    #[must_use]
    pub fn with_range(&self, columns: &ColumnSet, column: &str, range: RangeFilter) -> Self {
        let mut next = self.clone();
        if columns.get(column).is_some_and(|c| c.rangeable) {
            next.range.insert(column.to_string(), range);
        }
        next
    }

    /// Blanks every selection for `column`; other columns are untouched.
    #[must_use]
    pub fn cleared_column(&self, column: &str) -> Self {
        let mut next = self.clone();
        if let Some(text) = next.search.get_mut(column) {
            text.clear();
        }
        if let Some(values) = next.filter.get_mut(column) {
            values.clear();
        }
        if let Some(range) = next.range.get_mut(column) {
            *range = RangeFilter::default();
        }
        next.sort.retain(|key| key.column != column);
        next
    }

    // -- queries ----------------------------------------------------------

    /// Current search text for `column` (empty when unset).
    #[must_use]
    pub fn search(&self, column: &str) -> &str {
        self.search.get(column).map_or("", String::as_str)
    }

    #[must_use]
    pub fn filter_values(&self, column: &str) -> Option<&BTreeSet<String>> {
        self.filter.get(column)
    }

    #[must_use]
    pub fn range(&self, column: &str) -> Option<&RangeFilter> {
        self.range.get(column)
    }

    /// Sort keys in application order.
    #[must_use]
    pub fn sort_keys(&self) -> &[SortKey] {
        &self.sort
    }

    #[must_use]
    pub fn sort_for(&self, column: &str) -> Option<&SortKey> {
        self.sort.iter().find(|key| key.column == column)
    }

    /// Non-empty search texts.
    pub fn active_searches(&self) -> impl Iterator<Item = (&str, &str)> {
        self.search
            .iter()
            .filter(|(_, text)| !text.is_empty())
            .map(|(column, text)| (column.as_str(), text.as_str()))
    }

    /// Non-empty accepted-value sets.
    pub fn active_filters(&self) -> impl Iterator<Item = (&str, &BTreeSet<String>)> {
        self.filter
            .iter()
            .filter(|(_, values)| !values.is_empty())
            .map(|(column, values)| (column.as_str(), values))
    }

    /// Ranges with at least one parseable bound.
    pub fn active_ranges(&self) -> impl Iterator<Item = (&str, &RangeFilter)> {
        self.range
            .iter()
            .filter(|(_, range)| range.is_active())
            .map(|(column, range)| (column.as_str(), range))
    }

    /// Whether any selection (including sort) is active on `column`.
    #[must_use]
    pub fn has_active(&self, column: &str) -> bool {
        !self.search(column).is_empty()
            || self.filter.get(column).is_some_and(|v| !v.is_empty())
            || self.range.get(column).is_some_and(RangeFilter::is_active)
            || self.sort_for(column).is_some()
    }

    /// Whether nothing at all is selected.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.sort.is_empty()
            && self.active_searches().next().is_none()
            && self.active_filters().next().is_none()
            && self.active_ranges().next().is_none()
    }

    /// Column ids holding an entry in each sub-map: search, filter, range, sort.
    #[must_use]
    pub fn entry_columns(&self) -> [Vec<&str>; 4] {
        [
            self.search.keys().map(String::as_str).collect(),
            self.filter.keys().map(String::as_str).collect(),
            self.range.keys().map(String::as_str).collect(),
            self.sort.iter().map(|key| key.column.as_str()).collect(),
        ]
    }
}
