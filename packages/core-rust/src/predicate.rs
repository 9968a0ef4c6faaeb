//! Row predicate compiled from a [`FilterState`].
//!
//! Compilation resolves everything that does not depend on the row
//! (lower-cased needles, parsed range bounds, column formats) once, so
//! evaluation over a large row set only touches row values.

use std::collections::BTreeSet;

use crate::column::{CellFormat, ColumnSet};
use crate::filter::FilterState;
use crate::format::{format_value, try_format};
use crate::types::Row;

#[derive(Debug)]
enum Clause<'a> {
    /// Display value contains `needle` (already lower-cased).
    Contains {
        column: &'a str,
        format: CellFormat,
        needle: String,
    },
    /// Raw or display value is one of `accepted`.
    OneOf {
        column: &'a str,
        format: CellFormat,
        accepted: &'a BTreeSet<String>,
    },
    /// Raw value is a finite number within `[min, max]`.
    Between { column: &'a str, min: f64, max: f64 },
}

/// Conjunction of every active clause on visible columns.
#[derive(Debug)]
pub struct RowPredicate<'a> {
    clauses: Vec<Clause<'a>>,
}

impl<'a> RowPredicate<'a> {
    /// Builds the predicate. Selections on columns outside `visible` are
    /// inert: hiding a column keeps its state but stops it constraining rows.
    #[must_use]
    pub fn compile(state: &'a FilterState, columns: &ColumnSet, visible: &[String]) -> Self {
        let is_visible = |column: &str| visible.iter().any(|v| v == column);
        let mut clauses = Vec::new();

        for (column, text) in state.active_searches() {
            if is_visible(column) {
                clauses.push(Clause::Contains {
                    column,
                    format: columns.format_of(column),
                    needle: text.to_lowercase(),
                });
            }
        }
        for (column, accepted) in state.active_filters() {
            if is_visible(column) {
                clauses.push(Clause::OneOf {
                    column,
                    format: columns.format_of(column),
                    accepted,
                });
            }
        }
        for (column, range) in state.active_ranges() {
            if is_visible(column) {
                clauses.push(Clause::Between {
                    column,
                    min: range.min_bound().unwrap_or(f64::NEG_INFINITY),
                    max: range.max_bound().unwrap_or(f64::INFINITY),
                });
            }
        }

        Self { clauses }
    }

    /// `true` when no clause is active and every row passes.
    #[must_use]
    pub fn is_trivial(&self) -> bool {
        self.clauses.is_empty()
    }

    #[must_use]
    pub fn matches(&self, row: &Row) -> bool {
        self.clauses.iter().all(|clause| clause.matches(row))
    }
}

impl Clause<'_> {
    fn matches(&self, row: &Row) -> bool {
        match self {
            Clause::Contains {
                column,
                format,
                needle,
            } => {
                let value = row.value(column);
                if value.is_empty() {
                    return false;
                }
                try_format(value, *format)
                    .is_ok_and(|shown| shown.to_lowercase().contains(needle.as_str()))
            }
            Clause::OneOf {
                column,
                format,
                accepted,
            } => {
                let value = row.value(column);
                accepted.contains(&value.to_string())
                    || (!value.is_empty() && accepted.contains(&format_value(value, *format, column)))
            }
            Clause::Between { column, min, max } => row
                .value(column)
                .as_number()
                .is_some_and(|n| n >= *min && n <= *max),
        }
    }
}
