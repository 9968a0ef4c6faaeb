//! Multi-key row ordering.
//!
//! Each key compares display-formatted values: numerically when both sides
//! parse as numbers, otherwise as case-insensitive text. Numbers order
//! before text so mixed columns still form a total order. Absent values go
//! last whatever the direction, and rows equal on every key keep their
//! original relative order.

use std::cmp::Ordering;

use crate::column::ColumnSet;
use crate::filter::{SortDirection, SortKey};
use crate::format::format_value;
use crate::types::{parse_finite, Row};

/// Pre-computed comparison form of one cell.
#[derive(Debug, Clone, PartialEq)]
enum SortCell {
    Number(f64),
    Text(String),
    Absent,
}

impl SortCell {
    fn of(row: &Row, column: &str, columns: &ColumnSet) -> Self {
        let value = row.value(column);
        if value.is_empty() {
            return SortCell::Absent;
        }
        let display = format_value(value, columns.format_of(column), column);
        match parse_finite(&display) {
            Some(n) => SortCell::Number(n),
            None => SortCell::Text(display.to_lowercase()),
        }
    }

    fn compare(&self, other: &Self, direction: SortDirection) -> Ordering {
        let ordering = match (self, other) {
            (SortCell::Absent, SortCell::Absent) => return Ordering::Equal,
            (SortCell::Absent, _) => return Ordering::Greater,
            (_, SortCell::Absent) => return Ordering::Less,
            (SortCell::Number(a), SortCell::Number(b)) => a.total_cmp(b),
            (SortCell::Number(_), SortCell::Text(_)) => Ordering::Less,
            (SortCell::Text(_), SortCell::Number(_)) => Ordering::Greater,
            (SortCell::Text(a), SortCell::Text(b)) => a.cmp(b),
        };
        match direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    }
}

/// Sorts `indices` (positions into `rows`) by `keys`, applied in the
/// order given. Keys on columns outside `visible` are skipped.
pub fn sort_indices(
    indices: &mut Vec<usize>,
    rows: &[Row],
    keys: &[SortKey],
    columns: &ColumnSet,
    visible: &[String],
) {
    let keys: Vec<&SortKey> = keys
        .iter()
        .filter(|key| visible.iter().any(|v| *v == key.column))
        .collect();
    if keys.is_empty() || indices.len() < 2 {
        return;
    }

    let mut decorated: Vec<(Vec<SortCell>, usize)> = indices
        .iter()
        .map(|&i| {
            let cells = keys
                .iter()
                .map(|key| SortCell::of(&rows[i], &key.column, columns))
                .collect();
            (cells, i)
        })
        .collect();

    // `sort_by` is stable, which provides the final tiebreak.
    decorated.sort_by(|(a, _), (b, _)| {
        keys.iter()
            .enumerate()
            .map(|(k, key)| a[k].compare(&b[k], key.direction))
            .find(|ordering| ordering.is_ne())
            .unwrap_or(Ordering::Equal)
    });

    indices.clear();
    indices.extend(decorated.into_iter().map(|(_, i)| i));
}
