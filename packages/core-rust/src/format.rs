//! Display formatting for cell values.
//!
//! Formatting is a pure function of `(raw value, column format)`. The same
//! display string is used for rendering, case-insensitive search, sorting
//! and the distinct-value lists that feed filter choices. Range filtering
//! never goes through here: it compares raw numbers so rounding cannot
//! shift a value across a bound.
//!
//! Every formatter is idempotent: formatting an already formatted string
//! with the same column format yields it unchanged.

use tracing::warn;

use crate::column::CellFormat;
use crate::types::Value;

/// Rendered for null, missing and empty-string values.
pub const EMPTY_PLACEHOLDER: &str = "-";

/// Rendered in place of a cell whose value cannot be formatted.
pub const ERROR_PLACEHOLDER: &str = "Error";

/// Addresses at most this many characters long are shown in full.
const ADDRESS_FULL_LEN: usize = 12;

/// Characters kept on each side of an elided address.
const ADDRESS_KEEP: usize = 6;

/// A value whose shape does not fit the column's formatter.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormatError {
    #[error("{format:?} column cannot display a {kind} value")]
    UnexpectedShape {
        format: CellFormat,
        kind: &'static str,
    },
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Int(_) => "integer",
        Value::Float(_) => "float",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Map(_) => "object",
    }
}

/// Formats `value` for display, or reports why it cannot be.
///
/// # Errors
///
/// Returns [`FormatError::UnexpectedShape`] for arrays and objects in any
/// column, for non-string addresses, and for booleans in numeric columns.
pub fn try_format(value: &Value, format: CellFormat) -> Result<String, FormatError> {
    if value.is_empty() {
        return Ok(EMPTY_PLACEHOLDER.to_string());
    }
    let shape_error = || FormatError::UnexpectedShape {
        format,
        kind: kind_of(value),
    };
    if value.is_composite() {
        return Err(shape_error());
    }

    match format {
        CellFormat::Text | CellFormat::Image => Ok(value.to_string()),
        CellFormat::Address => match value {
            Value::String(s) => Ok(elide_address(s)),
            _ => Err(shape_error()),
        },
        CellFormat::Decimal => match value {
            Value::Bool(_) => Err(shape_error()),
            _ => Ok(value
                .as_number()
                .map_or_else(|| value.to_string(), round_two_places)),
        },
        CellFormat::Number => match value {
            Value::Bool(_) => Err(shape_error()),
            Value::Int(i) => Ok(i.to_string()),
            _ => Ok(value
                .as_number()
                .map_or_else(|| value.to_string(), canonical_number)),
        },
    }
}

/// Formats `value` for display, substituting [`ERROR_PLACEHOLDER`] when the
/// value cannot be formatted. The failure is logged and never propagated,
/// so one bad cell cannot take down the rest of a table.
#[must_use]
pub fn format_value(value: &Value, format: CellFormat, column: &str) -> String {
    match try_format(value, format) {
        Ok(text) => text,
        Err(err) => {
            warn!(column, error = %err, "cell format failed");
            ERROR_PLACEHOLDER.to_string()
        }
    }
}

/// `erd1qyu5wthldzr8wx5c9ucg8kjagg0jfs53s8nr3zpz3hypefsdd8ssycr6th`
/// becomes `erd1qy...ycr6th`.
fn elide_address(address: &str) -> String {
    let count = address.chars().count();
    if count <= ADDRESS_FULL_LEN {
        return address.to_string();
    }
    let head: String = address.chars().take(ADDRESS_KEEP).collect();
    let tail: String = address.chars().skip(count - ADDRESS_KEEP).collect();
    format!("{head}...{tail}")
}

fn round_two_places(n: f64) -> String {
    let fixed = format!("{n:.2}");
    let trimmed = fixed.trim_end_matches('0').trim_end_matches('.');
    normalize_zero(trimmed)
}

fn canonical_number(n: f64) -> String {
    normalize_zero(&n.to_string())
}

fn normalize_zero(text: &str) -> String {
    if text == "-0" {
        "0".to_string()
    } else {
        text.to_string()
    }
}
