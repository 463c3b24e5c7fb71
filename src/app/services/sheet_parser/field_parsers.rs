//! Field parsing utilities for sheet rows
//!
//! Every helper here is total: a missing column, a short row or an unparsable
//! value falls back to an empty string, 0.0 or false.

use super::column_mapping::{ColumnMapping, SheetField, clean_cell};
use crate::constants::{self, AFFIRMATIVE_TOKEN};
use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

static LEADING_NUMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[+-]?(\d+\.?\d*|\.\d+)([eE][+-]?\d+)?")
        .expect("leading number pattern is a valid regex")
});

/// Get a cleaned field value, empty when absent
pub fn get_text(row: &[String], mapping: &ColumnMapping, field: SheetField) -> String {
    mapping
        .get_index(field)
        .and_then(|index| row.get(index))
        .map(|cell| clean_cell(cell))
        .unwrap_or_default()
}

/// Get a field with the "absent" sentinels collapsed to empty
pub fn get_normalized_text(row: &[String], mapping: &ColumnMapping, field: SheetField) -> String {
    constants::normalize_sentinel(&get_text(row, mapping, field))
}

/// Get a numeric field, 0.0 when absent or unparsable
pub fn get_number(row: &[String], mapping: &ColumnMapping, field: SheetField) -> f64 {
    let raw = get_text(row, mapping, field);
    let value = parse_number(&raw);
    if value == 0.0 && !raw.is_empty() && raw != "0" {
        debug!(
            "Field '{}' = '{}' read as 0.0",
            field.keyword(),
            raw
        );
    }
    value
}

/// Lenient float parsing
///
/// Reads the leading numeric prefix, so "2.91%" gives 2.91. Anything that does
/// not start with a number, and any negative or non-finite value, gives 0.0.
pub fn parse_number(raw: &str) -> f64 {
    LEADING_NUMBER
        .find(raw.trim())
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .filter(|value| value.is_finite() && *value > 0.0)
        .unwrap_or(0.0)
}

/// Affirmative flag: true only for an exact "SI" (case-insensitive)
pub fn parse_flag(raw: &str) -> bool {
    raw.trim().eq_ignore_ascii_case(AFFIRMATIVE_TOKEN)
}
