//! Display helpers for instrument values
//!
//! Prices of zero or below are "unknown" and render as an em dash rather than
//! as an error. Nothing here affects filtering or sorting.

use super::ScalePosition;
use crate::constants::SCALE_STEPS;

/// Placeholder for an unknown value
pub const UNKNOWN_VALUE: &str = "—";

/// Format a peso price as "$ 19.700" (no decimals, dot thousands)
pub fn format_price_local(value: f64) -> String {
    if !value.is_finite() || value <= 0.0 {
        return UNKNOWN_VALUE.to_string();
    }
    format!("$ {}", group_thousands(value.round() as u64, '.'))
}

/// Format a dollar price as "$1,423.82" (two decimals, comma thousands)
pub fn format_price_foreign(value: f64) -> String {
    if !value.is_finite() || value <= 0.0 {
        return UNKNOWN_VALUE.to_string();
    }
    let cents = (value * 100.0).round() as u64;
    format!("${}.{:02}", group_thousands(cents / 100, ','), cents % 100)
}

/// Format a percentage metric, hiding the zero "no data" sentinel
pub fn format_percent(value: f64) -> Option<String> {
    (value > 0.0).then(|| format!("{}%", trim_float(value)))
}

/// Format the dividend quality score as "92/100"
pub fn format_score(value: f64) -> Option<String> {
    (value > 0.0).then(|| format!("{}/100", trim_float(value)))
}

/// Segments of the level bar; only the instrument's own step is lit
///
/// Returns all-unlit when there is no real signal.
pub fn level_bar(position: Option<ScalePosition>) -> [bool; SCALE_STEPS] {
    let mut segments = [false; SCALE_STEPS];
    if let Some(position) = position {
        segments[position.index()] = true;
    }
    segments
}

fn group_thousands(value: u64, separator: char) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(separator);
        }
        grouped.push(ch);
    }
    grouped
}

fn trim_float(value: f64) -> String {
    let text = format!("{:.2}", value);
    text.trim_end_matches('0').trim_end_matches('.').to_string()
}
