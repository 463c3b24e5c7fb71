//! Core sheet parser implementation
//!
//! This module handles line splitting, header detection and coordination between
//! the column mapping, record normalization and statistics components.

use std::collections::HashSet;
use tracing::{debug, info, warn};

use super::column_mapping::{ColumnMapping, ColumnResolver, SubstringResolver};
use super::record_parser::normalize_row;
use super::stats::{ParseResult, ParseStats};
use crate::app::models::RowRejection;
use crate::constants::BYTE_ORDER_MARK;

/// Header and data rows split out of the raw CSV text
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedSheet {
    /// Header cells, lowercased and trimmed
    pub headers: Vec<String>,

    /// Data rows in sheet order; blank lines never appear here
    pub rows: Vec<Vec<String>>,
}

impl ParsedSheet {
    /// Whether a header line was found
    pub fn has_headers(&self) -> bool {
        !self.headers.is_empty()
    }
}

/// Split raw CSV text into a header row and data rows
///
/// The first non-blank line is the header. Quoted fields may contain commas but
/// never newlines: every physical line is split on its own.
pub fn parse_rows(text: &str) -> ParsedSheet {
    let text = text.strip_prefix(BYTE_ORDER_MARK).unwrap_or(text);

    let mut lines = text.split('\n').filter(|line| !line.trim().is_empty());

    let Some(header_line) = lines.next() else {
        return ParsedSheet::default();
    };

    let headers = split_cells(header_line)
        .into_iter()
        .map(|cell| cell.to_lowercase())
        .collect();

    let rows = lines.map(split_cells).collect();

    ParsedSheet { headers, rows }
}

/// Split one line into trimmed cells
///
/// A `"` toggles the in-quotes state and is dropped; a `,` outside quotes ends a
/// cell. An unbalanced quote is not an error: the state just stays toggled until
/// the end of the line.
pub fn split_cells(line: &str) -> Vec<String> {
    let mut cells = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for ch in line.chars() {
        match ch {
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => {
                cells.push(current.trim().to_string());
                current.clear();
            }
            _ => current.push(ch),
        }
    }
    cells.push(current.trim().to_string());

    cells
}

/// Parser for the CEDEARPRO sheet export
///
/// The column resolver is pluggable so the header-matching rule can be swapped
/// or tested on its own; the default is case-insensitive substring containment.
#[derive(Debug, Clone, Default)]
pub struct SheetCsvParser<R = SubstringResolver> {
    resolver: R,
}

impl SheetCsvParser<SubstringResolver> {
    /// Create a parser with the default substring resolver
    pub fn new() -> Self {
        Self {
            resolver: SubstringResolver,
        }
    }
}

impl<R: ColumnResolver> SheetCsvParser<R> {
    /// Create a parser with a custom column resolver
    pub fn with_resolver(resolver: R) -> Self {
        Self { resolver }
    }

    /// Parse CSV text into instruments with statistics
    ///
    /// Never fails. Zero instruments is a valid result; callers tell it apart
    /// from a fetch failure through [`ParseStats::is_empty_result`].
    pub fn parse_text(&self, text: &str) -> ParseResult {
        let sheet = parse_rows(text);
        let mut stats = ParseStats::new();

        if !sheet.has_headers() {
            warn!("Sheet text has no header line");
            return ParseResult {
                instruments: Vec::new(),
                stats,
            };
        }

        let mapping = ColumnMapping::analyze(&sheet.headers, &self.resolver);
        let (total_cols, resolved, missing) = mapping.stats();
        debug!(
            "Column mapping: {} headers, {} fields resolved, {} missing",
            total_cols, resolved, missing
        );
        stats.missing_fields = mapping
            .missing_fields()
            .iter()
            .map(|field| field.keyword().to_string())
            .collect();

        let mut instruments = Vec::with_capacity(sheet.rows.len());
        let mut seen_tickers = HashSet::new();

        for row in &sheet.rows {
            stats.total_rows += 1;

            let outcome = normalize_row(row, &mapping).and_then(|instrument| {
                if seen_tickers.insert(instrument.ticker.clone()) {
                    Ok(instrument)
                } else {
                    Err(RowRejection::DuplicateTicker)
                }
            });

            match outcome {
                Ok(instrument) => {
                    instruments.push(instrument);
                    stats.instruments_parsed += 1;
                }
                Err(reason) => {
                    debug!("Skipped row {}: {}", stats.total_rows, reason);
                    stats.record_rejection(reason);
                }
            }
        }

        info!(
            "Parsed {} instruments from {} rows ({} rejected)",
            stats.instruments_parsed, stats.total_rows, stats.rows_rejected
        );

        ParseResult { instruments, stats }
    }
}
