//! CSV parser for the published CEDEARPRO sheet
//!
//! This module turns the raw CSV export into typed [`Instrument`] records. The
//! sheet is loosely structured and edited by hand, so every stage is lenient:
//! malformed lines degrade, unknown headers resolve to empty fields and bad rows
//! are skipped rather than reported as errors.
//!
//! ## Architecture
//!
//! The parser is organized into logical components:
//! - [`parser`] - Line splitting, header detection and parse orchestration
//! - [`column_mapping`] - Keyword → column resolution against drifting headers
//! - [`field_parsers`] - Cell extraction and lenient number/flag parsing
//! - [`record_parser`] - One row → one validated `Instrument`
//! - [`stats`] - Parsing statistics and result structures
//!
//! ## Usage
//!
//! ```rust
//! use cedearpro::app::services::sheet_parser::SheetCsvParser;
//!
//! let csv = "Ticker,Nombre,Pais,Nivel Compra,Nivel Venta\nMSFT,Microsoft Corp,Estados Unidos,Nivel 7,";
//! let result = SheetCsvParser::new().parse_text(csv);
//!
//! assert_eq!(result.instruments.len(), 1);
//! assert_eq!(result.instruments[0].scale_position.index(), 10);
//! ```
//!
//! [`Instrument`]: crate::app::models::Instrument

pub mod column_mapping;
pub mod field_parsers;
pub mod parser;
pub mod record_parser;
pub mod stats;

#[cfg(test)]
pub mod tests;

// Re-export main types for easy access
pub use column_mapping::{ColumnMapping, ColumnResolver, SheetField, SubstringResolver, get_field};
pub use parser::{ParsedSheet, SheetCsvParser, parse_rows, split_cells};
pub use record_parser::{normalize, normalize_row};
pub use stats::{ParseResult, ParseStats};
