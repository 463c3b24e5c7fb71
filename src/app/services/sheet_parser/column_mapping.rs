//! Column resolution for a drifting sheet layout
//!
//! Headers are matched by substring containment, so columns may be renamed,
//! reordered or annotated ("Precio ARS (hoy)") without breaking extraction.

use crate::constants::keywords;
use std::collections::HashMap;

/// Strategy for locating a logical field among the header cells
pub trait ColumnResolver {
    /// Index of the column for `keyword`, if any header matches
    fn resolve(&self, headers: &[String], keyword: &str) -> Option<usize>;
}

/// First header whose lowercased text contains the keyword
#[derive(Debug, Clone, Copy, Default)]
pub struct SubstringResolver;

impl ColumnResolver for SubstringResolver {
    fn resolve(&self, headers: &[String], keyword: &str) -> Option<usize> {
        let keyword = keyword.to_lowercase();
        headers
            .iter()
            .position(|header| header.trim().to_lowercase().contains(&keyword))
    }
}

/// Extract a logical field from a row by header keyword
///
/// Returns the trimmed cell with stray `"` removed, or an empty string when no
/// header matches or the row is too short.
pub fn get_field(row: &[String], headers: &[String], keyword: &str) -> String {
    SubstringResolver
        .resolve(headers, keyword)
        .and_then(|index| row.get(index))
        .map(|cell| clean_cell(cell))
        .unwrap_or_default()
}

/// Trim a cell and drop any residual quote characters
pub fn clean_cell(cell: &str) -> String {
    cell.trim().replace('"', "")
}

/// Logical fields read from the sheet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SheetField {
    Ticker,
    Name,
    Country,
    BuyLevel,
    SellLevel,
    PriceLocal,
    PriceForeign,
    Yield,
    DividendGrowth5y,
    SalesGrowth5y,
    CompanyQuality,
    DividendQuality,
    DividendGrowth,
    Alert,
}

impl SheetField {
    pub const ALL: [SheetField; 14] = [
        SheetField::Ticker,
        SheetField::Name,
        SheetField::Country,
        SheetField::BuyLevel,
        SheetField::SellLevel,
        SheetField::PriceLocal,
        SheetField::PriceForeign,
        SheetField::Yield,
        SheetField::DividendGrowth5y,
        SheetField::SalesGrowth5y,
        SheetField::CompanyQuality,
        SheetField::DividendQuality,
        SheetField::DividendGrowth,
        SheetField::Alert,
    ];

    /// Header keyword matched for this field
    pub fn keyword(self) -> &'static str {
        match self {
            SheetField::Ticker => keywords::TICKER,
            SheetField::Name => keywords::NAME,
            SheetField::Country => keywords::COUNTRY,
            SheetField::BuyLevel => keywords::BUY_LEVEL,
            SheetField::SellLevel => keywords::SELL_LEVEL,
            SheetField::PriceLocal => keywords::PRICE_LOCAL,
            SheetField::PriceForeign => keywords::PRICE_FOREIGN,
            SheetField::Yield => keywords::YIELD,
            SheetField::DividendGrowth5y => keywords::DIVIDEND_GROWTH_5Y,
            SheetField::SalesGrowth5y => keywords::SALES_GROWTH_5Y,
            SheetField::CompanyQuality => keywords::COMPANY_QUALITY,
            SheetField::DividendQuality => keywords::DIVIDEND_QUALITY,
            SheetField::DividendGrowth => keywords::DIVIDEND_GROWTH,
            SheetField::Alert => keywords::ALERT,
        }
    }
}

/// Resolved column index for every logical field of one sheet
///
/// Resolution happens once per header row; the per-row lookups then reuse it.
/// This gives the same answers as calling [`get_field`] per cell because every
/// row shares the same headers.
#[derive(Debug, Clone)]
pub struct ColumnMapping {
    /// Header cells as parsed
    pub headers: Vec<String>,

    /// Field to column index
    pub field_to_index: HashMap<SheetField, usize>,
}

impl ColumnMapping {
    /// Resolve every logical field against the headers
    pub fn analyze<R: ColumnResolver + ?Sized>(headers: &[String], resolver: &R) -> Self {
        let field_to_index = SheetField::ALL
            .iter()
            .filter_map(|&field| {
                resolver
                    .resolve(headers, field.keyword())
                    .map(|index| (field, index))
            })
            .collect();

        Self {
            headers: headers.to_vec(),
            field_to_index,
        }
    }

    /// Get the column index for a field
    pub fn get_index(&self, field: SheetField) -> Option<usize> {
        self.field_to_index.get(&field).copied()
    }

    /// Check if a field resolved to a column
    pub fn has_field(&self, field: SheetField) -> bool {
        self.field_to_index.contains_key(&field)
    }

    /// Fields no header matched, in declaration order
    pub fn missing_fields(&self) -> Vec<SheetField> {
        SheetField::ALL
            .iter()
            .copied()
            .filter(|field| !self.has_field(*field))
            .collect()
    }

    /// (header count, resolved fields, missing fields)
    pub fn stats(&self) -> (usize, usize, usize) {
        (
            self.headers.len(),
            self.field_to_index.len(),
            SheetField::ALL.len() - self.field_to_index.len(),
        )
    }
}
