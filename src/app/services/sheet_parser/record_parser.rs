//! Row normalization into typed instruments
//!
//! A row either resolves into a complete [`Instrument`] or is rejected; nothing
//! is ever partially accepted.

use super::column_mapping::{ColumnMapping, SheetField, SubstringResolver};
use super::field_parsers::{get_normalized_text, get_number, get_text, parse_flag};
use crate::app::models::{Instrument, RowRejection};
use crate::app::services::signal_classifier;

/// Normalize one row against a resolved column mapping
///
/// Fails only when the ticker or name is missing. Every other field degrades to
/// its empty value.
pub fn normalize_row(row: &[String], mapping: &ColumnMapping) -> Result<Instrument, RowRejection> {
    let ticker = get_text(row, mapping, SheetField::Ticker);
    let name = get_text(row, mapping, SheetField::Name);
    let instrument = Instrument::new(&ticker, &name)?;

    let buy_level_raw = get_text(row, mapping, SheetField::BuyLevel);
    let sell_level_raw = get_text(row, mapping, SheetField::SellLevel);
    let reading = signal_classifier::classify(&buy_level_raw, &sell_level_raw);

    let divgro_raw = get_text(row, mapping, SheetField::DividendGrowth);

    Ok(Instrument {
        country: get_normalized_text(row, mapping, SheetField::Country),
        price_local: get_number(row, mapping, SheetField::PriceLocal),
        price_foreign: get_number(row, mapping, SheetField::PriceForeign),
        dividend_yield: get_number(row, mapping, SheetField::Yield),
        dividend_growth_5y: get_number(row, mapping, SheetField::DividendGrowth5y),
        sales_growth_5y: get_number(row, mapping, SheetField::SalesGrowth5y),
        dividend_quality_score: get_number(row, mapping, SheetField::DividendQuality),
        dividend_growth_rate: get_number(row, mapping, SheetField::DividendGrowth),
        company_quality_grade: get_normalized_text(row, mapping, SheetField::CompanyQuality),
        has_dividend_growth_flag: parse_flag(&divgro_raw),
        alert: get_text(row, mapping, SheetField::Alert),
        ..instrument.with_signal(buy_level_raw, sell_level_raw, reading)
    })
}

/// Normalize one row against raw headers, `None` when the row is rejected
///
/// Convenience for single rows; batch parsing should build the mapping once
/// and call [`normalize_row`].
pub fn normalize(row: &[String], headers: &[String]) -> Option<Instrument> {
    let mapping = ColumnMapping::analyze(headers, &SubstringResolver);
    normalize_row(row, &mapping).ok()
}
