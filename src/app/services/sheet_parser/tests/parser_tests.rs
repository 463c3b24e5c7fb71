//! Tests for line splitting and parse orchestration

use super::*;
use crate::app::models::{ActionType, ScalePosition};
use crate::app::services::sheet_parser::{SheetCsvParser, parse_rows, split_cells};

#[test]
fn test_split_cells_keeps_quoted_commas() {
    assert_eq!(split_cells(r#""Smith, John",42"#), row(&["Smith, John", "42"]));
}

#[test]
fn test_split_cells_trims_and_emits_trailing_cell() {
    assert_eq!(split_cells(" a , b ,"), row(&["a", "b", ""]));
    assert_eq!(split_cells("single"), row(&["single"]));
    assert_eq!(split_cells(""), row(&[""]));
}

#[test]
fn test_split_cells_unbalanced_quote_swallows_delimiters() {
    // The open quote never closes, so every later comma is content
    assert_eq!(split_cells(r#"a,"b,c,d"#), row(&["a", "b,c,d"]));
}

#[test]
fn test_parse_rows_strips_bom_and_lowercases_header() {
    let sheet = parse_rows("\u{feff}Ticker , Nombre\nAAPL,Apple Inc");

    assert_eq!(sheet.headers, row(&["ticker", "nombre"]));
    assert_eq!(sheet.rows, vec![row(&["AAPL", "Apple Inc"])]);
}

#[test]
fn test_parse_rows_skips_blank_lines() {
    let sheet = parse_rows("\n\nTicker,Nombre\n\nAAPL,Apple\n   \nMSFT,Microsoft\n");

    assert_eq!(sheet.headers, row(&["ticker", "nombre"]));
    assert_eq!(sheet.rows.len(), 2);
    assert_eq!(sheet.rows[1][0], "MSFT");
}

#[test]
fn test_parse_rows_handles_crlf() {
    let sheet = parse_rows("Ticker,Nombre\r\nAAPL,Apple\r\n");

    assert_eq!(sheet.headers, row(&["ticker", "nombre"]));
    assert_eq!(sheet.rows, vec![row(&["AAPL", "Apple"])]);
}

#[test]
fn test_parse_rows_without_data() {
    let header_only = parse_rows("Ticker,Nombre\n");
    assert!(header_only.has_headers());
    assert!(header_only.rows.is_empty());

    let empty = parse_rows("  \n\n");
    assert!(!empty.has_headers());
    assert!(empty.rows.is_empty());
}

#[test]
fn test_sell_total_row() {
    let csv = "Ticker,Nombre,Pais,Nivel Compra,Nivel Venta\nAAPL,Apple Inc,Estados Unidos,,N3 Venta total";
    let result = SheetCsvParser::new().parse_text(csv);

    assert_eq!(result.instruments.len(), 1);
    let apple = &result.instruments[0];
    assert_eq!(apple.ticker, "AAPL");
    assert_eq!(apple.action_type, ActionType::SellStrong);
    assert_eq!(apple.scale_position.index(), 0);
}

#[test]
fn test_buy_level_row() {
    let csv = "Ticker,Nombre,Pais,Nivel Compra,Nivel Venta\nMSFT,Microsoft Corp,Estados Unidos,Nivel 7,";
    let result = SheetCsvParser::new().parse_text(csv);

    assert_eq!(result.instruments.len(), 1);
    assert_eq!(result.instruments[0].action_type, ActionType::Buy);
    assert_eq!(result.instruments[0].scale_position.index(), 10);
}

#[test]
fn test_empty_and_sentinel_rows_are_rejected() {
    let csv = "Ticker,Nombre,Pais,Nivel Compra,Nivel Venta\n,,,,,\nXYZ,#N/A,,,,";
    let result = SheetCsvParser::new().parse_text(csv);

    assert!(result.instruments.is_empty());
    assert_eq!(result.stats.total_rows, 2);
    assert_eq!(result.stats.missing_ticker, 1);
    assert_eq!(result.stats.missing_name, 1);
    assert!(result.stats.is_empty_result());
}

#[test]
fn test_full_sheet_parse() {
    let result = SheetCsvParser::new().parse_text(&create_test_sheet_csv());

    let tickers: Vec<&str> = result
        .instruments
        .iter()
        .map(|instrument| instrument.ticker.as_str())
        .collect();
    assert_eq!(tickers, vec!["AAPL", "MSFT", "KO", "VALE"]);

    assert_eq!(result.stats.total_rows, 6);
    assert_eq!(result.stats.instruments_parsed, 4);
    assert_eq!(result.stats.rows_rejected, 2);
    assert!(result.stats.missing_fields.is_empty());

    let vale = &result.instruments[3];
    assert_eq!(vale.name, "Vale S.A., ADR");
    assert_eq!(vale.country, "Brasil");
    assert_eq!(vale.action_type, ActionType::SellSoft);
    assert_eq!(vale.scale_position, ScalePosition::SellPossible);
}

#[test]
fn test_duplicate_ticker_keeps_first_row() {
    let csv = "Ticker,Nombre\nAAPL,Apple Inc\naapl,Apple Duplicate\nMSFT,Microsoft";
    let result = SheetCsvParser::new().parse_text(csv);

    assert_eq!(result.instruments.len(), 2);
    assert_eq!(result.instruments[0].name, "Apple Inc");
    assert_eq!(result.stats.duplicate_ticker, 1);
}

#[test]
fn test_header_only_sheet_is_empty_not_error() {
    let result = SheetCsvParser::new().parse_text(FULL_HEADER);

    assert!(result.instruments.is_empty());
    assert_eq!(result.stats.total_rows, 0);
    assert!(result.stats.is_empty_result());
}

#[test]
fn test_missing_columns_are_reported() {
    let csv = "Ticker,Nombre\nAAPL,Apple Inc";
    let result = SheetCsvParser::new().parse_text(csv);

    assert_eq!(result.instruments.len(), 1);
    assert!(result.stats.missing_fields.contains(&"precio ars".to_string()));
    assert!(!result.stats.missing_fields.contains(&"ticker".to_string()));

    let apple = &result.instruments[0];
    assert_eq!(apple.price_local, 0.0);
    assert_eq!(apple.action_type, ActionType::Unknown);
}
