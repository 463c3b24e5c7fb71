//! Test utilities for sheet parser testing
//!
//! This module provides sample sheet exports and row helpers used across the
//! parser test modules.

mod parser_tests;

/// Header row of the full sheet layout
pub const FULL_HEADER: &str = "Ticker,Nombre,Pais,Nivel Compra,Nivel Venta,Precio ARS,Precio USD,Yield,5-Year Dividend Growth,5-Year Sales Growth,Calidad Empresa,Calidad Dividendo,DivGro,Alerta";

/// Helper to create a complete sheet export with every column populated
pub fn create_test_sheet_csv() -> String {
    format!(
        "{FULL_HEADER}
AAPL,Apple Inc,Estados Unidos,,N3 Venta total,19700,229.50,0.45,5.2,8.1,AA+,85,SI,
MSFT,Microsoft Corp,Estados Unidos,Nivel 7,,21300,430.1,0.8,10.2,14.0,AAA,92,SI,Resultados 28/10
KO,Coca-Cola,Estados Unidos,precio justo,#N/A,15000,62.3,2.91,4.5,3.2,A+,95,si,
VALE,\"Vale S.A., ADR\",Brasil,E,N1 Posible venta,9000,11.2,9.8,12.0,2.0,No encontrado,40,NO,
XYZ,#N/A,,,,

,,,,,
"
    )
}

/// Helper to build a row of owned cells
pub fn row(cells: &[&str]) -> Vec<String> {
    cells.iter().map(|cell| cell.to_string()).collect()
}

/// Helper to build lowercased headers the way the parser stores them
pub fn headers(cells: &[&str]) -> Vec<String> {
    cells.iter().map(|cell| cell.trim().to_lowercase()).collect()
}
