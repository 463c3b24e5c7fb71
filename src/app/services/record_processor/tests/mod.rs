//! Test utilities for record processing
//!
//! Builders for small instrument sets with the fields the filters and sort keys
//! look at.


use crate::app::models::{ActionType, Instrument, ScalePosition, SignalReading};

/// Helper to create a test instrument with a signal and country
pub fn create_test_instrument(ticker: &str, name: &str, country: &str, action_type: ActionType) -> Instrument {
    let (has_level, scale_position) = match action_type {
        ActionType::Buy => (true, ScalePosition::Level3),
        ActionType::SellStrong => (true, ScalePosition::SellTotal),
        ActionType::SellSoft => (true, ScalePosition::SellHalf),
        ActionType::Neutral => (true, ScalePosition::FairPrice),
        ActionType::Unknown => (false, ScalePosition::FairPrice),
    };

    let mut instrument = Instrument::new(ticker, name)
        .unwrap()
        .with_signal(
            "",
            "",
            SignalReading {
                action_type,
                has_level,
                scale_position,
            },
        );
    instrument.country = country.to_string();
    instrument
}

/// Helper to create a mixed instrument set
///
/// | ticker | action      | country        | grade | quality | growth | flag |
/// |--------|-------------|----------------|-------|---------|--------|------|
/// | AAPL   | SellStrong  | Estados Unidos | AA+   | 85      | 5.1    | yes  |
/// | MSFT   | Buy         | Estados Unidos | AAA   | 99      | 10.2   | yes  |
/// | KO     | SellSoft    | Estados Unidos | A+    | 80      | 4.5    | yes  |
/// | VALE   | Neutral     | Brasil         |       | 0       | 0      | no   |
/// | ACN    | Buy         | Irlanda        | AA-   | 92      | 15.4   | yes  |
/// | MELI   | Unknown     | Uruguay        |       | 45      | 16.0   | no   |
pub fn create_test_instruments() -> Vec<Instrument> {
    let rows = [
        ("AAPL", "Apple Inc", "Estados Unidos", ActionType::SellStrong, "AA+", 85.0, 5.1, true, 18950.0),
        ("MSFT", "Microsoft Corp", "Estados Unidos", ActionType::Buy, "AAA", 99.0, 10.2, true, 19700.0),
        ("KO", "Coca-Cola Co", "Estados Unidos", ActionType::SellSoft, "A+", 80.0, 4.5, true, 23190.0),
        ("VALE", "Vale SA", "Brasil", ActionType::Neutral, "", 0.0, 0.0, false, 9000.0),
        ("ACN", "Accenture Plc", "Irlanda", ActionType::Buy, "AA-", 92.0, 15.4, true, 4420.0),
        ("MELI", "MercadoLibre Inc", "Uruguay", ActionType::Unknown, "", 45.0, 16.0, false, 24190.0),
    ];

    rows.into_iter()
        .map(
            |(ticker, name, country, action, grade, quality, growth, flag, price)| {
                let mut instrument = create_test_instrument(ticker, name, country, action);
                instrument.company_quality_grade = grade.to_string();
                instrument.dividend_quality_score = quality;
                instrument.dividend_growth_rate = growth;
                instrument.has_dividend_growth_flag = flag;
                instrument.price_local = price;
                instrument
            },
        )
        .collect()
}

/// Tickers of a sequence, in order
pub fn tickers(instruments: &[Instrument]) -> Vec<&str> {
    instruments
        .iter()
        .map(|instrument| instrument.ticker.as_str())
        .collect()
}
