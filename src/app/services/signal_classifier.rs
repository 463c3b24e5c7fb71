//! Signal classification for raw sheet levels
//!
//! Maps the free-text "nivel compra" / "nivel venta" cells onto an
//! [`ActionType`] and a position on the 12-step sell→buy scale.
//!
//! Precedence, first match wins:
//! 1. no concrete level in either column → `Unknown`
//! 2. sell contains `N3` or `VENTA TOTAL` → `SellStrong` at step 0
//! 3. sell contains `N2` (step 1), `N1` or `POSIBLE` (step 2) → `SellSoft`
//! 4. buy starts with `NIVEL` → `Buy` at step 3 + k for "Nivel k", k in 1..=8
//! 5. anything else → `Neutral` at the fair-price step
//!
//! A sell marker always wins over a buy level in the same row.

use crate::app::models::{ActionType, ScalePosition, SignalReading};
use crate::constants::{self, signal_markers};
use regex::Regex;
use std::sync::LazyLock;

static BUY_LEVEL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^NIVEL\s*(\d+)").expect("buy level pattern is a valid regex")
});

/// Classify a pair of raw level cells
///
/// Pure and case-insensitive; the same inputs always give the same reading.
pub fn classify(buy_level_raw: &str, sell_level_raw: &str) -> SignalReading {
    let has_level = constants::is_concrete(sell_level_raw) || constants::is_concrete(buy_level_raw);
    if !has_level {
        return SignalReading {
            action_type: ActionType::Unknown,
            has_level: false,
            scale_position: ScalePosition::FairPrice,
        };
    }

    let sell = sell_level_raw.trim().to_uppercase();
    let buy = buy_level_raw.trim().to_uppercase();

    if let Some(position) = classify_sell(&sell) {
        let action_type = if position == ScalePosition::SellTotal {
            ActionType::SellStrong
        } else {
            ActionType::SellSoft
        };
        return SignalReading {
            action_type,
            has_level,
            scale_position: position,
        };
    }

    if buy.starts_with(signal_markers::BUY_PREFIX) {
        let scale_position = extract_buy_level(&buy)
            .and_then(ScalePosition::from_buy_level)
            .unwrap_or(ScalePosition::FairPrice);
        return SignalReading {
            action_type: ActionType::Buy,
            has_level,
            scale_position,
        };
    }

    SignalReading {
        action_type: ActionType::Neutral,
        has_level,
        scale_position: ScalePosition::FairPrice,
    }
}

/// Sell step for an uppercased sell cell, if it carries a sell marker
fn classify_sell(sell: &str) -> Option<ScalePosition> {
    if sell.contains(signal_markers::SELL_TOTAL_CODE)
        || sell.contains(signal_markers::SELL_TOTAL_PHRASE)
    {
        Some(ScalePosition::SellTotal)
    } else if sell.contains(signal_markers::SELL_HALF_CODE) {
        Some(ScalePosition::SellHalf)
    } else if sell.contains(signal_markers::SELL_POSSIBLE_CODE)
        || sell.contains(signal_markers::SELL_POSSIBLE_WORD)
    {
        Some(ScalePosition::SellPossible)
    } else {
        None
    }
}

/// Digits following "NIVEL" in an uppercased buy cell
fn extract_buy_level(buy: &str) -> Option<u32> {
    BUY_LEVEL_PATTERN
        .captures(buy)
        .and_then(|captures| captures.get(1))
        .and_then(|digits| digits.as_str().parse::<u32>().ok())
}
