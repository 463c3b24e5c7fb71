//! Application constants for the CEDEARPRO engine
//!
//! This module contains the header keywords, sentinel values, scale bounds and
//! default settings used throughout the crate.

// =============================================================================
// Sheet Source Defaults
// =============================================================================

/// Default refresh interval (15 minutes)
pub const DEFAULT_REFRESH_INTERVAL_SECS: u64 = 15 * 60;

/// Default HTTP request timeout
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 15_000;

/// Query parameter appended with the current timestamp to defeat caches
pub const DEFAULT_CACHE_BUST_PARAM: &str = "t";

/// User agent sent with sheet requests
pub const DEFAULT_USER_AGENT: &str = concat!("cedearpro/", env!("CARGO_PKG_VERSION"));

/// Environment variable names for configuration layering
pub mod env_vars {
    pub const SHEET_URL: &str = "CEDEARPRO_SHEET_URL";
    pub const REFRESH_SECS: &str = "CEDEARPRO_REFRESH_SECS";
    pub const TIMEOUT_MS: &str = "CEDEARPRO_TIMEOUT_MS";
}

// =============================================================================
// Header Keywords
// =============================================================================

/// Substrings matched against lowercased headers to locate each logical field.
///
/// Matching is containment, not equality, so "Precio ARS (hoy)" still resolves
/// to `PRICE_LOCAL`. Order within a header row does not matter.
pub mod keywords {
    pub const TICKER: &str = "ticker";
    pub const NAME: &str = "nombre";
    pub const COUNTRY: &str = "pais";
    pub const BUY_LEVEL: &str = "nivel compra";
    pub const SELL_LEVEL: &str = "nivel venta";
    pub const PRICE_LOCAL: &str = "precio ars";
    pub const PRICE_FOREIGN: &str = "precio usd";
    pub const YIELD: &str = "yield";
    pub const DIVIDEND_GROWTH_5Y: &str = "5-year dividend";
    pub const SALES_GROWTH_5Y: &str = "5-year sales";
    pub const COMPANY_QUALITY: &str = "calidad empresa";
    pub const DIVIDEND_QUALITY: &str = "calidad dividendo";
    pub const DIVIDEND_GROWTH: &str = "divgro";
    pub const ALERT: &str = "alerta";
}

// =============================================================================
// Sentinel Values
// =============================================================================

/// Spreadsheet formula error meaning "value absent"
pub const NOT_AVAILABLE: &str = "#N/A";

/// Lookup miss marker written by the sheet's country/grade formulas
pub const NOT_FOUND: &str = "No encontrado";

/// Placeholder buy level meaning "in the sheet but no level yet"
pub const BUY_LEVEL_PLACEHOLDER: &str = "E";

/// Affirmative token for the dividend-growth flag column
pub const AFFIRMATIVE_TOKEN: &str = "SI";

/// Byte-order mark that may prefix the exported CSV
pub const BYTE_ORDER_MARK: char = '\u{feff}';

/// Check whether a trimmed cell carries a concrete value
pub fn is_concrete(value: &str) -> bool {
    let trimmed = value.trim();
    !trimmed.is_empty() && trimmed != NOT_AVAILABLE
}

/// Collapse the sheet's "absent" sentinels to the empty string
pub fn normalize_sentinel(value: &str) -> String {
    let trimmed = value.trim();
    if trimmed == NOT_AVAILABLE || trimmed == NOT_FOUND {
        String::new()
    } else {
        trimmed.to_string()
    }
}

// =============================================================================
// Signal Markers
// =============================================================================

/// Uppercase markers searched for in the raw level columns
pub mod signal_markers {
    /// Sell everything
    pub const SELL_TOTAL_CODE: &str = "N3";
    pub const SELL_TOTAL_PHRASE: &str = "VENTA TOTAL";

    /// Sell half
    pub const SELL_HALF_CODE: &str = "N2";

    /// Possible sell
    pub const SELL_POSSIBLE_CODE: &str = "N1";
    pub const SELL_POSSIBLE_WORD: &str = "POSIBLE";

    /// Prefix of every buy level ("Nivel 1" .. "Nivel 8")
    pub const BUY_PREFIX: &str = "NIVEL";
}

/// Highest buy level on the scale
pub const MAX_BUY_LEVEL: u32 = 8;

/// Number of steps on the sell→buy scale
pub const SCALE_STEPS: usize = 12;
