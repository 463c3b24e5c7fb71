//! Data models for the CEDEARPRO sheet
//!
//! This module contains the typed `Instrument` record built from one sheet row,
//! the action taxonomy derived from its raw buy/sell levels, and the 12-step
//! sell→buy scale used by the level bar.

pub mod display;

use crate::constants::{self, BUY_LEVEL_PLACEHOLDER, NOT_AVAILABLE};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

// =============================================================================
// Action Taxonomy
// =============================================================================

/// Recommendation category derived from the raw level columns
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActionType {
    /// A concrete "Nivel k" buy level is present
    Buy,

    /// N3 / "venta total": sell the whole position
    SellStrong,

    /// N2 or N1 / "posible venta": reduce the position
    SellSoft,

    /// A level is present but carries no buy or sell marker (fair price)
    Neutral,

    /// Neither level column holds a concrete value
    Unknown,
}

impl ActionType {
    /// Label shown on the card badge
    pub fn label(self) -> &'static str {
        match self {
            ActionType::Buy => "COMPRAR",
            ActionType::SellStrong => "VENTA TOTAL",
            ActionType::SellSoft => "REDUCIR",
            ActionType::Neutral => "ESPERAR",
            ActionType::Unknown => "SIN SEÑAL",
        }
    }

    /// Canonical token used on the wire and in CLI flags
    pub fn as_str(self) -> &'static str {
        match self {
            ActionType::Buy => "BUY",
            ActionType::SellStrong => "SELL_STRONG",
            ActionType::SellSoft => "SELL_SOFT",
            ActionType::Neutral => "NEUTRAL",
            ActionType::Unknown => "UNKNOWN",
        }
    }

    /// Whether this action asks to reduce or close a position
    pub fn is_sell(self) -> bool {
        matches!(self, ActionType::SellStrong | ActionType::SellSoft)
    }

    /// Get all action types in display order
    pub fn all_values() -> [ActionType; 5] {
        [
            ActionType::Buy,
            ActionType::SellStrong,
            ActionType::SellSoft,
            ActionType::Neutral,
            ActionType::Unknown,
        ]
    }
}

impl FromStr for ActionType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().replace('-', "_").as_str() {
            "BUY" => Ok(ActionType::Buy),
            "SELL_STRONG" => Ok(ActionType::SellStrong),
            "SELL_SOFT" => Ok(ActionType::SellSoft),
            "NEUTRAL" => Ok(ActionType::Neutral),
            "UNKNOWN" => Ok(ActionType::Unknown),
            _ => Err(Error::invalid_value("action type", s)),
        }
    }
}

impl std::fmt::Display for ActionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Coarse action grouping offered by the dashboard's quick filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActionGroup {
    All,
    Buy,
    Sell,
    Neutral,
}

impl ActionGroup {
    /// Action types selected by this group (empty means no constraint)
    pub fn members(self) -> &'static [ActionType] {
        match self {
            ActionGroup::All => &[],
            ActionGroup::Buy => &[ActionType::Buy],
            ActionGroup::Sell => &[ActionType::SellStrong, ActionType::SellSoft],
            ActionGroup::Neutral => &[ActionType::Neutral],
        }
    }
}

impl FromStr for ActionGroup {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(ActionGroup::All),
            "buy" => Ok(ActionGroup::Buy),
            "sell" => Ok(ActionGroup::Sell),
            "neutral" => Ok(ActionGroup::Neutral),
            _ => Err(Error::invalid_value("action group", s)),
        }
    }
}

// =============================================================================
// Sell → Buy Scale
// =============================================================================

/// Position on the 12-step intensity ladder, most bearish first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum ScalePosition {
    SellTotal = 0,
    SellHalf = 1,
    SellPossible = 2,
    FairPrice = 3,
    Level1 = 4,
    Level2 = 5,
    Level3 = 6,
    Level4 = 7,
    Level5 = 8,
    Level6 = 9,
    Level7 = 10,
    /// "Oportunidad única": the most bullish tier
    Level8 = 11,
}

impl ScalePosition {
    /// Every step of the scale in ladder order
    pub const ALL: [ScalePosition; constants::SCALE_STEPS] = [
        ScalePosition::SellTotal,
        ScalePosition::SellHalf,
        ScalePosition::SellPossible,
        ScalePosition::FairPrice,
        ScalePosition::Level1,
        ScalePosition::Level2,
        ScalePosition::Level3,
        ScalePosition::Level4,
        ScalePosition::Level5,
        ScalePosition::Level6,
        ScalePosition::Level7,
        ScalePosition::Level8,
    ];

    /// Index on the ladder (0..=11)
    pub fn index(self) -> usize {
        self as usize
    }

    /// Look up a step by its ladder index
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Map a buy level `k` (1..=8) onto the ladder
    pub fn from_buy_level(level: u32) -> Option<Self> {
        if (1..=constants::MAX_BUY_LEVEL).contains(&level) {
            Self::from_index(ScalePosition::FairPrice.index() + level as usize)
        } else {
            None
        }
    }

    /// Text shown under the level bar
    pub fn label(self) -> &'static str {
        match self {
            ScalePosition::SellTotal => "Venta total",
            ScalePosition::SellHalf => "Vender mitad",
            ScalePosition::SellPossible => "Posible venta",
            ScalePosition::FairPrice => "Precio justo",
            ScalePosition::Level1 => "Nivel 1",
            ScalePosition::Level2 => "Nivel 2",
            ScalePosition::Level3 => "Nivel 3",
            ScalePosition::Level4 => "Nivel 4",
            ScalePosition::Level5 => "Nivel 5",
            ScalePosition::Level6 => "Nivel 6",
            ScalePosition::Level7 => "Nivel 7",
            ScalePosition::Level8 => "Nivel 8",
        }
    }
}

impl Default for ScalePosition {
    fn default() -> Self {
        ScalePosition::FairPrice
    }
}

/// Outcome of classifying one pair of raw level fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignalReading {
    pub action_type: ActionType,
    pub has_level: bool,
    /// Only meaningful when `has_level` is true
    pub scale_position: ScalePosition,
}

// =============================================================================
// Company Quality Tier
// =============================================================================

/// Coarse tier of the company quality grade, used for colouring
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum QualityTier {
    /// AAA family
    Top,
    /// AA family (AA+, AA, AA-)
    High,
    /// A, A+, A-
    Medium,
    /// Any other non-empty grade
    Other,
    /// No grade
    None,
}

impl QualityTier {
    pub fn from_grade(grade: &str) -> Self {
        let grade = grade.trim();
        if grade.is_empty() {
            QualityTier::None
        } else if grade.starts_with("AAA") {
            QualityTier::Top
        } else if grade.starts_with("AA") {
            QualityTier::High
        } else if grade == "A" || grade.starts_with("A+") || grade.starts_with("A-") {
            QualityTier::Medium
        } else {
            QualityTier::Other
        }
    }
}

// =============================================================================
// Instrument Record
// =============================================================================

/// Why a sheet row did not become an instrument
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RowRejection {
    /// Ticker cell empty or `#N/A`
    MissingTicker,
    /// Name cell empty or `#N/A`
    MissingName,
    /// Ticker already produced by an earlier row of the same batch
    DuplicateTicker,
}

impl std::fmt::Display for RowRejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RowRejection::MissingTicker => f.write_str("missing ticker"),
            RowRejection::MissingName => f.write_str("missing name"),
            RowRejection::DuplicateTicker => f.write_str("duplicate ticker"),
        }
    }
}

/// One tradable instrument as published in the sheet
///
/// Numeric fields use 0.0 for "no data". A genuine zero (a 0% yield, say) is
/// indistinguishable from a missing cell; buckets and displays treat both as absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instrument {
    /// Uppercase ticker, unique within one fetch
    pub ticker: String,

    /// Display name
    pub name: String,

    /// Country, empty when unknown
    pub country: String,

    /// Buy level exactly as written in the sheet
    pub buy_level_raw: String,

    /// Sell level exactly as written in the sheet
    pub sell_level_raw: String,

    pub action_type: ActionType,
    pub has_level: bool,
    pub scale_position: ScalePosition,

    /// Price in pesos
    pub price_local: f64,

    /// Price in dollars
    pub price_foreign: f64,

    /// Dividend yield in percent
    pub dividend_yield: f64,

    /// Five-year dividend growth in percent
    pub dividend_growth_5y: f64,

    /// Five-year sales growth in percent
    pub sales_growth_5y: f64,

    /// Dividend quality score (0-100)
    pub dividend_quality_score: f64,

    /// Dividend growth rate used by the growth buckets
    pub dividend_growth_rate: f64,

    /// Letter grade such as "AA+", empty when unknown
    pub company_quality_grade: String,

    pub has_dividend_growth_flag: bool,

    /// Free-text alert column, verbatim
    pub alert: String,
}

impl Instrument {
    /// Create an instrument with validated identity and empty metrics
    ///
    /// The ticker is uppercased. Both ticker and name must be concrete (not empty,
    /// not `#N/A`); the signal starts as "no level".
    pub fn new(ticker: &str, name: &str) -> std::result::Result<Self, RowRejection> {
        let ticker = ticker.trim().to_uppercase();
        if !constants::is_concrete(&ticker) {
            return Err(RowRejection::MissingTicker);
        }

        let name = name.trim();
        if !constants::is_concrete(name) {
            return Err(RowRejection::MissingName);
        }

        Ok(Self {
            ticker,
            name: name.to_string(),
            country: String::new(),
            buy_level_raw: String::new(),
            sell_level_raw: String::new(),
            action_type: ActionType::Unknown,
            has_level: false,
            scale_position: ScalePosition::FairPrice,
            price_local: 0.0,
            price_foreign: 0.0,
            dividend_yield: 0.0,
            dividend_growth_5y: 0.0,
            sales_growth_5y: 0.0,
            dividend_quality_score: 0.0,
            dividend_growth_rate: 0.0,
            company_quality_grade: String::new(),
            has_dividend_growth_flag: false,
            alert: String::new(),
        })
    }

    /// Attach the raw level fields together with their classification
    pub fn with_signal(
        mut self,
        buy_level_raw: impl Into<String>,
        sell_level_raw: impl Into<String>,
        reading: SignalReading,
    ) -> Self {
        self.buy_level_raw = buy_level_raw.into();
        self.sell_level_raw = sell_level_raw.into();
        self.action_type = reading.action_type;
        self.has_level = reading.has_level;
        self.scale_position = reading.scale_position;
        self
    }

    /// Position for the level bar, `None` when there is no real signal
    pub fn level_position(&self) -> Option<ScalePosition> {
        self.has_level.then_some(self.scale_position)
    }

    /// Buy level text worth showing, hiding the `E` placeholder and `#N/A`
    pub fn buy_level_display(&self) -> Option<&str> {
        let raw = self.buy_level_raw.trim();
        if raw.is_empty() || raw == BUY_LEVEL_PLACEHOLDER || raw == NOT_AVAILABLE {
            None
        } else {
            Some(raw)
        }
    }

    /// Sell level text worth showing, hiding `#N/A`
    pub fn sell_level_display(&self) -> Option<&str> {
        let raw = self.sell_level_raw.trim();
        if constants::is_concrete(raw) {
            Some(raw)
        } else {
            None
        }
    }

    /// Tier of the company quality grade
    pub fn quality_tier(&self) -> QualityTier {
        QualityTier::from_grade(&self.company_quality_grade)
    }
}
