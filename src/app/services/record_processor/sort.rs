//! Multi-key stable sorting with click-to-toggle keys

use crate::app::models::Instrument;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::str::FromStr;

/// Sortable instrument attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    Ticker,
    Name,
    Country,
    Action,
    Scale,
    PriceLocal,
    PriceForeign,
    Yield,
    #[serde(rename = "dividend_growth_5y")]
    DividendGrowth5y,
    #[serde(rename = "sales_growth_5y")]
    SalesGrowth5y,
    DividendQuality,
    DividendGrowthRate,
    CompanyQuality,
}

/// Value extracted for comparison
#[derive(Debug, Clone, PartialEq)]
enum SortValue {
    Text(String),
    Number(f64),
}

impl SortValue {
    fn compare(&self, other: &SortValue) -> Ordering {
        match (self, other) {
            (SortValue::Text(a), SortValue::Text(b)) => a.cmp(b),
            (SortValue::Number(a), SortValue::Number(b)) => a.total_cmp(b),
            // One field never yields both kinds
            (SortValue::Text(_), SortValue::Number(_)) => Ordering::Greater,
            (SortValue::Number(_), SortValue::Text(_)) => Ordering::Less,
        }
    }
}

impl SortField {
    pub const ALL: [SortField; 13] = [
        SortField::Ticker,
        SortField::Name,
        SortField::Country,
        SortField::Action,
        SortField::Scale,
        SortField::PriceLocal,
        SortField::PriceForeign,
        SortField::Yield,
        SortField::DividendGrowth5y,
        SortField::SalesGrowth5y,
        SortField::DividendQuality,
        SortField::DividendGrowthRate,
        SortField::CompanyQuality,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SortField::Ticker => "ticker",
            SortField::Name => "name",
            SortField::Country => "country",
            SortField::Action => "action",
            SortField::Scale => "scale",
            SortField::PriceLocal => "price_local",
            SortField::PriceForeign => "price_foreign",
            SortField::Yield => "yield",
            SortField::DividendGrowth5y => "dividend_growth_5y",
            SortField::SalesGrowth5y => "sales_growth_5y",
            SortField::DividendQuality => "dividend_quality",
            SortField::DividendGrowthRate => "dividend_growth_rate",
            SortField::CompanyQuality => "company_quality",
        }
    }

    fn value(self, instrument: &Instrument) -> SortValue {
        match self {
            SortField::Ticker => SortValue::Text(instrument.ticker.to_lowercase()),
            SortField::Name => SortValue::Text(instrument.name.to_lowercase()),
            SortField::Country => SortValue::Text(instrument.country.to_lowercase()),
            SortField::Action => SortValue::Text(instrument.action_type.as_str().to_lowercase()),
            SortField::Scale => SortValue::Number(instrument.scale_position.index() as f64),
            SortField::PriceLocal => SortValue::Number(instrument.price_local),
            SortField::PriceForeign => SortValue::Number(instrument.price_foreign),
            SortField::Yield => SortValue::Number(instrument.dividend_yield),
            SortField::DividendGrowth5y => SortValue::Number(instrument.dividend_growth_5y),
            SortField::SalesGrowth5y => SortValue::Number(instrument.sales_growth_5y),
            SortField::DividendQuality => SortValue::Number(instrument.dividend_quality_score),
            SortField::DividendGrowthRate => SortValue::Number(instrument.dividend_growth_rate),
            SortField::CompanyQuality => {
                SortValue::Text(instrument.company_quality_grade.to_lowercase())
            }
        }
    }
}

impl FromStr for SortField {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_lowercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|field| field.as_str() == normalized)
            .ok_or_else(|| Error::invalid_value("sort field", s))
    }
}

impl std::fmt::Display for SortField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

impl FromStr for SortDirection {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "asc" => Ok(SortDirection::Asc),
            "desc" => Ok(SortDirection::Desc),
            _ => Err(Error::invalid_value("sort direction", s)),
        }
    }
}

/// One (field, direction) entry of the sort list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortKey {
    pub field: SortField,
    pub direction: SortDirection,
}

impl SortKey {
    pub fn new(field: SortField, direction: SortDirection) -> Self {
        Self { field, direction }
    }

    pub fn compare(&self, a: &Instrument, b: &Instrument) -> Ordering {
        let ordering = self.field.value(a).compare(&self.field.value(b));
        match self.direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    }
}

/// Parses `field` or `field:asc|desc`; a bare field sorts descending
impl FromStr for SortKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let (field, direction) = match s.split_once(':') {
            Some((field, direction)) => (field.parse()?, direction.parse()?),
            None => (s.parse()?, SortDirection::Desc),
        };
        Ok(Self { field, direction })
    }
}

impl std::fmt::Display for SortKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.field, self.direction.as_str())
    }
}

/// Ordered sort keys, at most one per field; the first key is primary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortState {
    keys: Vec<SortKey>,
}

impl Default for SortState {
    fn default() -> Self {
        Self {
            keys: vec![SortKey::new(SortField::Ticker, SortDirection::Asc)],
        }
    }
}

impl SortState {
    /// Build from explicit keys; a repeated field keeps its first entry
    pub fn from_keys(keys: impl IntoIterator<Item = SortKey>) -> Self {
        let mut state = Self { keys: Vec::new() };
        for key in keys {
            if state.position(key.field).is_none() {
                state.keys.push(key);
            }
        }
        state
    }

    pub fn keys(&self) -> &[SortKey] {
        &self.keys
    }

    pub fn direction_of(&self, field: SortField) -> Option<SortDirection> {
        self.position(field).map(|index| self.keys[index].direction)
    }

    fn position(&self, field: SortField) -> Option<usize> {
        self.keys.iter().position(|key| key.field == field)
    }

    /// Advance a field through absent → desc → asc → absent
    pub fn toggle(&mut self, field: SortField) {
        match self.position(field) {
            None => self.keys.push(SortKey::new(field, SortDirection::Desc)),
            Some(index) => match self.keys[index].direction {
                SortDirection::Desc => self.keys[index].direction = SortDirection::Asc,
                SortDirection::Asc => {
                    self.keys.remove(index);
                }
            },
        }
    }

    /// Back to ticker ascending
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Compare two instruments across every key in priority order
    pub fn compare(&self, a: &Instrument, b: &Instrument) -> Ordering {
        self.keys
            .iter()
            .map(|key| key.compare(a, b))
            .find(|ordering| ordering.is_ne())
            .unwrap_or(Ordering::Equal)
    }
}

/// Return a stably sorted copy
pub fn apply_sort(instruments: &[Instrument], state: &SortState) -> Vec<Instrument> {
    let mut sorted = instruments.to_vec();
    sorted.sort_by(|a, b| state.compare(a, b));
    sorted
}
