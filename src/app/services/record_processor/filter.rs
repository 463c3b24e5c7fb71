//! Multi-criterion filtering of instruments
//!
//! Every dimension is a set of selections. An empty set places no constraint;
//! a non-empty set is an OR within the dimension. Dimensions combine with AND.

use crate::app::models::{ActionGroup, ActionType, Instrument};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::str::FromStr;
use tracing::debug;

// =============================================================================
// Numeric Buckets
// =============================================================================

/// Named ranges over the dividend quality score
///
/// Zero means "no data" and falls in no bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum QualityBucket {
    #[serde(rename = "90-100")]
    Excellent,
    #[serde(rename = "70-89")]
    Good,
    #[serde(rename = "50-69")]
    Fair,
    #[serde(rename = "<50")]
    Low,
}

impl QualityBucket {
    pub const ALL: [QualityBucket; 4] = [
        QualityBucket::Excellent,
        QualityBucket::Good,
        QualityBucket::Fair,
        QualityBucket::Low,
    ];

    pub fn label(self) -> &'static str {
        match self {
            QualityBucket::Excellent => "90-100",
            QualityBucket::Good => "70-89",
            QualityBucket::Fair => "50-69",
            QualityBucket::Low => "<50",
        }
    }

    /// Whether a score falls in this bucket
    pub fn contains(self, value: f64) -> bool {
        match self {
            QualityBucket::Excellent => (90.0..=100.0).contains(&value),
            QualityBucket::Good => (70.0..90.0).contains(&value),
            QualityBucket::Fair => (50.0..70.0).contains(&value),
            QualityBucket::Low => value > 0.0 && value < 50.0,
        }
    }
}

impl FromStr for QualityBucket {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|bucket| bucket.label() == s.trim())
            .ok_or_else(|| Error::invalid_value("quality bucket", s))
    }
}

/// Named ranges over the dividend growth rate (percent)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum GrowthBucket {
    #[serde(rename = ">15")]
    Above15,
    #[serde(rename = "10-15")]
    From10To15,
    #[serde(rename = "5-9")]
    From5To9,
    #[serde(rename = "<5")]
    Below5,
}

impl GrowthBucket {
    pub const ALL: [GrowthBucket; 4] = [
        GrowthBucket::Above15,
        GrowthBucket::From10To15,
        GrowthBucket::From5To9,
        GrowthBucket::Below5,
    ];

    pub fn label(self) -> &'static str {
        match self {
            GrowthBucket::Above15 => ">15",
            GrowthBucket::From10To15 => "10-15",
            GrowthBucket::From5To9 => "5-9",
            GrowthBucket::Below5 => "<5",
        }
    }

    /// Whether a growth rate falls in this bucket
    pub fn contains(self, value: f64) -> bool {
        match self {
            GrowthBucket::Above15 => value > 15.0,
            GrowthBucket::From10To15 => (10.0..=15.0).contains(&value),
            GrowthBucket::From5To9 => (5.0..10.0).contains(&value),
            GrowthBucket::Below5 => value > 0.0 && value < 5.0,
        }
    }
}

impl FromStr for GrowthBucket {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|bucket| bucket.label() == s.trim())
            .ok_or_else(|| Error::invalid_value("growth bucket", s))
    }
}

/// Selection over the dividend-growth flag
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DividendFlagBucket {
    Yes,
    No,
}

impl DividendFlagBucket {
    pub const ALL: [DividendFlagBucket; 2] = [DividendFlagBucket::Yes, DividendFlagBucket::No];

    pub fn label(self) -> &'static str {
        match self {
            DividendFlagBucket::Yes => "yes",
            DividendFlagBucket::No => "no",
        }
    }

    pub fn contains(self, flag: bool) -> bool {
        match self {
            DividendFlagBucket::Yes => flag,
            DividendFlagBucket::No => !flag,
        }
    }
}

impl FromStr for DividendFlagBucket {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "yes" | "si" | "sí" => Ok(DividendFlagBucket::Yes),
            "no" => Ok(DividendFlagBucket::No),
            _ => Err(Error::invalid_value("dividend flag", s)),
        }
    }
}

// =============================================================================
// Filter State
// =============================================================================

/// Live filter selections
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterState {
    /// Free-text query over ticker, name and country
    pub search: String,
    pub action_types: BTreeSet<ActionType>,
    pub countries: BTreeSet<String>,
    pub quality_grades: BTreeSet<String>,
    pub quality_buckets: BTreeSet<QualityBucket>,
    pub growth_buckets: BTreeSet<GrowthBucket>,
    pub dividend_flags: BTreeSet<DividendFlagBucket>,
}

/// Insert if absent, remove if present
fn toggle<T: Ord>(set: &mut BTreeSet<T>, value: T) {
    if set.contains(&value) {
        set.remove(&value);
    } else {
        set.insert(value);
    }
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_search(&mut self, query: impl Into<String>) {
        self.search = query.into();
    }

    pub fn toggle_action_type(&mut self, action_type: ActionType) {
        toggle(&mut self.action_types, action_type);
    }

    pub fn toggle_country(&mut self, country: &str) {
        toggle(&mut self.countries, country.to_string());
    }

    pub fn toggle_quality_grade(&mut self, grade: &str) {
        toggle(&mut self.quality_grades, grade.to_string());
    }

    pub fn toggle_quality_bucket(&mut self, bucket: QualityBucket) {
        toggle(&mut self.quality_buckets, bucket);
    }

    pub fn toggle_growth_bucket(&mut self, bucket: GrowthBucket) {
        toggle(&mut self.growth_buckets, bucket);
    }

    pub fn toggle_dividend_flag(&mut self, bucket: DividendFlagBucket) {
        toggle(&mut self.dividend_flags, bucket);
    }

    /// Replace the action selection with a coarse group
    pub fn select_group(&mut self, group: ActionGroup) {
        self.action_types = group.members().iter().copied().collect();
    }

    /// Reset every dimension
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Whether no dimension constrains the result
    pub fn is_unconstrained(&self) -> bool {
        self.search.trim().is_empty()
            && self.action_types.is_empty()
            && self.countries.is_empty()
            && self.quality_grades.is_empty()
            && self.quality_buckets.is_empty()
            && self.growth_buckets.is_empty()
            && self.dividend_flags.is_empty()
    }

    /// Check one instrument against every active dimension
    pub fn matches(&self, instrument: &Instrument) -> bool {
        passes_search(instrument, &self.search)
            && passes_set(&self.action_types, &instrument.action_type)
            && passes_set(&self.countries, &instrument.country)
            && passes_set(&self.quality_grades, &instrument.company_quality_grade)
            && passes_buckets(&self.quality_buckets, |bucket| {
                bucket.contains(instrument.dividend_quality_score)
            })
            && passes_buckets(&self.growth_buckets, |bucket| {
                bucket.contains(instrument.dividend_growth_rate)
            })
            && passes_buckets(&self.dividend_flags, |bucket| {
                bucket.contains(instrument.has_dividend_growth_flag)
            })
    }
}

/// Case-insensitive containment in ticker, name or country
pub fn passes_search(instrument: &Instrument, query: &str) -> bool {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return true;
    }

    [&instrument.ticker, &instrument.name, &instrument.country]
        .iter()
        .any(|field| field.to_lowercase().contains(&query))
}

fn passes_set<T: Ord>(selected: &BTreeSet<T>, value: &T) -> bool {
    selected.is_empty() || selected.contains(value)
}

fn passes_buckets<B: Copy>(selected: &BTreeSet<B>, contains: impl Fn(B) -> bool) -> bool {
    selected.is_empty() || selected.iter().any(|&bucket| contains(bucket))
}

/// Apply the filter state, preserving input order
pub fn apply_filters(instruments: &[Instrument], state: &FilterState) -> Vec<Instrument> {
    let filtered: Vec<Instrument> = instruments
        .iter()
        .filter(|instrument| state.matches(instrument))
        .cloned()
        .collect();

    debug!(
        "Filtering complete: {} -> {} instruments",
        instruments.len(),
        filtered.len()
    );

    filtered
}
