//! Option lists and summary counts over the full instrument set
//!
//! Counts are always taken over the unfiltered set, so each filter option can
//! show how many instruments selecting it would bring in.

use super::filter::{DividendFlagBucket, GrowthBucket, QualityBucket};
use crate::app::models::{ActionGroup, ActionType, Instrument};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Sorted distinct non-empty countries
pub fn distinct_countries(instruments: &[Instrument]) -> Vec<String> {
    distinct_non_empty(instruments.iter().map(|instrument| &instrument.country))
}

/// Sorted distinct non-empty company quality grades
pub fn distinct_quality_grades(instruments: &[Instrument]) -> Vec<String> {
    distinct_non_empty(
        instruments
            .iter()
            .map(|instrument| &instrument.company_quality_grade),
    )
}

fn distinct_non_empty<'a>(values: impl Iterator<Item = &'a String>) -> Vec<String> {
    values
        .filter(|value| !value.is_empty())
        .cloned()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Instrument count per action type; every action type is present
pub fn counts_by_action_type(instruments: &[Instrument]) -> BTreeMap<ActionType, usize> {
    let mut counts: BTreeMap<ActionType, usize> = ActionType::all_values()
        .into_iter()
        .map(|action_type| (action_type, 0))
        .collect();

    for instrument in instruments {
        *counts.entry(instrument.action_type).or_insert(0) += 1;
    }

    counts
}

fn count_by<'a>(values: impl Iterator<Item = &'a String>) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for value in values.filter(|value| !value.is_empty()) {
        *counts.entry(value.clone()).or_insert(0) += 1;
    }
    counts
}

/// Everything the option lists and header stats need, computed in one pass
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateReport {
    pub total: usize,

    /// Instruments carrying a concrete level
    pub with_level: usize,

    pub distinct_countries: Vec<String>,
    pub distinct_quality_grades: Vec<String>,
    pub counts_by_action_type: BTreeMap<ActionType, usize>,
    pub counts_by_country: BTreeMap<String, usize>,
    pub counts_by_quality_grade: BTreeMap<String, usize>,
    pub counts_by_quality_bucket: BTreeMap<QualityBucket, usize>,
    pub counts_by_growth_bucket: BTreeMap<GrowthBucket, usize>,
    pub counts_by_dividend_flag: BTreeMap<DividendFlagBucket, usize>,
}

impl AggregateReport {
    pub fn from_instruments(instruments: &[Instrument]) -> Self {
        let counts_by_quality_bucket = QualityBucket::ALL
            .into_iter()
            .map(|bucket| {
                let count = instruments
                    .iter()
                    .filter(|instrument| bucket.contains(instrument.dividend_quality_score))
                    .count();
                (bucket, count)
            })
            .collect();

        let counts_by_growth_bucket = GrowthBucket::ALL
            .into_iter()
            .map(|bucket| {
                let count = instruments
                    .iter()
                    .filter(|instrument| bucket.contains(instrument.dividend_growth_rate))
                    .count();
                (bucket, count)
            })
            .collect();

        let counts_by_dividend_flag = DividendFlagBucket::ALL
            .into_iter()
            .map(|bucket| {
                let count = instruments
                    .iter()
                    .filter(|instrument| bucket.contains(instrument.has_dividend_growth_flag))
                    .count();
                (bucket, count)
            })
            .collect();

        Self {
            total: instruments.len(),
            with_level: instruments.iter().filter(|i| i.has_level).count(),
            distinct_countries: distinct_countries(instruments),
            distinct_quality_grades: distinct_quality_grades(instruments),
            counts_by_action_type: counts_by_action_type(instruments),
            counts_by_country: count_by(instruments.iter().map(|i| &i.country)),
            counts_by_quality_grade: count_by(
                instruments.iter().map(|i| &i.company_quality_grade),
            ),
            counts_by_quality_bucket,
            counts_by_growth_bucket,
            counts_by_dividend_flag,
        }
    }

    pub fn action_count(&self, action_type: ActionType) -> usize {
        self.counts_by_action_type
            .get(&action_type)
            .copied()
            .unwrap_or(0)
    }

    /// Count for a coarse group; `All` is the total
    pub fn group_count(&self, group: ActionGroup) -> usize {
        match group {
            ActionGroup::All => self.total,
            _ => group
                .members()
                .iter()
                .map(|action_type| self.action_count(*action_type))
                .sum(),
        }
    }
}
