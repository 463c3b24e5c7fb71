//! Record processing for the loaded instrument set
//!
//! This module turns the full instrument set into what the dashboard shows:
//! filtered by the live selections, ordered by the sort keys, and summarised
//! for the filter options.
//!
//! # Architecture
//!
//! - [`filter`] - FilterState, numeric buckets and the conjunctive filter
//! - [`sort`] - SortState with click-to-toggle keys and the stable multi-key sort
//! - [`aggregate`] - Distinct option lists and per-option counts
//!
//! # Processing Pipeline
//!
//! Every state change recomputes from scratch:
//!
//! 1. **Filter** the full set (input order preserved)
//! 2. **Sort** the survivors (stable, so equal rows keep sheet order)
//! 3. **Aggregate** over the *unfiltered* set
//!
//! # Example Usage
//!
//! ```rust
//! use cedearpro::app::models::{ActionType, Instrument};
//! use cedearpro::app::services::record_processor::{FilterState, SortState, process};
//!
//! let instruments = vec![
//!     Instrument::new("MSFT", "Microsoft Corp").unwrap(),
//!     Instrument::new("AAPL", "Apple Inc").unwrap(),
//! ];
//!
//! let mut filter = FilterState::new();
//! filter.set_search("apple");
//!
//! let view = process(&instruments, &filter, &SortState::default());
//! assert_eq!(view.len(), 1);
//! assert_eq!(view[0].action_type, ActionType::Unknown);
//! ```

pub mod aggregate;
pub mod filter;
pub mod sort;

#[cfg(test)]
pub mod tests;

pub use aggregate::{AggregateReport, counts_by_action_type, distinct_countries, distinct_quality_grades};
pub use filter::{DividendFlagBucket, FilterState, GrowthBucket, QualityBucket, apply_filters};
pub use sort::{SortDirection, SortField, SortKey, SortState, apply_sort};

use crate::app::models::Instrument;

/// Filter then sort, returning a new sequence
pub fn process(instruments: &[Instrument], filter: &FilterState, sort: &SortState) -> Vec<Instrument> {
    let mut filtered = apply_filters(instruments, filter);
    filtered.sort_by(|a, b| sort.compare(a, b));
    filtered
}
