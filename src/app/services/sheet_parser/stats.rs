//! Parsing statistics and result structures for sheet processing
//!
//! Row rejections are never surfaced one by one; they are only counted here.

use crate::app::models::{Instrument, RowRejection};
use serde::{Deserialize, Serialize};

/// Parsing result with instruments and basic statistics
#[derive(Debug, Clone)]
pub struct ParseResult {
    /// Successfully normalized instruments in sheet order
    pub instruments: Vec<Instrument>,

    /// Basic parsing statistics
    pub stats: ParseStats,
}

/// Simple parsing statistics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParseStats {
    /// Number of non-blank data rows encountered
    pub total_rows: usize,

    /// Number of instruments produced
    pub instruments_parsed: usize,

    /// Number of rows dropped
    pub rows_rejected: usize,

    /// Rows dropped for a missing ticker
    pub missing_ticker: usize,

    /// Rows dropped for a missing name
    pub missing_name: usize,

    /// Rows dropped because the ticker was already seen
    pub duplicate_ticker: usize,

    /// Header keywords that matched no column
    pub missing_fields: Vec<String>,
}

impl ParseStats {
    /// Create new empty statistics
    pub fn new() -> Self {
        Self {
            total_rows: 0,
            instruments_parsed: 0,
            rows_rejected: 0,
            missing_ticker: 0,
            missing_name: 0,
            duplicate_ticker: 0,
            missing_fields: Vec::new(),
        }
    }

    /// Count one rejected row
    pub fn record_rejection(&mut self, reason: RowRejection) {
        self.rows_rejected += 1;
        match reason {
            RowRejection::MissingTicker => self.missing_ticker += 1,
            RowRejection::MissingName => self.missing_name += 1,
            RowRejection::DuplicateTicker => self.duplicate_ticker += 1,
        }
    }

    /// Calculate success rate as a percentage
    pub fn success_rate(&self) -> f64 {
        if self.total_rows == 0 {
            0.0
        } else {
            (self.instruments_parsed as f64 / self.total_rows as f64) * 100.0
        }
    }

    /// Whether the sheet was readable but produced no instruments
    pub fn is_empty_result(&self) -> bool {
        self.instruments_parsed == 0
    }
}

impl Default for ParseStats {
    fn default() -> Self {
        Self::new()
    }
}
