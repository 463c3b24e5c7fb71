//! CEDEARPRO Library
//!
//! A Rust library for turning the published CEDEARPRO Google Sheets CSV into a
//! typed, filterable and sortable set of instruments.
//!
//! This library provides tools for:
//! - Parsing the sheet CSV with quote-aware, line-oriented cell splitting
//! - Resolving logical fields against drifting headers by substring match
//! - Classifying raw buy/sell level annotations into actions and a 12-step scale
//! - Filtering, multi-key sorting and aggregating the instrument set
//! - Owning the refresh cycle so a failed fetch never clears loaded data

pub mod config;
pub mod constants;

// Core application modules
pub mod app {
    pub mod models;
    pub mod services {
        pub mod dashboard;
        pub mod record_processor;
        pub mod sheet_parser;
        pub mod sheet_source;
        pub mod signal_classifier;
    }
}

// CLI modules
pub mod cli {
    pub mod args;
    pub mod commands;
}

// Re-export commonly used types
pub use app::models::{ActionType, Instrument, ScalePosition};
pub use app::services::dashboard::{Dashboard, DashboardView, FeedStatus, RefreshOutcome};
pub use config::DashboardConfig;

/// Result type alias for the CEDEARPRO engine
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for CEDEARPRO operations
///
/// Only the fetch variants ever reach the dashboard status. Row rejections and
/// field-level parse failures are absorbed by the parser and never become errors.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Network or transport failure while fetching the sheet
    #[error("Fetch error for '{url}': {message}")]
    Fetch { url: String, message: String },

    /// The sheet endpoint answered with a non-success status
    #[error("HTTP status {status} fetching '{url}'")]
    HttpStatus { url: String, status: u16 },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// A user-supplied token (filter bucket, action, sort field) was not recognised
    #[error("Invalid {kind} value: '{value}'")]
    InvalidValue { kind: &'static str, value: String },

    /// JSON serialization failed
    #[error("Serialization error: {message}")]
    Serialization {
        message: String,
        #[source]
        source: serde_json::Error,
    },
}

impl Error {
    /// Create a fetch error with context
    pub fn fetch(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Fetch {
            url: url.into(),
            message: message.into(),
        }
    }

    /// Create a non-success HTTP status error
    pub fn http_status(url: impl Into<String>, status: u16) -> Self {
        Self::HttpStatus {
            url: url.into(),
            status,
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create an invalid value error
    pub fn invalid_value(kind: &'static str, value: impl Into<String>) -> Self {
        Self::InvalidValue {
            kind,
            value: value.into(),
        }
    }

    /// Create a serialization error with context
    pub fn serialization(message: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Serialization {
            message: message.into(),
            source,
        }
    }

    /// Whether this error belongs to the "not connected" class
    pub fn is_fetch_error(&self) -> bool {
        matches!(self, Self::Fetch { .. } | Self::HttpStatus { .. })
    }
}

impl From<serde_json::Error> for Error {
    fn from(error: serde_json::Error) -> Self {
        Self::Serialization {
            message: "JSON serialization failed".to_string(),
            source: error,
        }
    }
}
