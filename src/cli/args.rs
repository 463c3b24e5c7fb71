//! Command-line argument definitions for the CEDEARPRO terminal dashboard
//!
//! This module defines the CLI interface using the clap derive API. Filter and
//! sort flags parse straight into the library's own selection types.

use crate::app::models::{ActionGroup, ActionType};
use crate::app::services::record_processor::{
    DividendFlagBucket, GrowthBucket, QualityBucket, SortKey,
};
use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// CLI arguments for the CEDEARPRO dashboard
#[derive(Debug, Clone, Parser)]
#[command(
    name = "cedearpro",
    version,
    about = "Filter, sort and watch the CEDEARPRO instrument sheet from the terminal",
    long_about = "Fetches the published CEDEARPRO Google Sheets CSV, classifies each \
                  instrument's buy/sell level onto a 12-step scale and prints a filtered, \
                  sorted view. A failed fetch never discards data already loaded."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Fetch once and print the filtered, sorted instrument list
    Show(ShowArgs),
    /// Refresh on an interval and print a status line per cycle
    Watch(WatchArgs),
}

/// Where the sheet text comes from
#[derive(Debug, Clone, ClapArgs)]
pub struct SourceArgs {
    /// Published CSV export URL (overrides CEDEARPRO_SHEET_URL)
    #[arg(long = "url", value_name = "URL")]
    pub url: Option<String>,

    /// Read a local CSV export instead of fetching
    #[arg(long = "file", value_name = "PATH", conflicts_with = "url")]
    pub file: Option<PathBuf>,

    /// Request timeout in milliseconds (overrides CEDEARPRO_TIMEOUT_MS)
    #[arg(long = "timeout-ms", value_name = "MS")]
    pub timeout_ms: Option<u64>,
}

/// Logging verbosity flags shared by every command
#[derive(Debug, Clone, ClapArgs)]
pub struct LoggingArgs {
    /// Logging verbosity level
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        help = "Increase logging verbosity (-v: info, -vv: debug, -vvv: trace)"
    )]
    pub verbose: u8,

    /// Only show errors
    #[arg(
        short = 'q',
        long = "quiet",
        help = "Suppress output except errors",
        conflicts_with = "verbose"
    )]
    pub quiet: bool,
}

impl LoggingArgs {
    /// Get the appropriate log level based on verbosity settings
    pub fn get_log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else {
            match self.verbose {
                0 => "warn",
                1 => "info",
                2 => "debug",
                _ => "trace",
            }
        }
    }
}

/// Arguments for the show command
#[derive(Debug, Clone, Parser)]
pub struct ShowArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Case-insensitive text matched against ticker, name and country
    #[arg(short = 's', long = "search", value_name = "TEXT")]
    pub search: Option<String>,

    /// Keep only these action types (BUY, SELL_STRONG, SELL_SOFT, NEUTRAL, UNKNOWN)
    #[arg(short = 'a', long = "action", value_name = "ACTION")]
    pub actions: Vec<ActionType>,

    /// Keep a coarse action group (all, buy, sell, neutral)
    #[arg(short = 'g', long = "group", value_name = "GROUP", conflicts_with = "actions")]
    pub group: Option<ActionGroup>,

    /// Keep only these countries
    #[arg(long = "country", value_name = "COUNTRY")]
    pub countries: Vec<String>,

    /// Keep only these company quality grades
    #[arg(long = "grade", value_name = "GRADE")]
    pub grades: Vec<String>,

    /// Dividend quality buckets: 90-100, 70-89, 50-69, <50
    #[arg(long = "quality-bucket", value_name = "BUCKET")]
    pub quality_buckets: Vec<QualityBucket>,

    /// Dividend growth buckets: >15, 10-15, 5-9, <5
    #[arg(long = "growth-bucket", value_name = "BUCKET")]
    pub growth_buckets: Vec<GrowthBucket>,

    /// Dividend growth flag: yes, no
    #[arg(long = "dividend-flag", value_name = "FLAG")]
    pub dividend_flags: Vec<DividendFlagBucket>,

    /// Sort keys in priority order, as FIELD or FIELD:asc|desc
    #[arg(long = "sort", value_name = "FIELD[:DIR]")]
    pub sort: Vec<SortKey>,

    /// Show at most this many instruments
    #[arg(short = 'n', long = "limit", value_name = "COUNT")]
    pub limit: Option<usize>,

    /// Output format for results
    #[arg(long = "format", value_enum, default_value = "human")]
    pub format: OutputFormat,

    #[command(flatten)]
    pub logging: LoggingArgs,
}

/// Arguments for the watch command
#[derive(Debug, Clone, Parser)]
pub struct WatchArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Seconds between refreshes (overrides CEDEARPRO_REFRESH_SECS)
    #[arg(short = 'i', long = "interval", value_name = "SECS")]
    pub interval_secs: Option<u64>,

    #[command(flatten)]
    pub logging: LoggingArgs,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON format for scripting
    Json,
    /// CSV format for data analysis
    Csv,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::services::record_processor::{SortDirection, SortField};

    #[test]
    fn test_show_parses_filters_and_sort() {
        let args = Args::try_parse_from([
            "cedearpro",
            "show",
            "--url",
            "https://example.com/pub?output=csv",
            "--action",
            "buy",
            "--action",
            "SELL_SOFT",
            "--quality-bucket",
            "90-100",
            "--growth-bucket",
            ">15",
            "--dividend-flag",
            "yes",
            "--sort",
            "price_local",
            "--sort",
            "ticker:asc",
            "--format",
            "json",
        ])
        .unwrap();

        let Some(Commands::Show(show)) = args.command else {
            panic!("expected show command");
        };
        assert_eq!(show.actions, vec![ActionType::Buy, ActionType::SellSoft]);
        assert_eq!(show.quality_buckets, vec![QualityBucket::Excellent]);
        assert_eq!(show.growth_buckets, vec![GrowthBucket::Above15]);
        assert_eq!(show.dividend_flags, vec![DividendFlagBucket::Yes]);
        assert_eq!(
            show.sort,
            vec![
                SortKey::new(SortField::PriceLocal, SortDirection::Desc),
                SortKey::new(SortField::Ticker, SortDirection::Asc),
            ]
        );
        assert_eq!(show.format, OutputFormat::Json);
        assert_eq!(show.logging.get_log_level(), "warn");
    }

    #[test]
    fn test_invalid_bucket_is_rejected() {
        let result = Args::try_parse_from(["cedearpro", "show", "--quality-bucket", "60-80"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_url_and_file_conflict() {
        let result = Args::try_parse_from([
            "cedearpro",
            "show",
            "--url",
            "https://example.com",
            "--file",
            "sheet.csv",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_watch_logging_levels() {
        let args = Args::try_parse_from(["cedearpro", "watch", "-vv", "--interval", "60"]).unwrap();
        let Some(Commands::Watch(watch)) = args.command else {
            panic!("expected watch command");
        };
        assert_eq!(watch.interval_secs, Some(60));
        assert_eq!(watch.logging.get_log_level(), "debug");
    }
}
