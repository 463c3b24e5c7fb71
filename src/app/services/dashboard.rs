//! Dashboard state owner and recompute pipeline
//!
//! One `Dashboard` owns the instrument set, the filter and sort selections and
//! the feed status. Data flows one way: fetched text is parsed into a fresh set
//! that replaces the old one wholesale, and every [`Dashboard::view`] filters,
//! sorts and aggregates from scratch.
//!
//! A failed fetch never touches the loaded set; it only flips the status to
//! [`FeedStatus::Disconnected`].

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, info, warn};

use crate::Result;
use crate::app::models::{ActionGroup, ActionType, Instrument};
use crate::app::services::record_processor::{
    AggregateReport, DividendFlagBucket, FilterState, GrowthBucket, QualityBucket, SortField,
    SortState, process,
};
use crate::app::services::sheet_parser::{ParseStats, SheetCsvParser};
use crate::app::services::sheet_source::{SheetSource, cache_busted_url, now_millis};
use crate::config::DashboardConfig;

/// Connection state shown at the top level
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum FeedStatus {
    /// Nothing fetched yet
    NotLoaded,
    /// Last cycle produced instruments
    Connected { instruments: usize },
    /// Last cycle fetched fine but no row survived normalization
    NoUsableData,
    /// Last fetch failed; previously loaded data is still served
    Disconnected { reason: String },
}

impl FeedStatus {
    pub fn is_connected(&self) -> bool {
        matches!(self, FeedStatus::Connected { .. } | FeedStatus::NoUsableData)
    }
}

impl std::fmt::Display for FeedStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FeedStatus::NotLoaded => f.write_str("not loaded"),
            FeedStatus::Connected { instruments } => write!(f, "connected ({} instruments)", instruments),
            FeedStatus::NoUsableData => f.write_str("connected, no usable data"),
            FeedStatus::Disconnected { reason } => write!(f, "disconnected: {}", reason),
        }
    }
}

/// Guard value meaning no refresh is outstanding; ticket ids start at 1
const IDLE: u64 = 0;

/// Proof that a refresh cycle was started; hand it back to finish the cycle
///
/// Dropping a ticket unfinished (a cancelled fetch, say) releases the
/// in-flight guard and leaves the loaded set and status untouched.
#[derive(Debug)]
#[must_use = "dropping the ticket abandons the refresh cycle"]
pub struct RefreshTicket {
    id: u64,
    started_at: DateTime<Utc>,
    guard: Arc<AtomicU64>,
}

impl RefreshTicket {
    pub fn id(&self) -> u64 {
        self.id
    }
}

impl Drop for RefreshTicket {
    fn drop(&mut self) {
        if self
            .guard
            .compare_exchange(self.id, IDLE, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
        {
            debug!("Refresh {} released", self.id);
        }
    }
}

/// Result of one refresh cycle
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum RefreshOutcome {
    /// A fresh set replaced the old one
    Updated { instruments: usize },
    /// The sheet was readable but yielded nothing
    Empty,
    /// The fetch failed; the old set is kept
    Failed { reason: String },
    /// Another refresh was already in flight
    Skipped,
}

/// Everything the presentation layer renders
#[derive(Debug, Clone, Serialize)]
pub struct DashboardView {
    /// Filtered and sorted instruments
    pub instruments: Vec<Instrument>,

    /// Option lists and counts over the unfiltered set
    pub aggregates: AggregateReport,

    pub status: FeedStatus,
    pub last_updated: Option<DateTime<Utc>>,
}

impl DashboardView {
    /// Instruments shown out of instruments loaded
    pub fn shown_of_total(&self) -> (usize, usize) {
        (self.instruments.len(), self.aggregates.total)
    }
}

/// Single owner of the dashboard state
#[derive(Debug)]
pub struct Dashboard {
    config: DashboardConfig,
    parser: SheetCsvParser,
    instruments: Vec<Instrument>,
    aggregates: AggregateReport,
    filter: FilterState,
    sort: SortState,
    status: FeedStatus,
    last_stats: Option<ParseStats>,
    last_updated: Option<DateTime<Utc>>,
    /// Id of the outstanding ticket, `IDLE` when none
    in_flight: Arc<AtomicU64>,
    next_ticket: u64,
}

impl Dashboard {
    pub fn new(config: DashboardConfig) -> Self {
        Self {
            config,
            parser: SheetCsvParser::new(),
            instruments: Vec::new(),
            aggregates: AggregateReport::from_instruments(&[]),
            filter: FilterState::default(),
            sort: SortState::default(),
            status: FeedStatus::NotLoaded,
            last_stats: None,
            last_updated: None,
            in_flight: Arc::new(AtomicU64::new(IDLE)),
            next_ticket: IDLE + 1,
        }
    }

    // -------------------------------------------------------------------------
    // Refresh cycle
    // -------------------------------------------------------------------------

    /// Parse CSV text and atomically replace the instrument set
    pub fn load_csv(&mut self, text: &str) -> RefreshOutcome {
        let result = self.parser.parse_text(text);
        let count = result.instruments.len();

        self.instruments = result.instruments;
        self.aggregates = AggregateReport::from_instruments(&self.instruments);
        self.last_stats = Some(result.stats);
        self.last_updated = Some(Utc::now());

        if count == 0 {
            warn!("Sheet loaded but produced no usable instruments");
            self.status = FeedStatus::NoUsableData;
            RefreshOutcome::Empty
        } else {
            info!("Loaded {} instruments", count);
            self.status = FeedStatus::Connected { instruments: count };
            RefreshOutcome::Updated { instruments: count }
        }
    }

    /// Start a refresh cycle, or `None` if one is already outstanding
    pub fn begin_refresh(&mut self) -> Option<RefreshTicket> {
        let id = self.next_ticket;
        if let Err(outstanding) = self
            .in_flight
            .compare_exchange(IDLE, id, Ordering::AcqRel, Ordering::Acquire)
        {
            warn!("Refresh {} still in flight; skipping new trigger", outstanding);
            return None;
        }

        self.next_ticket += 1;
        debug!("Refresh {} started", id);

        Some(RefreshTicket {
            id,
            started_at: Utc::now(),
            guard: Arc::clone(&self.in_flight),
        })
    }

    /// Complete a refresh cycle with the fetch result
    pub fn finish_refresh(&mut self, ticket: RefreshTicket, fetched: Result<String>) -> RefreshOutcome {
        let elapsed = Utc::now() - ticket.started_at;
        debug!("Refresh {} took {} ms", ticket.id, elapsed.num_milliseconds());
        drop(ticket);

        match fetched {
            Ok(text) => self.load_csv(&text),
            Err(error) => {
                warn!(
                    "Sheet fetch failed, keeping {} loaded instruments: {}",
                    self.instruments.len(),
                    error
                );
                let reason = error.to_string();
                self.status = FeedStatus::Disconnected {
                    reason: reason.clone(),
                };
                RefreshOutcome::Failed { reason }
            }
        }
    }

    /// Fetch the configured sheet through `source` and load it
    pub async fn refresh(&mut self, source: &dyn SheetSource) -> RefreshOutcome {
        let Some(ticket) = self.begin_refresh() else {
            return RefreshOutcome::Skipped;
        };

        let url = cache_busted_url(
            &self.config.sheet_url,
            &self.config.cache_bust_param,
            now_millis(),
        );
        let fetched = source.fetch_text(&url).await;

        self.finish_refresh(ticket, fetched)
    }

    // -------------------------------------------------------------------------
    // View
    // -------------------------------------------------------------------------

    /// Filter, sort and aggregate from the current state
    pub fn view(&self) -> DashboardView {
        let instruments = process(&self.instruments, &self.filter, &self.sort);
        debug!(
            "View: {} of {} instruments",
            instruments.len(),
            self.instruments.len()
        );

        DashboardView {
            instruments,
            aggregates: self.aggregates.clone(),
            status: self.status.clone(),
            last_updated: self.last_updated,
        }
    }

    // -------------------------------------------------------------------------
    // Mutators
    // -------------------------------------------------------------------------

    pub fn toggle_action_type(&mut self, action_type: ActionType) {
        self.filter.toggle_action_type(action_type);
    }

    pub fn select_action_group(&mut self, group: ActionGroup) {
        self.filter.select_group(group);
    }

    pub fn toggle_country(&mut self, country: &str) {
        self.filter.toggle_country(country);
    }

    pub fn toggle_quality_grade(&mut self, grade: &str) {
        self.filter.toggle_quality_grade(grade);
    }

    pub fn toggle_quality_bucket(&mut self, bucket: QualityBucket) {
        self.filter.toggle_quality_bucket(bucket);
    }

    pub fn toggle_growth_bucket(&mut self, bucket: GrowthBucket) {
        self.filter.toggle_growth_bucket(bucket);
    }

    pub fn toggle_dividend_flag(&mut self, bucket: DividendFlagBucket) {
        self.filter.toggle_dividend_flag(bucket);
    }

    pub fn set_search(&mut self, query: impl Into<String>) {
        self.filter.set_search(query);
    }

    pub fn toggle_sort(&mut self, field: SortField) {
        self.sort.toggle(field);
    }

    pub fn reset_sort(&mut self) {
        self.sort.reset();
    }

    /// Replace the sort keys wholesale
    pub fn set_sort(&mut self, sort: SortState) {
        self.sort = sort;
    }

    pub fn clear_filters(&mut self) {
        self.filter.clear();
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    /// The full, unfiltered set in sheet order
    pub fn instruments(&self) -> &[Instrument] {
        &self.instruments
    }

    /// Option lists and counts over the unfiltered set
    pub fn aggregates(&self) -> &AggregateReport {
        &self.aggregates
    }

    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    pub fn sort(&self) -> &SortState {
        &self.sort
    }

    pub fn status(&self) -> &FeedStatus {
        &self.status
    }

    pub fn last_stats(&self) -> Option<&ParseStats> {
        self.last_stats.as_ref()
    }

    pub fn last_updated(&self) -> Option<DateTime<Utc>> {
        self.last_updated
    }

    pub fn is_refreshing(&self) -> bool {
        self.in_flight.load(Ordering::Acquire) != IDLE
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use crate::app::services::sheet_source::StaticSheetSource;
    use futures::future::BoxFuture;
    use std::sync::Mutex;

    const SHEET: &str = "Ticker,Nombre,Pais,Nivel Compra,Nivel Venta,Calidad Dividendo
MSFT,Microsoft Corp,Estados Unidos,Nivel 7,,99
AAPL,Apple Inc,Estados Unidos,,N3 Venta total,85
VALE,Vale SA,Brasil,E,N1 Posible venta,0";

    /// Records the URL of every request
    struct RecordingSource {
        body: String,
        urls: Mutex<Vec<String>>,
    }

    impl SheetSource for RecordingSource {
        fn fetch_text<'a>(&'a self, url: &'a str) -> BoxFuture<'a, Result<String>> {
            Box::pin(async move {
                self.urls.lock().unwrap().push(url.to_string());
                Ok(self.body.clone())
            })
        }
    }

    fn create_test_dashboard() -> Dashboard {
        Dashboard::new(DashboardConfig::default().with_sheet_url("https://example.com/pub?output=csv"))
    }

    fn tickers(view: &DashboardView) -> Vec<&str> {
        view.instruments.iter().map(|i| i.ticker.as_str()).collect()
    }

    #[test]
    fn test_load_replaces_set_and_connects() {
        let mut dashboard = create_test_dashboard();
        assert_eq!(dashboard.status(), &FeedStatus::NotLoaded);

        let outcome = dashboard.load_csv(SHEET);

        assert_eq!(outcome, RefreshOutcome::Updated { instruments: 3 });
        assert_eq!(dashboard.status(), &FeedStatus::Connected { instruments: 3 });
        assert_eq!(dashboard.instruments().len(), 3);
        assert!(dashboard.last_updated().is_some());
        assert_eq!(dashboard.last_stats().unwrap().instruments_parsed, 3);
    }

    #[test]
    fn test_aggregates_ignore_filters() {
        let mut dashboard = create_test_dashboard();
        dashboard.load_csv(SHEET);
        dashboard.select_action_group(ActionGroup::Buy);

        assert_eq!(dashboard.aggregates().total, 3);
        assert_eq!(dashboard.aggregates().group_count(ActionGroup::Sell), 2);
        assert_eq!(dashboard.aggregates(), &dashboard.view().aggregates);
    }

    #[test]
    fn test_default_view_sorted_by_ticker() {
        let mut dashboard = create_test_dashboard();
        dashboard.load_csv(SHEET);

        let view = dashboard.view();
        assert_eq!(tickers(&view), vec!["AAPL", "MSFT", "VALE"]);
        assert_eq!(view.shown_of_total(), (3, 3));
    }

    #[test]
    fn test_failed_fetch_keeps_previous_set() {
        let mut dashboard = create_test_dashboard();
        dashboard.load_csv(SHEET);

        let ticket = dashboard.begin_refresh().unwrap();
        let outcome = dashboard.finish_refresh(ticket, Err(Error::http_status("https://example.com", 503)));

        assert!(matches!(outcome, RefreshOutcome::Failed { .. }));
        assert!(matches!(dashboard.status(), FeedStatus::Disconnected { .. }));
        assert!(!dashboard.status().is_connected());
        assert_eq!(dashboard.instruments().len(), 3);
        assert_eq!(dashboard.view().instruments.len(), 3);
    }

    #[test]
    fn test_empty_sheet_is_connected_without_data() {
        let mut dashboard = create_test_dashboard();
        let outcome = dashboard.load_csv("Ticker,Nombre\n,,\nXYZ,#N/A");

        assert_eq!(outcome, RefreshOutcome::Empty);
        assert_eq!(dashboard.status(), &FeedStatus::NoUsableData);
        assert!(dashboard.status().is_connected());
        assert_eq!(dashboard.last_stats().unwrap().rows_rejected, 2);
    }

    #[test]
    fn test_second_trigger_is_skipped_while_in_flight() {
        let mut dashboard = create_test_dashboard();

        let ticket = dashboard.begin_refresh().unwrap();
        assert!(dashboard.is_refreshing());
        assert!(dashboard.begin_refresh().is_none());

        dashboard.finish_refresh(ticket, Ok(SHEET.to_string()));
        assert!(!dashboard.is_refreshing());
        assert!(dashboard.begin_refresh().is_some());
    }

    #[test]
    fn test_mutators_drive_the_view() {
        let mut dashboard = create_test_dashboard();
        dashboard.load_csv(SHEET);

        dashboard.select_action_group(ActionGroup::Sell);
        assert_eq!(tickers(&dashboard.view()), vec!["AAPL", "VALE"]);

        dashboard.toggle_country("Brasil");
        assert_eq!(tickers(&dashboard.view()), vec!["VALE"]);

        dashboard.clear_filters();
        dashboard.toggle_quality_bucket(QualityBucket::Excellent);
        assert_eq!(tickers(&dashboard.view()), vec!["MSFT"]);

        dashboard.clear_filters();
        dashboard.reset_sort();
        dashboard.toggle_sort(SortField::Ticker);
        dashboard.toggle_sort(SortField::DividendQuality);
        assert_eq!(tickers(&dashboard.view()), vec!["MSFT", "AAPL", "VALE"]);

        dashboard.set_search("micro");
        let view = dashboard.view();
        assert_eq!(tickers(&view), vec!["MSFT"]);
        assert_eq!(view.aggregates.total, 3);
    }

    #[tokio::test]
    async fn test_refresh_appends_cache_buster() {
        let mut dashboard = create_test_dashboard();
        let source = RecordingSource {
            body: SHEET.to_string(),
            urls: Mutex::new(Vec::new()),
        };

        let outcome = dashboard.refresh(&source).await;

        assert_eq!(outcome, RefreshOutcome::Updated { instruments: 3 });
        let urls = source.urls.lock().unwrap();
        assert_eq!(urls.len(), 1);
        assert!(urls[0].starts_with("https://example.com/pub?output=csv&t="));
    }

    #[tokio::test]
    async fn test_refresh_skipped_while_ticket_outstanding() {
        let mut dashboard = create_test_dashboard();
        let ticket = dashboard.begin_refresh().unwrap();

        let outcome = dashboard.refresh(&StaticSheetSource::text(SHEET)).await;
        assert_eq!(outcome, RefreshOutcome::Skipped);
        assert_eq!(dashboard.status(), &FeedStatus::NotLoaded);

        dashboard.finish_refresh(ticket, Ok(SHEET.to_string()));
        assert_eq!(dashboard.status(), &FeedStatus::Connected { instruments: 3 });
    }

    /// Never answers within a test's lifetime
    struct StalledSource;

    impl SheetSource for StalledSource {
        fn fetch_text<'a>(&'a self, _url: &'a str) -> BoxFuture<'a, Result<String>> {
            Box::pin(async {
                tokio::time::sleep(std::time::Duration::from_secs(3600)).await;
                Ok(String::new())
            })
        }
    }

    #[tokio::test]
    async fn test_cancelled_refresh_releases_guard() {
        let mut dashboard = create_test_dashboard();
        dashboard.load_csv(SHEET);

        let cancelled = tokio::time::timeout(
            std::time::Duration::from_millis(20),
            dashboard.refresh(&StalledSource),
        )
        .await;
        assert!(cancelled.is_err());
        assert!(!dashboard.is_refreshing());
        assert_eq!(dashboard.status(), &FeedStatus::Connected { instruments: 3 });
        assert_eq!(dashboard.instruments().len(), 3);

        let outcome = dashboard
            .refresh(&StaticSheetSource::text("Ticker,Nombre\nAAPL,Apple"))
            .await;
        assert_eq!(outcome, RefreshOutcome::Updated { instruments: 1 });
    }

    #[test]
    fn test_dropped_ticket_allows_next_cycle() {
        let mut dashboard = create_test_dashboard();

        let first = dashboard.begin_refresh().unwrap();
        let first_id = first.id();
        drop(first);
        assert!(!dashboard.is_refreshing());

        let second = dashboard.begin_refresh().unwrap();
        assert!(second.id() > first_id);
        assert!(dashboard.begin_refresh().is_none());
        dashboard.finish_refresh(second, Ok(SHEET.to_string()));
        assert!(!dashboard.is_refreshing());
    }

    #[tokio::test]
    async fn test_refresh_failure_then_recovery() {
        let mut dashboard = create_test_dashboard();
        dashboard.refresh(&StaticSheetSource::text(SHEET)).await;

        let failed = dashboard
            .refresh(&StaticSheetSource::failure("connection reset"))
            .await;
        assert!(matches!(failed, RefreshOutcome::Failed { ref reason } if reason.contains("connection reset")));
        assert_eq!(dashboard.instruments().len(), 3);

        let recovered = dashboard.refresh(&StaticSheetSource::text(SHEET)).await;
        assert_eq!(recovered, RefreshOutcome::Updated { instruments: 3 });
        assert!(dashboard.status().is_connected());
    }
}
