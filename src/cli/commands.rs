//! Command implementations for the CEDEARPRO terminal dashboard
//!
//! Both commands build a [`Dashboard`], apply the selections from the command
//! line and render its view; they differ only in how often they refresh.

use crate::app::models::display::{
    UNKNOWN_VALUE, format_percent, format_price_foreign, format_price_local, format_score,
    level_bar,
};
use crate::app::models::{ActionGroup, ActionType, Instrument, QualityTier};
use crate::app::services::dashboard::{Dashboard, DashboardView, RefreshOutcome};
use crate::app::services::record_processor::SortState;
use crate::app::services::sheet_source::{
    FileSheetSource, HttpSheetSource, SheetSource, cache_busted_url, now_millis,
};
use crate::cli::args::{Args, Commands, LoggingArgs, OutputFormat, ShowArgs, SourceArgs, WatchArgs};
use crate::config::DashboardConfig;
use crate::{Error, Result};
use chrono::Utc;
use colored::*;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

/// Run the selected command
pub async fn run(args: Args) -> Result<()> {
    match args.command {
        Some(Commands::Show(show_args)) => run_show(show_args).await,
        Some(Commands::Watch(watch_args)) => run_watch(watch_args).await,
        None => Ok(()),
    }
}

/// Set up structured logging on stderr
pub fn setup_logging(args: &LoggingArgs) -> Result<()> {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let log_level = args.get_log_level();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("cedearpro={}", log_level)));

    let result = if args.quiet {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_writer(std::io::stderr)
                    .compact(),
            )
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_timer(fmt::time::uptime())
                    .with_writer(std::io::stderr),
            )
            .try_init()
    };

    result.map_err(|e| Error::configuration(format!("Failed to initialize logging: {}", e)))?;

    debug!("Logging initialized at level: {}", log_level);
    Ok(())
}

/// Layer defaults, environment and command-line overrides into a source
///
/// A `--file` run needs no URL, so only the timing settings are validated.
pub fn load_source(
    args: &SourceArgs,
    interval_secs: Option<u64>,
) -> Result<(DashboardConfig, Box<dyn SheetSource>)> {
    let mut config = DashboardConfig::from_env()?;

    if let Some(url) = &args.url {
        config = config.with_sheet_url(url.trim());
    }
    if let Some(timeout_ms) = args.timeout_ms {
        config = config.with_request_timeout_ms(timeout_ms);
    }
    if let Some(secs) = interval_secs {
        config = config.with_refresh_interval_secs(secs);
    }

    match &args.file {
        Some(path) => {
            config.validate_timing()?;
            info!("Reading sheet from file {}", path.display());
            Ok((config, Box::new(FileSheetSource::new(path.clone()))))
        }
        None => {
            config.validate()?;
            info!("Reading sheet from {}", config.sheet_url);
            let source = HttpSheetSource::new(&config)?;
            Ok((config, Box::new(source)))
        }
    }
}

/// Apply the show command's selections to a dashboard
pub fn apply_selections(dashboard: &mut Dashboard, args: &ShowArgs) {
    if let Some(search) = &args.search {
        dashboard.set_search(search.clone());
    }
    if let Some(group) = args.group {
        dashboard.select_action_group(group);
    }
    for action_type in &args.actions {
        dashboard.toggle_action_type(*action_type);
    }
    for country in &args.countries {
        dashboard.toggle_country(country);
    }
    for grade in &args.grades {
        dashboard.toggle_quality_grade(grade);
    }
    for bucket in &args.quality_buckets {
        dashboard.toggle_quality_bucket(*bucket);
    }
    for bucket in &args.growth_buckets {
        dashboard.toggle_growth_bucket(*bucket);
    }
    for flag in &args.dividend_flags {
        dashboard.toggle_dividend_flag(*flag);
    }
    if !args.sort.is_empty() {
        dashboard.set_sort(SortState::from_keys(args.sort.iter().copied()));
    }
}

async fn run_show(args: ShowArgs) -> Result<()> {
    setup_logging(&args.logging)?;

    let (config, source) = load_source(&args.source, None)?;
    let url = cache_busted_url(&config.sheet_url, &config.cache_bust_param, now_millis());
    let mut dashboard = Dashboard::new(config);

    // Fetch directly so a failure surfaces as the real error
    let text = source.fetch_text(&url).await?;
    dashboard.load_csv(&text);
    apply_selections(&mut dashboard, &args);

    let mut view = dashboard.view();
    if let Some(limit) = args.limit {
        view.instruments.truncate(limit);
    }

    match args.format {
        OutputFormat::Human => print_human(&view),
        OutputFormat::Json => print_json(&view, &dashboard)?,
        OutputFormat::Csv => print_csv(&view),
    }

    Ok(())
}

async fn run_watch(args: WatchArgs) -> Result<()> {
    setup_logging(&args.logging)?;

    let (config, source) = load_source(&args.source, args.interval_secs)?;
    let mut ticker = tokio::time::interval(config.refresh_interval());
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut dashboard = Dashboard::new(config);

    println!(
        "{} refreshing every {}s, Ctrl-C to stop",
        "CEDEARPRO".bold(),
        dashboard.config().refresh_interval_secs
    );

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let outcome = dashboard.refresh(source.as_ref()).await;
                println!("{}", status_line(&outcome, &dashboard));
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Received Ctrl-C, stopping watch");
                break;
            }
        }
    }

    Ok(())
}

// =============================================================================
// Rendering
// =============================================================================

fn action_badge(action_type: ActionType) -> ColoredString {
    let label = format!("{:<11}", action_type.label());
    match action_type {
        ActionType::Buy => label.green().bold(),
        ActionType::SellStrong => label.red().bold(),
        ActionType::SellSoft => label.yellow(),
        ActionType::Neutral => label.blue(),
        ActionType::Unknown => label.dimmed(),
    }
}

fn grade_badge(instrument: &Instrument) -> ColoredString {
    let grade = &instrument.company_quality_grade;
    match instrument.quality_tier() {
        QualityTier::Top => grade.green().bold(),
        QualityTier::High => grade.green(),
        QualityTier::Medium => grade.yellow(),
        QualityTier::Other => grade.normal(),
        QualityTier::None => UNKNOWN_VALUE.dimmed(),
    }
}

/// Twelve-character level bar, lit at the instrument's step
pub fn render_level_bar(instrument: &Instrument) -> String {
    level_bar(instrument.level_position())
        .iter()
        .map(|lit| if *lit { '■' } else { '·' })
        .collect()
}

fn status_line(outcome: &RefreshOutcome, dashboard: &Dashboard) -> String {
    let time = Utc::now().format("%H:%M:%S");
    let status = dashboard.status().to_string();
    let status = if dashboard.status().is_connected() {
        status.green()
    } else {
        status.red()
    };

    let aggregates = dashboard.aggregates();
    let counts = format!(
        "{} buy · {} sell · {} wait",
        aggregates.group_count(ActionGroup::Buy),
        aggregates.group_count(ActionGroup::Sell),
        aggregates.group_count(ActionGroup::Neutral),
    );

    match outcome {
        RefreshOutcome::Skipped => format!("[{}] {} (refresh skipped)", time, status),
        _ => format!("[{}] {} | {}", time, status, counts),
    }
}

fn print_human(view: &DashboardView) {
    let (shown, total) = view.shown_of_total();
    println!(
        "\n{} {} of {} instruments | {}",
        "CEDEARPRO".bold(),
        shown,
        total,
        view.status
    );
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    for instrument in &view.instruments {
        let level_text = instrument
            .sell_level_display()
            .or_else(|| instrument.buy_level_display())
            .unwrap_or(UNKNOWN_VALUE);

        println!(
            "{:<6} {} [{}] {:<16} {:>12} {:>11}  {}",
            instrument.ticker.bold(),
            action_badge(instrument.action_type),
            render_level_bar(instrument),
            level_text,
            format_price_local(instrument.price_local),
            format_price_foreign(instrument.price_foreign),
            instrument.name,
        );

        let mut metrics = Vec::new();
        if !instrument.country.is_empty() {
            metrics.push(instrument.country.clone());
        }
        metrics.push(format!("Calidad {}", grade_badge(instrument)));
        if let Some(score) = format_score(instrument.dividend_quality_score) {
            metrics.push(format!("Div {}", score));
        }
        if let Some(yield_text) = format_percent(instrument.dividend_yield) {
            metrics.push(format!("Yield {}", yield_text));
        }
        if let Some(growth) = format_percent(instrument.dividend_growth_5y) {
            metrics.push(format!("Crec. Div 5A {}", growth));
        }
        if let Some(growth) = format_percent(instrument.sales_growth_5y) {
            metrics.push(format!("Crec. Ventas 5A {}", growth));
        }
        if !instrument.alert.is_empty() {
            metrics.push(format!("⚑ {}", instrument.alert).magenta().to_string());
        }
        println!("       {}", metrics.join(" · ").dimmed());
    }

    println!();
    let counts: Vec<String> = view
        .aggregates
        .counts_by_action_type
        .iter()
        .map(|(action_type, count)| format!("{} {}", action_type.label(), count))
        .collect();
    println!("📊 {}", counts.join(" | "));
    if let Some(updated) = view.last_updated {
        println!("🕒 Updated {}", updated.format("%Y-%m-%d %H:%M:%S UTC"));
    }
}

fn print_json(view: &DashboardView, dashboard: &Dashboard) -> Result<()> {
    let output = serde_json::json!({
        "status": view.status,
        "shown": view.instruments.len(),
        "total": view.aggregates.total,
        "last_updated": view.last_updated,
        "filter": dashboard.filter(),
        "sort": dashboard.sort().keys(),
        "parse_stats": dashboard.last_stats(),
        "aggregates": view.aggregates,
        "instruments": view.instruments,
    });

    let text = serde_json::to_string_pretty(&output)
        .map_err(|e| Error::serialization("Failed to render JSON output", e))?;
    println!("{}", text);
    Ok(())
}

/// Quote a CSV field when it holds a delimiter or quote
pub fn csv_field(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Render the view as CSV lines, header first
pub fn render_csv(view: &DashboardView) -> Vec<String> {
    let mut lines = vec![
        "ticker,name,country,action,scale_position,buy_level,sell_level,price_local,price_foreign,yield,dividend_growth_5y,sales_growth_5y,company_quality,dividend_quality,dividend_growth_rate,dividend_growth_flag,alert"
            .to_string(),
    ];

    for i in &view.instruments {
        let fields = [
            csv_field(&i.ticker),
            csv_field(&i.name),
            csv_field(&i.country),
            i.action_type.as_str().to_string(),
            i.level_position()
                .map(|position| position.index().to_string())
                .unwrap_or_default(),
            csv_field(&i.buy_level_raw),
            csv_field(&i.sell_level_raw),
            i.price_local.to_string(),
            i.price_foreign.to_string(),
            i.dividend_yield.to_string(),
            i.dividend_growth_5y.to_string(),
            i.sales_growth_5y.to_string(),
            csv_field(&i.company_quality_grade),
            i.dividend_quality_score.to_string(),
            i.dividend_growth_rate.to_string(),
            i.has_dividend_growth_flag.to_string(),
            csv_field(&i.alert),
        ];
        lines.push(fields.join(","));
    }

    lines
}

fn print_csv(view: &DashboardView) {
    for line in render_csv(view) {
        println!("{}", line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    const SHEET: &str = "Ticker,Nombre,Pais,Nivel Compra,Nivel Venta,Precio ARS,Calidad Dividendo
MSFT,Microsoft Corp,Estados Unidos,Nivel 7,,19700,99
AAPL,Apple Inc,Estados Unidos,,N3 Venta total,18950,85
VALE,\"Vale S.A., ADR\",Brasil,E,N1 Posible venta,9000,0";

    fn loaded_dashboard() -> Dashboard {
        let mut dashboard = Dashboard::new(DashboardConfig::default());
        dashboard.load_csv(SHEET);
        dashboard
    }

    fn show_args(extra: &[&str]) -> ShowArgs {
        let mut argv = vec!["cedearpro", "show"];
        argv.extend_from_slice(extra);
        match Args::try_parse_from(argv).unwrap().command {
            Some(Commands::Show(show)) => show,
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_apply_selections_from_flags() {
        let mut dashboard = loaded_dashboard();
        apply_selections(
            &mut dashboard,
            &show_args(&["--group", "sell", "--sort", "price_local:asc"]),
        );

        let tickers: Vec<String> = dashboard
            .view()
            .instruments
            .iter()
            .map(|i| i.ticker.clone())
            .collect();
        assert_eq!(tickers, vec!["VALE", "AAPL"]);
    }

    #[test]
    fn test_level_bar_rendering() {
        let dashboard = loaded_dashboard();
        let msft = &dashboard.instruments()[0];
        assert_eq!(render_level_bar(msft), "··········■·");

        let mut no_level = msft.clone();
        no_level.has_level = false;
        assert_eq!(render_level_bar(&no_level), "············");
    }

    #[test]
    fn test_csv_output_quotes_commas() {
        let view = loaded_dashboard().view();
        let lines = render_csv(&view);

        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("ticker,name,country,action"));
        let vale = lines.iter().find(|line| line.starts_with("VALE")).unwrap();
        assert!(vale.contains("\"Vale S.A., ADR\""));
        assert!(vale.contains("SELL_SOFT"));
    }

    #[test]
    fn test_status_line_reports_group_counts() {
        let mut dashboard = loaded_dashboard();
        let line = status_line(&RefreshOutcome::Updated { instruments: 3 }, &dashboard);
        assert!(line.contains("1 buy · 2 sell · 0 wait"));

        dashboard.select_action_group(ActionGroup::Buy);
        let line = status_line(&RefreshOutcome::Skipped, &dashboard);
        assert!(line.contains("refresh skipped"));
    }

    #[test]
    fn test_csv_field_escaping() {
        assert_eq!(csv_field("plain"), "plain");
        assert_eq!(csv_field("a,b"), "\"a,b\"");
        assert_eq!(csv_field("say \"hi\""), "\"say \"\"hi\"\"\"");
    }

    #[test]
    fn test_file_source_skips_url_validation() {
        let args = show_args(&["--file", "sheet.csv"]);
        let (config, _source) = load_source(&args.source, None).unwrap();
        assert!(config.validate_timing().is_ok());
    }
}
