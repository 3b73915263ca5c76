//! CLI subcommand implementations.

pub mod bars;
pub mod chart;
pub mod symbols;

use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Result};
use clap::Args;
use stockchart_lib::{
    ChartRequest, ChartService, Settings, SymbolCatalog, TimeSeriesClient, ValidationContext,
};

/// Request selectors shared by `chart` and `bars`.
#[derive(Args)]
pub struct SeriesArgs {
    /// Ticker symbol from the catalog (e.g. AAPL)
    #[arg(long)]
    pub symbol: String,

    /// Chart type: Line or Bar
    #[arg(long, default_value = "Line")]
    pub chart_type: String,

    /// Time series: Intraday, Daily, Weekly or Monthly
    #[arg(long)]
    pub series: String,

    /// Start date (YYYY-MM-DD)
    #[arg(long)]
    pub start: String,

    /// End date (YYYY-MM-DD)
    #[arg(long)]
    pub end: String,

    /// Drop bars dated outside the start/end range
    #[arg(long)]
    pub clip_to_range: bool,
}

impl SeriesArgs {
    pub fn to_request(&self) -> ChartRequest {
        ChartRequest {
            symbol: self.symbol.trim().to_string(),
            chart_type: self.chart_type.trim().to_string(),
            series_kind: self.series.trim().to_string(),
            start_date: self.start.trim().to_string(),
            end_date: self.end.trim().to_string(),
        }
    }
}

pub fn load_catalog(path: &Path) -> Result<SymbolCatalog> {
    SymbolCatalog::from_path(path).map_err(|e| anyhow!("{}", e))
}

/// `--catalog` when given, otherwise the configured location.
pub fn resolve_catalog(flag: Option<&Path>, configured: &Path) -> PathBuf {
    flag.unwrap_or(configured).to_path_buf()
}

/// Wires settings, catalog and upstream client into a service.
pub fn build_service(catalog_flag: Option<&Path>, clip_to_range: bool) -> Result<ChartService> {
    let settings = Settings::from_env().map_err(|e| anyhow!("{}", e))?;
    let catalog_path = resolve_catalog(catalog_flag, &settings.catalog_path);
    let catalog = load_catalog(&catalog_path)?;
    if catalog.is_empty() {
        bail!("symbol catalog {} has no entries", catalog_path.display());
    }
    let client = TimeSeriesClient::from_settings(&settings)
        .map_err(|e| anyhow!("{}", e))?
        .with_clip_to_range(clip_to_range);
    Ok(ChartService::new(
        ValidationContext::from_catalog(&catalog),
        client,
    ))
}

/// Prints a rejected request the way a form would redisplay it.
pub fn report_rejection(request: &ChartRequest, messages: &[String]) {
    for message in messages {
        eprintln!("error: {}", message);
    }
    eprintln!(
        "submitted: symbol={:?} chart_type={:?} series={:?} start={:?} end={:?}",
        request.symbol, request.chart_type, request.series_kind, request.start_date, request.end_date
    );
}
