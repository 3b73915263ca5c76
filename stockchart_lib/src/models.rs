//! Domain types: chart styles, series granularities, price bars and series.

use std::fmt;
use std::str::FromStr;

use alphavantage_api::types::{RawBar, SeriesFunction};
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::error::StockChartError;

/// Time bucket size of a series.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SeriesKind {
    Intraday,
    Daily,
    Weekly,
    Monthly,
}

impl SeriesKind {
    pub const ALL: [SeriesKind; 4] = [
        SeriesKind::Intraday,
        SeriesKind::Daily,
        SeriesKind::Weekly,
        SeriesKind::Monthly,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SeriesKind::Intraday => "Intraday",
            SeriesKind::Daily => "Daily",
            SeriesKind::Weekly => "Weekly",
            SeriesKind::Monthly => "Monthly",
        }
    }

    /// Upstream endpoint serving this granularity.
    pub fn function(&self) -> SeriesFunction {
        match self {
            SeriesKind::Intraday => SeriesFunction::Intraday,
            SeriesKind::Daily => SeriesFunction::Daily,
            SeriesKind::Weekly => SeriesFunction::Weekly,
            SeriesKind::Monthly => SeriesFunction::Monthly,
        }
    }
}

impl fmt::Display for SeriesKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SeriesKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SeriesKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or(())
    }
}

/// Chart style.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChartType {
    Bar,
    Line,
}

impl ChartType {
    pub const ALL: [ChartType; 2] = [ChartType::Bar, ChartType::Line];

    pub fn as_str(&self) -> &'static str {
        match self {
            ChartType::Bar => "Bar",
            ChartType::Line => "Line",
        }
    }
}

impl fmt::Display for ChartType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChartType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ChartType::ALL
            .into_iter()
            .find(|chart| chart.as_str() == s)
            .ok_or(())
    }
}

/// One OHLCV price bar.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StockValue {
    pub symbol: String,
    /// Date as the upstream API labels it (`YYYY-MM-DD` or `YYYY-MM-DD HH:MM:SS`).
    pub date: String,
    #[serde(skip)]
    pub timestamp: NaiveDateTime,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

impl StockValue {
    /// Converts an upstream record, labelling it with `symbol`.
    pub fn from_raw(symbol: &str, raw: RawBar) -> Result<Self, StockChartError> {
        let timestamp = parse_bar_timestamp(&raw.timestamp).ok_or_else(|| {
            StockChartError::Query(format!("unparseable bar date '{}'", raw.timestamp))
        })?;
        Ok(Self {
            symbol: symbol.to_string(),
            date: raw.timestamp,
            timestamp,
            open: raw.open,
            high: raw.high,
            low: raw.low,
            close: raw.close,
            volume: raw.volume,
        })
    }
}

/// Parses the two date shapes the upstream API uses for series keys.
pub fn parse_bar_timestamp(input: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(input, "%Y-%m-%d %H:%M:%S")
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(input, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

/// A fetched series, ready for rendering.
///
/// Bars all carry the series symbol and are in ascending date order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeSeries {
    symbol: String,
    series_kind: SeriesKind,
    start_date: NaiveDate,
    end_date: NaiveDate,
    bars: Vec<StockValue>,
}

impl TimeSeries {
    pub fn new(
        symbol: &str,
        series_kind: SeriesKind,
        start_date: NaiveDate,
        end_date: NaiveDate,
        bars: Vec<StockValue>,
    ) -> Result<Self, StockChartError> {
        if let Some(stray) = bars.iter().find(|bar| bar.symbol != symbol) {
            return Err(StockChartError::Query(format!(
                "bar for '{}' in a '{}' series",
                stray.symbol, symbol
            )));
        }
        if bars.windows(2).any(|pair| pair[0].timestamp > pair[1].timestamp) {
            return Err(StockChartError::Query(
                "bars are not in ascending date order".to_string(),
            ));
        }
        Ok(Self {
            symbol: symbol.to_string(),
            series_kind,
            start_date,
            end_date,
            bars,
        })
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn series_kind(&self) -> SeriesKind {
        self.series_kind
    }

    pub fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    pub fn end_date(&self) -> NaiveDate {
        self.end_date
    }

    pub fn bars(&self) -> &[StockValue] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }
}
