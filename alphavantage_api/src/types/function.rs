use std::fmt;

use serde::{Deserialize, Serialize};

/// Bar interval requested for intraday series. Only hourly bars are used.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Interval {
    #[serde(rename = "60min")]
    SixtyMinutes,
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Interval::SixtyMinutes => write!(f, "60min"),
        }
    }
}

/// Server-assigned keys of the five numeric fields in one series record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldKeys {
    pub open: &'static str,
    pub high: &'static str,
    pub low: &'static str,
    pub close: &'static str,
    pub volume: &'static str,
}

/// Field keys shared by every core time series endpoint.
pub const NUMBERED_FIELDS: FieldKeys = FieldKeys {
    open: "1. open",
    high: "2. high",
    low: "3. low",
    close: "4. close",
    volume: "5. volume",
};

/// Time series endpoints, one per granularity.
///
/// Each variant knows its `function` parameter, the top-level key that holds
/// the date-keyed series in the response, and the keys of its record fields.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SeriesFunction {
    #[serde(rename = "TIME_SERIES_INTRADAY")]
    Intraday,
    #[serde(rename = "TIME_SERIES_DAILY")]
    Daily,
    #[serde(rename = "TIME_SERIES_WEEKLY")]
    Weekly,
    #[serde(rename = "TIME_SERIES_MONTHLY")]
    Monthly,
}

impl SeriesFunction {
    pub const ALL: [SeriesFunction; 4] = [
        SeriesFunction::Intraday,
        SeriesFunction::Daily,
        SeriesFunction::Weekly,
        SeriesFunction::Monthly,
    ];

    /// Value of the `function` query parameter.
    pub fn as_param(&self) -> &'static str {
        match self {
            SeriesFunction::Intraday => "TIME_SERIES_INTRADAY",
            SeriesFunction::Daily => "TIME_SERIES_DAILY",
            SeriesFunction::Weekly => "TIME_SERIES_WEEKLY",
            SeriesFunction::Monthly => "TIME_SERIES_MONTHLY",
        }
    }

    /// Top-level response key holding the date-keyed records.
    ///
    /// The intraday key embeds the interval; only 60-minute bars are requested.
    pub fn series_key(&self) -> &'static str {
        match self {
            SeriesFunction::Intraday => "Time Series (60min)",
            SeriesFunction::Daily => "Time Series (Daily)",
            SeriesFunction::Weekly => "Weekly Time Series",
            SeriesFunction::Monthly => "Monthly Time Series",
        }
    }

    pub fn field_keys(&self) -> &'static FieldKeys {
        match self {
            SeriesFunction::Intraday
            | SeriesFunction::Daily
            | SeriesFunction::Weekly
            | SeriesFunction::Monthly => &NUMBERED_FIELDS,
        }
    }

    /// Intraday calls return a single calendar month and need `month`/`interval`.
    pub fn is_month_paginated(&self) -> bool {
        matches!(self, SeriesFunction::Intraday)
    }
}

impl fmt::Display for SeriesFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_param())
    }
}
