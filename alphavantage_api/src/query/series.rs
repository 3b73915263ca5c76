use chrono::NaiveDate;
use url::Url;

use crate::types::{Interval, SeriesFunction};

use super::common::{OutputSize, Query};

/// Query for one of the core time series endpoints.
///
/// The API key is not part of the query; the client appends it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SeriesQuery {
    pub function: SeriesFunction,
    pub symbol: String,
    pub output_size: OutputSize,
    pub interval: Option<Interval>,
    /// Calendar month (`YYYY-MM`) for month-paginated endpoints.
    pub month: Option<String>,
}

impl SeriesQuery {
    /// Builds a full-history query. Intraday queries get the 60-minute interval.
    pub fn new(function: SeriesFunction, symbol: &str) -> Self {
        Self {
            function,
            symbol: symbol.to_string(),
            output_size: OutputSize::Full,
            interval: function
                .is_month_paginated()
                .then_some(Interval::SixtyMinutes),
            month: None,
        }
    }

    /// Restricts a month-paginated query to the calendar month containing `date`.
    pub fn with_month(mut self, date: NaiveDate) -> Self {
        self.month = Some(date.format("%Y-%m").to_string());
        self
    }

    pub fn with_output_size(mut self, output_size: OutputSize) -> Self {
        self.output_size = output_size;
        self
    }

    pub fn with_interval(mut self, interval: Interval) -> Self {
        self.interval = Some(interval);
        self
    }
}

impl Query for SeriesQuery {
    fn add_to_url(&self, url: &Url) -> Url {
        let mut url = url.clone();
        url.query_pairs_mut()
            .append_pair("function", self.function.as_param())
            .append_pair("symbol", &self.symbol)
            .append_pair("outputsize", &self.output_size.to_string());
        if let Some(interval) = self.interval {
            url.query_pairs_mut()
                .append_pair("interval", &interval.to_string());
        }
        if let Some(month) = &self.month {
            url.query_pairs_mut().append_pair("month", month);
        }
        url
    }
}
