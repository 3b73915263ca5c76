//! Time-series assembly: one upstream call per granularity, or one per
//! calendar month for intraday, normalized into an ascending bar list.

use std::sync::Arc;

use alphavantage_api::{Client, SeriesQuery};
use chrono::NaiveDate;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use crate::chunking::{chunk_range, ChunkUnit};
use crate::config::{Settings, DEFAULT_INTRADAY_CONCURRENCY};
use crate::error::StockChartError;
use crate::models::{SeriesKind, StockValue, TimeSeries};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchOptions {
    /// Upper bound on month calls in flight for an intraday fetch.
    pub intraday_concurrency: usize,
    /// Drop bars dated outside the requested range.
    pub clip_to_range: bool,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            intraday_concurrency: DEFAULT_INTRADAY_CONCURRENCY,
            clip_to_range: false,
        }
    }
}

/// Fetches and assembles [`TimeSeries`] values from the upstream API.
#[derive(Clone)]
pub struct TimeSeriesClient {
    api: Arc<Client>,
    options: FetchOptions,
}

impl TimeSeriesClient {
    pub fn new(api: Client) -> Self {
        Self {
            api: Arc::new(api),
            options: FetchOptions::default(),
        }
    }

    pub fn from_settings(settings: &Settings) -> Result<Self, StockChartError> {
        Ok(Self::new(settings.api_client()?).with_options(FetchOptions {
            intraday_concurrency: settings.intraday_concurrency,
            ..FetchOptions::default()
        }))
    }

    pub fn with_options(mut self, options: FetchOptions) -> Self {
        self.options = FetchOptions {
            intraday_concurrency: options.intraday_concurrency.max(1),
            ..options
        };
        self
    }

    pub fn with_clip_to_range(mut self, clip_to_range: bool) -> Self {
        self.options.clip_to_range = clip_to_range;
        self
    }

    pub fn options(&self) -> FetchOptions {
        self.options
    }

    /// Fetches `symbol` at `kind` granularity for `[start, end]`.
    ///
    /// Non-intraday kinds make one full-history call. Intraday makes one call
    /// per calendar month touched by the range. Any failed call fails the
    /// whole fetch; no partial series is returned.
    pub async fn fetch(
        &self,
        kind: SeriesKind,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<TimeSeries, StockChartError> {
        let chunks = if kind.function().is_month_paginated() {
            self.fetch_months(kind, symbol, start, end).await?
        } else {
            let query = SeriesQuery::new(kind.function(), symbol);
            vec![fetch_one(&self.api, &query, symbol).await?]
        };

        let calls = chunks.len();
        let mut bars = normalize(chunks);
        if self.options.clip_to_range {
            bars.retain(|bar| {
                let day = bar.timestamp.date();
                day >= start && day <= end
            });
        }

        tracing::info!(
            symbol,
            series = %kind,
            calls,
            bars = bars.len(),
            "assembled time series"
        );
        TimeSeries::new(symbol, kind, start, end, bars)
    }

    async fn fetch_months(
        &self,
        kind: SeriesKind,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Vec<StockValue>>, StockChartError> {
        let months = chunk_range(start, end, ChunkUnit::Month);
        let semaphore = Arc::new(Semaphore::new(self.options.intraday_concurrency));
        let mut join_set = JoinSet::new();

        for (idx, month) in months.iter().enumerate() {
            let sem = Arc::clone(&semaphore);
            let api = Arc::clone(&self.api);
            let query = SeriesQuery::new(kind.function(), symbol).with_month(month.start);
            let symbol = symbol.to_string();
            join_set.spawn(async move {
                let result = match sem.acquire_owned().await {
                    Ok(_permit) => fetch_one(&api, &query, &symbol).await,
                    Err(_) => Err(StockChartError::Endpoint("fetch cancelled".to_string())),
                };
                (idx, result)
            });
        }

        // Slot by month index so reassembly order never depends on completion order.
        let mut slots: Vec<Option<Result<Vec<StockValue>, StockChartError>>> =
            (0..months.len()).map(|_| None).collect();
        while let Some(joined) = join_set.join_next().await {
            let (idx, result) = joined
                .map_err(|e| StockChartError::Endpoint(format!("month fetch task failed: {}", e)))?;
            slots[idx] = Some(result);
        }

        let mut chunks = Vec::with_capacity(months.len());
        for (month, slot) in months.iter().zip(slots) {
            match slot {
                Some(Ok(bars)) => chunks.push(bars),
                Some(Err(e)) => {
                    tracing::warn!(symbol, month = %month.label(), error = %e, "intraday month failed");
                    return Err(e);
                }
                None => {
                    return Err(StockChartError::Endpoint(format!(
                        "no result for month {}",
                        month.label()
                    )))
                }
            }
        }
        Ok(chunks)
    }
}

/// One upstream call. Bars keep the API's most-recent-first order.
async fn fetch_one(
    api: &Client,
    query: &SeriesQuery,
    symbol: &str,
) -> Result<Vec<StockValue>, StockChartError> {
    let response = api.get_series(query).await?;
    if let Some(reported) = response.symbol.as_deref() {
        if !reported.eq_ignore_ascii_case(symbol) {
            tracing::debug!(requested = symbol, reported, "upstream reported a different symbol");
        }
    }
    response
        .bars
        .into_iter()
        .map(|raw| StockValue::from_raw(symbol, raw))
        .collect()
}

/// Turns per-call bar lists (each most-recent-first, in call order) into one
/// ascending list with at most one bar per timestamp.
pub fn normalize(chunks: Vec<Vec<StockValue>>) -> Vec<StockValue> {
    let mut bars: Vec<StockValue> = chunks
        .into_iter()
        .flat_map(|mut chunk| {
            chunk.reverse();
            chunk
        })
        .collect();
    bars.sort_by_key(|bar| bar.timestamp);
    bars.dedup_by_key(|bar| bar.timestamp);
    bars
}
