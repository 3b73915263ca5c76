//! Runtime settings read from the process environment.

use std::path::PathBuf;
use std::time::Duration;

use crate::error::StockChartError;

pub const DEFAULT_BASE_URL: &str = "https://www.alphavantage.co";
pub const DEFAULT_CATALOG_PATH: &str = "stocks.csv";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_INTRADAY_CONCURRENCY: usize = 2;

/// Settings shared by the fetch pipeline and the CLI.
///
/// `Debug` is implemented by hand so the API key never reaches a log line.
#[derive(Clone)]
pub struct Settings {
    pub api_key: String,
    pub base_url: String,
    pub timeout: Duration,
    pub intraday_concurrency: usize,
    pub catalog_path: PathBuf,
}

impl std::fmt::Debug for Settings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Settings")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("intraday_concurrency", &self.intraday_concurrency)
            .field("catalog_path", &self.catalog_path)
            .finish()
    }
}

impl Settings {
    /// Reads settings from the environment.
    ///
    /// `ALPHAVANTAGE_API_KEY` is required. Numeric variables that fail to
    /// parse fall back to their defaults.
    pub fn from_env() -> Result<Self, StockChartError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`Settings::from_env`] with an injectable variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, StockChartError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup("ALPHAVANTAGE_API_KEY")
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty())
            .ok_or_else(|| {
                StockChartError::Config("ALPHAVANTAGE_API_KEY is not set".to_string())
            })?;

        let base_url = lookup("ALPHAVANTAGE_BASE_URL")
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let catalog_path = catalog_path_from_lookup(&lookup);

        Ok(Self {
            api_key,
            base_url,
            timeout: Duration::from_secs(env_u64(
                &lookup,
                "STOCKCHART_TIMEOUT_SECS",
                DEFAULT_TIMEOUT_SECS,
            )),
            intraday_concurrency: env_usize(
                &lookup,
                "STOCKCHART_INTRADAY_CONCURRENCY",
                DEFAULT_INTRADAY_CONCURRENCY,
            )
            .max(1),
            catalog_path,
        })
    }

    /// Builds the upstream client these settings describe.
    pub fn api_client(&self) -> Result<alphavantage_api::Client, StockChartError> {
        Ok(alphavantage_api::Client::with_base_url(&self.base_url, &self.api_key)?
            .with_timeout(self.timeout)?)
    }
}

/// Catalog location from `STOCKCHART_CATALOG`, for callers that need the
/// catalog without an API key.
pub fn catalog_path_from_env() -> PathBuf {
    catalog_path_from_lookup(&|key: &str| std::env::var(key).ok())
}

fn catalog_path_from_lookup<F: Fn(&str) -> Option<String>>(lookup: &F) -> PathBuf {
    lookup("STOCKCHART_CATALOG")
        .filter(|path| !path.trim().is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CATALOG_PATH))
}

fn env_u64<F: Fn(&str) -> Option<String>>(lookup: &F, key: &str, default: u64) -> u64 {
    lookup(key)
        .and_then(|val| val.trim().parse::<u64>().ok())
        .unwrap_or(default)
}

fn env_usize<F: Fn(&str) -> Option<String>>(lookup: &F, key: &str, default: usize) -> usize {
    lookup(key)
        .and_then(|val| val.trim().parse::<usize>().ok())
        .unwrap_or(default)
}
