//! Error types for the library layer.

use thiserror::Error;

/// Every failure a chart request can end in.
#[derive(Error, Debug)]
pub enum StockChartError {
    /// The symbol catalog could not be read or parsed.
    #[error("Error loading stock data: {0}")]
    Load(String),
    /// One or more user-input rules failed. Messages are in rule order.
    #[error("Invalid input: {}", .0.join("; "))]
    Validation(Vec<String>),
    /// Non-2xx status, transport failure or timeout talking to the upstream API.
    #[error("Market data endpoint failed: {0}")]
    Endpoint(String),
    /// The upstream API rejected the query or returned an unexpected payload.
    #[error("Market data query failed: {0}")]
    Query(String),
    /// The upstream API call quota is exhausted.
    #[error("Market data call limit reached: {0}")]
    QueryLimit(String),
    /// Rendering failed for a structurally valid series.
    #[error("Error creating chart: {0}")]
    Chart(String),
    /// Missing or invalid configuration.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl StockChartError {
    /// Messages suitable for showing to the person who made the request.
    pub fn user_messages(&self) -> Vec<String> {
        match self {
            Self::Validation(messages) => messages.clone(),
            Self::Endpoint(detail) => vec![format!(
                "The market data service is unavailable. Please try again shortly. ({})",
                detail
            )],
            Self::Query(detail) => vec![format!(
                "The market data service could not answer this request: {}",
                detail
            )],
            Self::QueryLimit(_) => vec![
                "The market data API call limit has been reached. Try again later or upgrade your API key."
                    .to_string(),
            ],
            Self::Load(_) | Self::Chart(_) | Self::Config(_) => vec![self.to_string()],
        }
    }
}

impl From<alphavantage_api::Error> for StockChartError {
    fn from(e: alphavantage_api::Error) -> Self {
        match e {
            alphavantage_api::Error::RequestFailed(msg) => Self::Endpoint(msg),
            alphavantage_api::Error::HttpStatus { status, body } => {
                Self::Endpoint(format!("HTTP {}: {}", status, body))
            }
            alphavantage_api::Error::Query(msg) => Self::Query(msg),
            alphavantage_api::Error::QueryLimit(msg) => Self::QueryLimit(msg),
        }
    }
}

impl From<csv::Error> for StockChartError {
    fn from(e: csv::Error) -> Self {
        Self::Load(e.to_string())
    }
}
