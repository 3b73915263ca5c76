//! HTTP client for the Alpha Vantage query API.

use std::time::Duration;

use url::Url;

use crate::{
    classify::classify_response,
    query::{Query, SeriesQuery},
    types::SeriesResponse,
    Error,
};

/// Default per-request timeout.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP client for the Alpha Vantage query API.
///
/// Every endpoint is a GET on `/query`; the endpoint is selected by the
/// `function` parameter. The API key travels as the `apikey` parameter and is
/// never logged.
#[derive(Clone)]
pub struct Client {
    http: reqwest::Client,
    /// Base URL for the API. Defaults to `https://www.alphavantage.co`.
    base_api_url: String,
    api_key: String,
}

impl Client {
    /// Creates a new client pointing at the production API.
    pub fn new(api_key: &str) -> Result<Self, Error> {
        Self::with_base_url("https://www.alphavantage.co", api_key)
    }

    /// Creates a new client with a custom base URL. Used for testing with wiremock.
    pub fn with_base_url(base_url: &str, api_key: &str) -> Result<Self, Error> {
        Ok(Self {
            http: build_http(REQUEST_TIMEOUT)?,
            base_api_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }

    /// Replaces the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self, Error> {
        self.http = build_http(timeout)?;
        Ok(self)
    }

    pub fn base_url(&self) -> &str {
        &self.base_api_url
    }

    fn get_url(&self, query: &impl Query) -> Result<Url, Error> {
        let url = Url::parse(format!("{}/query", &self.base_api_url).as_str()).map_err(|e| {
            tracing::error!("Invalid URL constructed: {}", e);
            Error::RequestFailed(format!("invalid base URL: {}", e))
        })?;
        let mut url = query.add_to_url(&url);
        url.query_pairs_mut().append_pair("apikey", &self.api_key);
        Ok(url)
    }

    /// Fetches one time series payload and extracts its records.
    ///
    /// Records come back in the API's order (most recent first).
    pub async fn get_series(&self, query: &SeriesQuery) -> Result<SeriesResponse, Error> {
        let url = self.get_url(query)?;
        tracing::debug!(
            function = query.function.as_param(),
            symbol = %query.symbol,
            month = query.month.as_deref().unwrap_or("-"),
            "requesting time series"
        );

        let resp = self.http.get(url).send().await.map_err(|e| {
            // The URL carries the API key.
            let e = e.without_url();
            if e.is_timeout() {
                tracing::error!("Request timed out: {}", e);
                Error::RequestFailed("request timed out".to_string())
            } else {
                tracing::error!("Failed to get resource: {}", e);
                Error::RequestFailed(e.to_string())
            }
        })?;

        let status = resp.status();
        let body = resp.text().await.map_err(|e| {
            let e = e.without_url();
            tracing::error!("Failed to read response body: {}", e);
            Error::RequestFailed(format!("failed to read response body: {}", e))
        })?;

        let payload = classify_response(status.as_u16(), &body)
            .map_err(|e| self.redact(e))
            .inspect_err(|e| {
                tracing::warn!(function = query.function.as_param(), symbol = %query.symbol, "{}", e);
            })?;

        SeriesResponse::from_payload(query.function, &payload)
    }
}

impl Client {
    /// Some quota notices echo the caller's key back; strip it before the
    /// message reaches logs or callers.
    fn redact(&self, err: Error) -> Error {
        if self.api_key.is_empty() {
            return err;
        }
        let scrub = |text: String| text.replace(&self.api_key, "<redacted>");
        match err {
            Error::RequestFailed(msg) => Error::RequestFailed(scrub(msg)),
            Error::HttpStatus { status, body } => Error::HttpStatus {
                status,
                body: scrub(body),
            },
            Error::Query(msg) => Error::Query(scrub(msg)),
            Error::QueryLimit(msg) => Error::QueryLimit(scrub(msg)),
        }
    }
}

fn build_http(timeout: Duration) -> Result<reqwest::Client, Error> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| {
            tracing::error!("Failed to build HTTP client: {}", e);
            Error::RequestFailed(format!("failed to build HTTP client: {}", e))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SeriesFunction;

    #[test]
    fn client_creation_with_defaults() {
        let client = Client::new("test-key").unwrap();
        assert_eq!(client.base_url(), "https://www.alphavantage.co");
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let client = Client::with_base_url("http://localhost:1234/", "test-key").unwrap();
        assert_eq!(client.base_url(), "http://localhost:1234");
    }

    #[test]
    fn url_carries_query_and_api_key() {
        let client = Client::with_base_url("http://localhost:1234", "test-key").unwrap();
        let query = SeriesQuery::new(SeriesFunction::Daily, "IBM");
        let url = client.get_url(&query).unwrap();
        assert_eq!(url.path(), "/query");
        assert_eq!(
            url.query(),
            Some("function=TIME_SERIES_DAILY&symbol=IBM&outputsize=full&apikey=test-key")
        );
    }

    #[test]
    fn redact_strips_api_key() {
        let client = Client::with_base_url("http://localhost:1234", "SECRET123").unwrap();
        let err = client.redact(Error::QueryLimit(
            "We have detected your API key as SECRET123 and our standard API rate limit is 25 requests per day.".to_string(),
        ));
        match err {
            Error::QueryLimit(msg) => {
                assert!(!msg.contains("SECRET123"));
                assert!(msg.contains("<redacted>"));
            }
            other => panic!("expected QueryLimit, got {:?}", other),
        }
    }

    #[test]
    fn invalid_base_url_is_request_failure() {
        let client = Client::with_base_url("not a url", "test-key").unwrap();
        let query = SeriesQuery::new(SeriesFunction::Daily, "IBM");
        assert!(matches!(client.get_url(&query), Err(Error::RequestFailed(_))));
    }
}
