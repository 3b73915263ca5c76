//! Integration tests for the fetch pipeline and chart service with wiremock.

use std::time::Duration;

use chrono::NaiveDate;
use stockchart_lib::alphavantage_api::Client;
use stockchart_lib::{
    ChartOutcome, ChartRequest, ChartService, FetchOptions, SeriesKind, Stock, StockChartError,
    SymbolCatalog, TimeSeriesClient, ValidationContext,
};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const DAILY: &str = include_str!("../../alphavantage_api/tests/fixtures/daily.json");
const WEEKLY: &str = include_str!("../../alphavantage_api/tests/fixtures/weekly.json");
const INTRADAY_JAN: &str = include_str!("../../alphavantage_api/tests/fixtures/intraday_2024_01.json");
const INTRADAY_FEB: &str = include_str!("../../alphavantage_api/tests/fixtures/intraday_2024_02.json");
const RATE_LIMIT: &str = include_str!("../../alphavantage_api/tests/fixtures/rate_limit.json");
const ERROR: &str = include_str!("../../alphavantage_api/tests/fixtures/error.json");

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn client_for(server: &MockServer) -> TimeSeriesClient {
    TimeSeriesClient::new(Client::with_base_url(&server.uri(), "test-key").unwrap())
}

fn service_for(server: &MockServer) -> ChartService {
    let catalog = SymbolCatalog::from_stocks(
        [("AAPL", "Apple Inc."), ("IBM", "International Business Machines"), ("MSFT", "Microsoft Corp.")]
            .into_iter()
            .map(|(symbol, name)| Stock {
                symbol: symbol.to_string(),
                name: name.to_string(),
                sector: "Information Technology".to_string(),
            }),
    );
    ChartService::new(ValidationContext::from_catalog(&catalog), client_for(server))
}

fn request(symbol: &str, chart: &str, series: &str, start: &str, end: &str) -> ChartRequest {
    ChartRequest {
        symbol: symbol.to_string(),
        chart_type: chart.to_string(),
        series_kind: series.to_string(),
        start_date: start.to_string(),
        end_date: end.to_string(),
    }
}

async fn mount_month(server: &MockServer, month: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path("/query"))
        .and(query_param("function", "TIME_SERIES_INTRADAY"))
        .and(query_param("symbol", "IBM"))
        .and(query_param("interval", "60min"))
        .and(query_param("month", month))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn daily_fetch_makes_one_call_and_ascends() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/query"))
        .and(query_param("function", "TIME_SERIES_DAILY"))
        .and(query_param("symbol", "AAPL"))
        .and(query_param("outputsize", "full"))
        .respond_with(ResponseTemplate::new(200).set_body_string(DAILY))
        .expect(1)
        .mount(&server)
        .await;

    let series = client_for(&server)
        .fetch(SeriesKind::Daily, "AAPL", day(2023, 1, 1), day(2023, 1, 31))
        .await
        .unwrap();

    assert_eq!(series.symbol(), "AAPL");
    assert_eq!(series.series_kind(), SeriesKind::Daily);
    let dates: Vec<&str> = series.bars().iter().map(|b| b.date.as_str()).collect();
    assert_eq!(
        dates,
        vec!["2023-01-03", "2023-01-04", "2023-01-05", "2023-01-06", "2023-01-09"]
    );
    assert!(series.bars().iter().all(|b| b.symbol == "AAPL"));
}

#[tokio::test]
async fn weekly_fetch_makes_one_call() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/query"))
        .and(query_param("function", "TIME_SERIES_WEEKLY"))
        .respond_with(ResponseTemplate::new(200).set_body_string(WEEKLY))
        .expect(1)
        .mount(&server)
        .await;

    let series = client_for(&server)
        .fetch(SeriesKind::Weekly, "MSFT", day(2022, 12, 1), day(2023, 1, 31))
        .await
        .unwrap();
    assert_eq!(series.len(), 3);
    assert_eq!(series.bars()[0].date, "2023-01-06");
    assert!(series.bars().windows(2).all(|w| w[0].timestamp < w[1].timestamp));
}

#[tokio::test]
async fn intraday_fetch_calls_each_month_once() {
    let server = MockServer::start().await;
    mount_month(&server, "2024-01", INTRADAY_JAN).await;
    mount_month(&server, "2024-02", INTRADAY_FEB).await;

    let series = client_for(&server)
        .fetch(SeriesKind::Intraday, "IBM", day(2024, 1, 15), day(2024, 2, 10))
        .await
        .unwrap();

    let dates: Vec<&str> = series.bars().iter().map(|b| b.date.as_str()).collect();
    assert_eq!(
        dates,
        vec![
            "2024-01-30 10:00:00",
            "2024-01-31 18:00:00",
            "2024-01-31 19:00:00",
            "2024-02-01 09:00:00",
            "2024-02-02 11:00:00",
        ]
    );
}

#[tokio::test]
async fn intraday_order_does_not_depend_on_concurrency() {
    let server = MockServer::start().await;
    mount_month(&server, "2024-01", INTRADAY_JAN).await;
    mount_month(&server, "2024-02", INTRADAY_FEB).await;

    let sequential = client_for(&server)
        .with_options(FetchOptions {
            intraday_concurrency: 1,
            clip_to_range: false,
        })
        .fetch(SeriesKind::Intraday, "IBM", day(2024, 1, 15), day(2024, 2, 10))
        .await
        .unwrap();

    assert_eq!(sequential.len(), 5);
    assert_eq!(sequential.bars()[0].date, "2024-01-30 10:00:00");
    assert_eq!(sequential.bars()[4].date, "2024-02-02 11:00:00");
}

#[tokio::test]
async fn intraday_months_finishing_out_of_order_stay_ascending() {
    let server = MockServer::start().await;
    // January answers last so February's result lands first.
    Mock::given(method("GET"))
        .and(path("/query"))
        .and(query_param("function", "TIME_SERIES_INTRADAY"))
        .and(query_param("month", "2024-01"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(INTRADAY_JAN)
                .set_delay(Duration::from_millis(300)),
        )
        .expect(1)
        .mount(&server)
        .await;
    mount_month(&server, "2024-02", INTRADAY_FEB).await;

    let parallel = client_for(&server)
        .with_options(FetchOptions {
            intraday_concurrency: 2,
            clip_to_range: false,
        })
        .fetch(SeriesKind::Intraday, "IBM", day(2024, 1, 15), day(2024, 2, 10))
        .await
        .unwrap();

    let dates: Vec<&str> = parallel.bars().iter().map(|b| b.date.as_str()).collect();
    assert_eq!(
        dates,
        vec![
            "2024-01-30 10:00:00",
            "2024-01-31 18:00:00",
            "2024-01-31 19:00:00",
            "2024-02-01 09:00:00",
            "2024-02-02 11:00:00",
        ]
    );
    assert!(parallel
        .bars()
        .windows(2)
        .all(|pair| pair[0].timestamp < pair[1].timestamp));
}

#[tokio::test]
async fn intraday_month_hitting_limit_fails_whole_fetch() {
    let server = MockServer::start().await;
    mount_month(&server, "2024-01", INTRADAY_JAN).await;
    mount_month(&server, "2024-02", RATE_LIMIT).await;

    let err = client_for(&server)
        .fetch(SeriesKind::Intraday, "IBM", day(2024, 1, 15), day(2024, 2, 10))
        .await
        .unwrap_err();
    assert!(matches!(err, StockChartError::QueryLimit(_)), "got {:?}", err);
}

#[tokio::test]
async fn clip_to_range_drops_outside_bars() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/query"))
        .respond_with(ResponseTemplate::new(200).set_body_string(DAILY))
        .mount(&server)
        .await;

    let series = client_for(&server)
        .with_options(FetchOptions {
            clip_to_range: true,
            ..FetchOptions::default()
        })
        .fetch(SeriesKind::Daily, "AAPL", day(2023, 1, 4), day(2023, 1, 6))
        .await
        .unwrap();
    let dates: Vec<&str> = series.bars().iter().map(|b| b.date.as_str()).collect();
    assert_eq!(dates, vec!["2023-01-04", "2023-01-05", "2023-01-06"]);
}

#[tokio::test]
async fn unfiltered_fetch_keeps_full_history() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/query"))
        .respond_with(ResponseTemplate::new(200).set_body_string(DAILY))
        .mount(&server)
        .await;

    let series = client_for(&server)
        .fetch(SeriesKind::Daily, "AAPL", day(2023, 1, 4), day(2023, 1, 6))
        .await
        .unwrap();
    assert_eq!(series.len(), 5);
}

#[tokio::test]
async fn service_renders_valid_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/query"))
        .and(query_param("function", "TIME_SERIES_DAILY"))
        .respond_with(ResponseTemplate::new(200).set_body_string(DAILY))
        .expect(1)
        .mount(&server)
        .await;

    let outcome = service_for(&server)
        .handle_request(request("AAPL", "Line", "Daily", "2023-01-01", "2023-01-31"))
        .await;

    match outcome {
        ChartOutcome::Rendered { series, svg } => {
            assert_eq!(series.len(), 5);
            assert!(svg.contains("Stock Data for AAPL: 2023-01-01 to 2023-01-31"));
        }
        ChartOutcome::Rejected { messages, .. } => panic!("rejected: {:?}", messages),
    }
}

#[tokio::test]
async fn service_rejects_invalid_request_without_calling_upstream() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string(DAILY))
        .expect(0)
        .mount(&server)
        .await;

    let submitted = request("AAPL", "Line", "Daily", "01-01-2023", "2023-01-31");
    let outcome = service_for(&server).handle_request(submitted.clone()).await;

    match outcome {
        ChartOutcome::Rejected { request, messages } => {
            assert_eq!(request, submitted);
            assert_eq!(messages, vec!["Start Date must be in the format YYYY-MM-DD"]);
        }
        ChartOutcome::Rendered { .. } => panic!("expected rejection"),
    }
}

#[tokio::test]
async fn service_reports_call_limit() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/query"))
        .respond_with(ResponseTemplate::new(200).set_body_string(RATE_LIMIT))
        .mount(&server)
        .await;

    let outcome = service_for(&server)
        .handle_request(request("AAPL", "Bar", "Monthly", "2020-01-01", "2023-01-31"))
        .await;

    match outcome {
        ChartOutcome::Rejected { messages, .. } => {
            assert_eq!(messages.len(), 1);
            assert!(messages[0].contains("upgrade your API key"));
        }
        ChartOutcome::Rendered { .. } => panic!("expected rejection"),
    }
}

#[tokio::test]
async fn service_reports_upstream_error_payload() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/query"))
        .respond_with(ResponseTemplate::new(200).set_body_string(ERROR))
        .mount(&server)
        .await;

    let outcome = service_for(&server)
        .handle_request(request("IBM", "Line", "Weekly", "2023-01-01", "2023-01-31"))
        .await;
    assert!(!outcome.is_rendered());
}

#[tokio::test]
async fn service_reports_endpoint_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/query"))
        .respond_with(ResponseTemplate::new(503).set_body_string("Service Unavailable"))
        .mount(&server)
        .await;

    let outcome = service_for(&server)
        .handle_request(request("IBM", "Line", "Daily", "2023-01-01", "2023-01-31"))
        .await;

    match outcome {
        ChartOutcome::Rejected { messages, .. } => {
            assert!(messages[0].contains("unavailable"), "{:?}", messages);
            assert!(messages[0].contains("503"));
        }
        ChartOutcome::Rendered { .. } => panic!("expected rejection"),
    }
}
