use anyhow::Result;
use serde::Serialize;
use stockchart_lib::{Stock, StockValue};
use tabled::settings::Style;
use tabled::{Table, Tabled};

#[derive(Clone, Debug)]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
    Markdown,
}

#[derive(Tabled, Serialize)]
struct BarRow {
    #[tabled(rename = "Date")]
    #[serde(rename = "Date")]
    date: String,
    #[tabled(rename = "Open")]
    #[serde(rename = "Open")]
    open: String,
    #[tabled(rename = "High")]
    #[serde(rename = "High")]
    high: String,
    #[tabled(rename = "Low")]
    #[serde(rename = "Low")]
    low: String,
    #[tabled(rename = "Close")]
    #[serde(rename = "Close")]
    close: String,
    #[tabled(rename = "Volume")]
    #[serde(rename = "Volume")]
    volume: String,
}

#[derive(Serialize)]
struct BarCsvRow<'a> {
    #[serde(rename = "Date")]
    date: &'a str,
    #[serde(rename = "Open")]
    open: f64,
    #[serde(rename = "High")]
    high: f64,
    #[serde(rename = "Low")]
    low: f64,
    #[serde(rename = "Close")]
    close: f64,
    #[serde(rename = "Volume")]
    volume: u64,
}

#[derive(Tabled, Serialize)]
struct StockRow {
    #[tabled(rename = "Symbol")]
    #[serde(rename = "Symbol")]
    symbol: String,
    #[tabled(rename = "Name")]
    #[serde(rename = "Name")]
    name: String,
    #[tabled(rename = "Sector")]
    #[serde(rename = "Sector")]
    sector: String,
}

// -- Row builders --

fn build_bar_rows(bars: &[StockValue]) -> Vec<BarRow> {
    bars.iter()
        .map(|b| BarRow {
            date: b.date.clone(),
            open: format_price(b.open),
            high: format_price(b.high),
            low: format_price(b.low),
            close: format_price(b.close),
            volume: format_volume(b.volume),
        })
        .collect()
}

fn build_stock_rows(stocks: &[Stock]) -> Vec<StockRow> {
    stocks
        .iter()
        .map(|s| StockRow {
            symbol: s.symbol.clone(),
            name: s.name.clone(),
            sector: s.sector.clone(),
        })
        .collect()
}

// -- Table output --

pub fn print_bars_table(bars: &[StockValue]) {
    println!("{}", Table::new(build_bar_rows(bars)));
}

pub fn print_stocks_table(stocks: &[Stock]) {
    println!("{}", Table::new(build_stock_rows(stocks)));
}

// -- Markdown output --

pub fn print_bars_markdown(bars: &[StockValue]) {
    let mut table = Table::new(build_bar_rows(bars));
    table.with(Style::markdown());
    println!("{}", table);
}

pub fn print_stocks_markdown(stocks: &[Stock]) {
    let mut table = Table::new(build_stock_rows(stocks));
    table.with(Style::markdown());
    println!("{}", table);
}

// -- CSV output --

pub fn print_bars_csv(bars: &[StockValue]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(std::io::stdout());
    for b in bars {
        // Unformatted numbers so the file loads cleanly into other tools.
        wtr.serialize(BarCsvRow {
            date: &b.date,
            open: b.open,
            high: b.high,
            low: b.low,
            close: b.close,
            volume: b.volume,
        })?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn print_stocks_csv(stocks: &[Stock]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(std::io::stdout());
    for row in build_stock_rows(stocks) {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

// -- JSON output --

pub fn print_json<T: serde::Serialize>(data: &T) {
    match serde_json::to_string_pretty(data) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Failed to serialize to JSON: {}", e),
    }
}

fn format_price(value: f64) -> String {
    format!("{:.2}", value)
}

/// Thousands-separated volume, e.g. `70,790,813`.
fn format_volume(volume: u64) -> String {
    let digits = volume.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use stockchart_lib::alphavantage_api::classify_response;
    use stockchart_lib::alphavantage_api::types::{SeriesFunction, SeriesResponse};
    use stockchart_lib::timeseries::normalize;

    fn load_daily_fixture() -> Vec<StockValue> {
        let json_str = include_str!("../../alphavantage_api/tests/fixtures/daily.json");
        let payload = classify_response(200, json_str).unwrap();
        let resp = SeriesResponse::from_payload(SeriesFunction::Daily, &payload).unwrap();
        let bars = resp
            .bars
            .into_iter()
            .map(|raw| StockValue::from_raw("AAPL", raw).unwrap())
            .collect();
        normalize(vec![bars])
    }

    fn stocks() -> Vec<Stock> {
        vec![
            Stock {
                symbol: "AAPL".to_string(),
                name: "Apple Inc.".to_string(),
                sector: "Information Technology".to_string(),
            },
            Stock {
                symbol: "XOM".to_string(),
                name: "Exxon Mobil Corp.".to_string(),
                sector: "Energy".to_string(),
            },
        ]
    }

    // -- formatter tests --

    #[test]
    fn test_format_volume_groups_thousands() {
        assert_eq!(format_volume(70_790_813), "70,790,813");
        assert_eq!(format_volume(1_000), "1,000");
        assert_eq!(format_volume(999), "999");
        assert_eq!(format_volume(0), "0");
    }

    #[test]
    fn test_format_price_two_decimals() {
        assert_eq!(format_price(130.15), "130.15");
        assert_eq!(format_price(7.0), "7.00");
    }

    // -- Row builder tests --

    #[test]
    fn test_build_bar_rows_mapping() {
        let bars = load_daily_fixture();
        let rows = build_bar_rows(&bars);
        assert_eq!(rows.len(), 5);

        let first = &rows[0];
        assert_eq!(first.date, "2023-01-03");

        let last = &rows[4];
        assert_eq!(last.date, "2023-01-09");
        assert_eq!(last.high, "133.41");
        assert_eq!(last.close, "130.15");
        assert_eq!(last.volume, "70,790,813");
    }

    #[test]
    fn test_build_stock_rows_mapping() {
        let rows = build_stock_rows(&stocks());
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].symbol, "XOM");
        assert_eq!(rows[1].sector, "Energy");
    }

    // -- Rendering tests --

    #[test]
    fn test_bars_table_has_headers() {
        let table = Table::new(build_bar_rows(&load_daily_fixture())).to_string();
        for header in ["Date", "Open", "High", "Low", "Close", "Volume"] {
            assert!(table.contains(header), "missing {}", header);
        }
        assert!(table.contains("2023-01-09"));
    }

    #[test]
    fn test_stocks_markdown_style() {
        let mut table = Table::new(build_stock_rows(&stocks()));
        table.with(Style::markdown());
        let rendered = table.to_string();
        assert!(rendered.starts_with("| Symbol"));
        assert!(rendered.contains("|---"));
        assert!(rendered.contains("| AAPL"));
    }

    #[test]
    fn test_stock_rows_serialize_with_catalog_headers() {
        let mut wtr = csv::Writer::from_writer(vec![]);
        for row in build_stock_rows(&stocks()) {
            wtr.serialize(row).unwrap();
        }
        let out = String::from_utf8(wtr.into_inner().unwrap()).unwrap();
        assert!(out.starts_with("Symbol,Name,Sector\n"));
        assert!(out.contains("AAPL,Apple Inc.,Information Technology"));
    }
}
