use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::function::{FieldKeys, SeriesFunction};
use crate::Error;

/// One OHLCV record as the API returned it, keyed by its original timestamp string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawBar {
    /// `YYYY-MM-DD` for daily and coarser series, `YYYY-MM-DD HH:MM:SS` for intraday.
    pub timestamp: String,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

/// A successfully classified series payload.
///
/// `bars` keep the API's document order, which is most-recent-first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesResponse {
    pub function: SeriesFunction,
    /// Symbol echoed back in the `Meta Data` block, when present.
    pub symbol: Option<String>,
    pub bars: Vec<RawBar>,
}

impl SeriesResponse {
    /// Extracts the date-keyed records for `function` from a classified payload.
    ///
    /// Any record with a missing or non-numeric field fails the whole payload;
    /// no partial list is returned.
    pub fn from_payload(function: SeriesFunction, payload: &Map<String, Value>) -> Result<Self, Error> {
        let key = function.series_key();
        let series = payload
            .get(key)
            .and_then(Value::as_object)
            .ok_or_else(|| Error::Query(format!("unexpected response shape: missing '{}'", key)))?;

        let fields = function.field_keys();
        let bars = series
            .iter()
            .map(|(timestamp, record)| parse_record(timestamp, record, fields))
            .collect::<Result<Vec<_>, _>>()?;

        let symbol = payload
            .get("Meta Data")
            .and_then(|meta| meta.get("2. Symbol"))
            .and_then(Value::as_str)
            .map(str::to_string);

        Ok(Self {
            function,
            symbol,
            bars,
        })
    }
}

fn parse_record(timestamp: &str, record: &Value, fields: &FieldKeys) -> Result<RawBar, Error> {
    let record = record.as_object().ok_or_else(|| {
        Error::Query(format!("unexpected response shape: record {} is not an object", timestamp))
    })?;

    Ok(RawBar {
        timestamp: timestamp.to_string(),
        open: price_field(record, fields.open, timestamp)?,
        high: price_field(record, fields.high, timestamp)?,
        low: price_field(record, fields.low, timestamp)?,
        close: price_field(record, fields.close, timestamp)?,
        volume: volume_field(record, fields.volume, timestamp)?,
    })
}

fn field<'a>(record: &'a Map<String, Value>, key: &str, timestamp: &str) -> Result<&'a Value, Error> {
    record
        .get(key)
        .ok_or_else(|| Error::Query(format!("record {} is missing field '{}'", timestamp, key)))
}

fn price_field(record: &Map<String, Value>, key: &str, timestamp: &str) -> Result<f64, Error> {
    let value = field(record, key, timestamp)?;
    let parsed = match value {
        Value::String(s) => s.trim().parse::<f64>().ok(),
        Value::Number(n) => n.as_f64(),
        _ => None,
    };
    parsed
        .filter(|v| v.is_finite())
        .ok_or_else(|| Error::Query(format!("record {} has non-numeric field '{}'", timestamp, key)))
}

fn volume_field(record: &Map<String, Value>, key: &str, timestamp: &str) -> Result<u64, Error> {
    let value = field(record, key, timestamp)?;
    let parsed = match value {
        Value::String(s) => s.trim().parse::<u64>().ok(),
        Value::Number(n) => n.as_u64(),
        _ => None,
    };
    parsed.ok_or_else(|| {
        Error::Query(format!(
            "record {} has invalid volume in field '{}'",
            timestamp, key
        ))
    })
}
