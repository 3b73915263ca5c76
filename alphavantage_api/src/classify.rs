//! Classification of raw API responses.
//!
//! The API reports bad parameters and exhausted quotas with HTTP 200 bodies.
//! Structured top-level keys are checked first. Marker strings are the last
//! resort, for bodies that carry no series data.

use serde_json::{Map, Value};

use crate::types::SeriesFunction;
use crate::Error;

/// Top-level key of an upstream error payload.
const ERROR_KEY: &str = "Error Message";

/// Top-level keys used for informational notices, including quota notices.
const NOTICE_KEYS: [&str; 2] = ["Note", "Information"];

/// Lowercased phrases that identify a quota, rate-limit or demo-key notice.
const QUOTA_MARKERS: [&str; 4] = [
    "thank you for using",
    "**demo**",
    "rate limit",
    "call frequency",
];

const MAX_BODY_SNIPPET: usize = 2000;

/// Classifies one raw response.
///
/// Returns the JSON object payload when the response may contain series data.
/// Checks run in order: HTTP status, error payload, quota notice.
pub fn classify_response(status: u16, body: &str) -> Result<Map<String, Value>, Error> {
    if !(200..300).contains(&status) {
        return Err(Error::HttpStatus {
            status,
            body: truncate_body(body),
        });
    }

    match serde_json::from_str::<Value>(body) {
        Ok(Value::Object(payload)) => classify_payload(payload, body),
        Ok(_) => Err(Error::Query(format!(
            "unexpected response shape: {}",
            truncate_body(body)
        ))),
        Err(_) => classify_text(body),
    }
}

fn classify_payload(payload: Map<String, Value>, body: &str) -> Result<Map<String, Value>, Error> {
    if payload.contains_key(ERROR_KEY) {
        return Err(Error::Query(truncate_body(body)));
    }

    for key in NOTICE_KEYS {
        if let Some(notice) = payload.get(key).and_then(Value::as_str) {
            if is_quota_notice(notice) {
                return Err(Error::QueryLimit(notice.to_string()));
            }
        }
    }

    let has_series = SeriesFunction::ALL
        .iter()
        .any(|function| payload.contains_key(function.series_key()));
    if !has_series && is_quota_notice(body) {
        return Err(Error::QueryLimit(truncate_body(body)));
    }

    Ok(payload)
}

fn classify_text(body: &str) -> Result<Map<String, Value>, Error> {
    if body.contains(ERROR_KEY) {
        return Err(Error::Query(truncate_body(body)));
    }
    if is_quota_notice(body) {
        return Err(Error::QueryLimit(truncate_body(body)));
    }
    Err(Error::Query(format!(
        "malformed response body: {}",
        truncate_body(body)
    )))
}

fn is_quota_notice(text: &str) -> bool {
    let lower = text.to_lowercase();
    QUOTA_MARKERS.iter().any(|marker| lower.contains(marker))
}

pub(crate) fn truncate_body(body: &str) -> String {
    if body.len() <= MAX_BODY_SNIPPET {
        return body.to_string();
    }
    let mut end = MAX_BODY_SNIPPET;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...[truncated]", &body[..end])
}
