//! Chart request validation.
//!
//! Every rule runs independently so the caller sees all problems at once.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::catalog::SymbolCatalog;
use crate::error::StockChartError;
use crate::models::{ChartType, SeriesKind};

/// Longest intraday range, in days between start and end.
pub const MAX_INTRADAY_SPAN_DAYS: i64 = 30;

pub const SYMBOL_REQUIRED: &str = "Symbol is required";
pub const CHART_TYPE_REQUIRED: &str = "Chart Type is required";
pub const SERIES_REQUIRED: &str = "Time Series is required";
pub const DATES_REQUIRED: &str = "Start and End Date are required";
pub const START_DATE_FORMAT: &str = "Start Date must be in the format YYYY-MM-DD";
pub const END_DATE_FORMAT: &str = "End Date must be in the format YYYY-MM-DD";
pub const END_BEFORE_START: &str = "End Date must be >= Start Date";
pub const INTRADAY_TOO_LONG: &str = "Intraday time series cannot exceed 30 days";

/// Raw request inputs, kept verbatim for re-display after a failure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartRequest {
    pub symbol: String,
    pub chart_type: String,
    pub series_kind: String,
    pub start_date: String,
    pub end_date: String,
}

/// The sets request fields are checked against.
#[derive(Debug, Clone, Default)]
pub struct ValidationContext {
    pub known_symbols: BTreeSet<String>,
    pub known_chart_types: BTreeSet<String>,
    pub known_series_kinds: BTreeSet<String>,
}

impl ValidationContext {
    /// Catalog symbols plus every chart type and series kind this crate can serve.
    pub fn from_catalog(catalog: &SymbolCatalog) -> Self {
        Self {
            known_symbols: catalog.symbols().map(str::to_string).collect(),
            known_chart_types: ChartType::ALL.iter().map(|c| c.as_str().to_string()).collect(),
            known_series_kinds: SeriesKind::ALL.iter().map(|k| k.as_str().to_string()).collect(),
        }
    }
}

/// Outcome of validation. Messages are in rule order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    pub errors: Vec<String>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// A request that passed every rule, with typed fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedRequest {
    pub symbol: String,
    pub chart_type: ChartType,
    pub series_kind: SeriesKind,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// Strict `YYYY-MM-DD`: zero-padded, no sign, no surrounding text.
pub fn parse_iso_date(input: &str) -> Option<NaiveDate> {
    let bytes = input.as_bytes();
    if bytes.len() != 10 || bytes[4] != b'-' || bytes[7] != b'-' {
        return None;
    }
    let digits_ok = bytes
        .iter()
        .enumerate()
        .all(|(i, b)| i == 4 || i == 7 || b.is_ascii_digit());
    if !digits_ok {
        return None;
    }
    NaiveDate::parse_from_str(input, "%Y-%m-%d").ok()
}

fn is_known(value: &str, known: &BTreeSet<String>) -> bool {
    !value.is_empty() && known.contains(value)
}

/// Checks `request` against `ctx`. Pure; never short-circuits between rules.
pub fn validate(request: &ChartRequest, ctx: &ValidationContext) -> ValidationReport {
    let mut errors = Vec::new();

    if !is_known(&request.symbol, &ctx.known_symbols) {
        errors.push(SYMBOL_REQUIRED.to_string());
    }
    if !is_known(&request.chart_type, &ctx.known_chart_types) {
        errors.push(CHART_TYPE_REQUIRED.to_string());
    }
    if !is_known(&request.series_kind, &ctx.known_series_kinds) {
        errors.push(SERIES_REQUIRED.to_string());
    }

    if request.start_date.is_empty() || request.end_date.is_empty() {
        errors.push(DATES_REQUIRED.to_string());
        return ValidationReport { errors };
    }

    let start = parse_iso_date(&request.start_date);
    if start.is_none() {
        errors.push(START_DATE_FORMAT.to_string());
    }
    let end = parse_iso_date(&request.end_date);
    if end.is_none() {
        errors.push(END_DATE_FORMAT.to_string());
    }

    if let (Some(start), Some(end)) = (start, end) {
        if end < start {
            errors.push(END_BEFORE_START.to_string());
        }
        if request.series_kind == SeriesKind::Intraday.as_str()
            && (end - start).num_days() > MAX_INTRADAY_SPAN_DAYS
        {
            errors.push(INTRADAY_TOO_LONG.to_string());
        }
    }

    ValidationReport { errors }
}

impl ChartRequest {
    pub fn validate(&self, ctx: &ValidationContext) -> ValidationReport {
        validate(self, ctx)
    }

    /// Validates and converts to typed fields, or returns every violation.
    pub fn into_validated(
        &self,
        ctx: &ValidationContext,
    ) -> Result<ValidatedRequest, StockChartError> {
        let report = validate(self, ctx);
        if !report.is_valid() {
            return Err(StockChartError::Validation(report.errors));
        }

        // A context may list names this crate has no type for.
        let mut errors = Vec::new();
        let chart_type = self.chart_type.parse::<ChartType>().ok();
        if chart_type.is_none() {
            errors.push(CHART_TYPE_REQUIRED.to_string());
        }
        let series_kind = self.series_kind.parse::<SeriesKind>().ok();
        if series_kind.is_none() {
            errors.push(SERIES_REQUIRED.to_string());
        }
        let start = parse_iso_date(&self.start_date);
        let end = parse_iso_date(&self.end_date);

        match (chart_type, series_kind, start, end) {
            (Some(chart_type), Some(series_kind), Some(start), Some(end)) => Ok(ValidatedRequest {
                symbol: self.symbol.clone(),
                chart_type,
                series_kind,
                start,
                end,
            }),
            _ => Err(StockChartError::Validation(errors)),
        }
    }
}
