//! Library layer for stockchart: symbol catalog, request validation,
//! time-series assembly and chart rendering.
//!
//! Wraps the `alphavantage_api` crate with month pagination for intraday
//! series, chronological normalization and a typed error taxonomy.

pub mod catalog;
pub mod chart;
pub mod chunking;
pub mod config;
pub mod error;
pub mod models;
pub mod service;
pub mod timeseries;
pub mod validation;

pub use alphavantage_api;

pub use catalog::{Stock, SymbolCatalog};
pub use chart::render_svg;
pub use config::Settings;
pub use error::StockChartError;
pub use models::{ChartType, SeriesKind, StockValue, TimeSeries};
pub use service::{ChartOutcome, ChartService};
pub use timeseries::{FetchOptions, TimeSeriesClient};
pub use validation::{validate, ChartRequest, ValidatedRequest, ValidationContext, ValidationReport};
