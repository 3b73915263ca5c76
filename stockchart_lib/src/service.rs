//! Request boundary: validate, fetch, render.

use crate::chart::render_svg;
use crate::error::StockChartError;
use crate::models::TimeSeries;
use crate::timeseries::TimeSeriesClient;
use crate::validation::{ChartRequest, ValidatedRequest, ValidationContext};

/// What a chart request ends in. Failures keep the submitted inputs so they
/// can be shown back alongside the messages.
#[derive(Debug)]
pub enum ChartOutcome {
    Rendered { series: TimeSeries, svg: String },
    Rejected { request: ChartRequest, messages: Vec<String> },
}

impl ChartOutcome {
    pub fn is_rendered(&self) -> bool {
        matches!(self, ChartOutcome::Rendered { .. })
    }
}

pub struct ChartService {
    context: ValidationContext,
    client: TimeSeriesClient,
}

impl ChartService {
    pub fn new(context: ValidationContext, client: TimeSeriesClient) -> Self {
        Self { context, client }
    }

    pub fn context(&self) -> &ValidationContext {
        &self.context
    }

    /// Validates `request` and fetches its series without rendering.
    pub async fn fetch(
        &self,
        request: &ChartRequest,
    ) -> Result<(ValidatedRequest, TimeSeries), StockChartError> {
        let validated = request.into_validated(&self.context)?;
        let series = self
            .client
            .fetch(
                validated.series_kind,
                &validated.symbol,
                validated.start,
                validated.end,
            )
            .await?;
        Ok((validated, series))
    }

    /// Runs the whole pipeline. Never returns a partial chart.
    pub async fn handle_request(&self, request: ChartRequest) -> ChartOutcome {
        let result = match self.fetch(&request).await {
            Ok((validated, series)) => {
                render_svg(&series, validated.chart_type).map(|svg| (series, svg))
            }
            Err(e) => Err(e),
        };

        match result {
            Ok((series, svg)) => ChartOutcome::Rendered { series, svg },
            Err(e) => {
                match &e {
                    StockChartError::Validation(messages) => {
                        tracing::debug!(errors = messages.len(), "chart request failed validation")
                    }
                    other => tracing::warn!(error = %other, symbol = %request.symbol, "chart request failed"),
                }
                ChartOutcome::Rejected {
                    messages: e.user_messages(),
                    request,
                }
            }
        }
    }
}
