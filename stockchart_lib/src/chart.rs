//! SVG rendering of a [`TimeSeries`] as a line or grouped bar chart.

use plotters::prelude::*;

use crate::error::StockChartError;
use crate::models::{ChartType, StockValue, TimeSeries};

pub const CHART_WIDTH: u32 = 1000;
pub const CHART_HEIGHT: u32 = 600;

/// Most x-axis labels drawn, however many bars there are.
const MAX_X_LABELS: usize = 12;

type Field = fn(&StockValue) -> f64;

fn open(b: &StockValue) -> f64 {
    b.open
}
fn high(b: &StockValue) -> f64 {
    b.high
}
fn low(b: &StockValue) -> f64 {
    b.low
}
fn close(b: &StockValue) -> f64 {
    b.close
}

const SERIES: [(&str, Field, RGBColor); 4] = [
    ("Open", open, RGBColor(31, 119, 180)),
    ("High", high, RGBColor(44, 160, 44)),
    ("Low", low, RGBColor(214, 39, 40)),
    ("Close", close, RGBColor(148, 103, 189)),
];

pub fn chart_title(series: &TimeSeries) -> String {
    format!(
        "Stock Data for {}: {} to {}",
        series.symbol(),
        series.start_date(),
        series.end_date()
    )
}

/// Renders `series` as an SVG document.
pub fn render_svg(series: &TimeSeries, chart_type: ChartType) -> Result<String, StockChartError> {
    if series.is_empty() {
        return Err(StockChartError::Chart(format!(
            "no price data for {} between {} and {}",
            series.symbol(),
            series.start_date(),
            series.end_date()
        )));
    }

    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, (CHART_WIDTH, CHART_HEIGHT)).into_drawing_area();
        draw(&root, series, chart_type)?;
        root.present().map_err(chart_error("render chart"))?;
    }
    tracing::debug!(
        symbol = series.symbol(),
        chart = %chart_type,
        bars = series.len(),
        bytes = svg.len(),
        "rendered chart"
    );
    Ok(svg)
}

fn chart_error<E: std::fmt::Display>(step: &'static str) -> impl Fn(E) -> StockChartError {
    move |e| StockChartError::Chart(format!("failed to {}: {}", step, e))
}

fn value_range(bars: &[StockValue]) -> (f64, f64) {
    let values = bars
        .iter()
        .flat_map(|b| SERIES.iter().map(move |(_, field, _)| field(b)));
    let (min, max) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    let padding = ((max - min) * 0.05).max(1e-6);
    ((min - padding).max(0.0), max + padding)
}

fn draw(
    root: &DrawingArea<SVGBackend<'_>, plotters::coord::Shift>,
    series: &TimeSeries,
    chart_type: ChartType,
) -> Result<(), StockChartError> {
    let bars = series.bars();
    let count = bars.len();
    let (y_min, y_max) = value_range(bars);

    root.fill(&WHITE).map_err(chart_error("fill canvas"))?;

    let mut chart = ChartBuilder::on(root)
        .caption(chart_title(series), ("sans-serif", 24.0).into_font())
        .margin(15)
        .x_label_area_size(60)
        .y_label_area_size(70)
        .build_cartesian_2d(-0.5f64..(count as f64 - 0.5), y_min..y_max)
        .map_err(chart_error("build chart"))?;

    let label_for = |x: &f64| -> String {
        let idx = x.round();
        if idx < 0.0 || (idx as usize) >= count || (x - idx).abs() > 1e-6 {
            return String::new();
        }
        bars[idx as usize].date.clone()
    };

    chart
        .configure_mesh()
        .x_labels(count.min(MAX_X_LABELS))
        .x_label_formatter(&label_for)
        .y_desc("Price")
        .draw()
        .map_err(chart_error("draw axes"))?;

    match chart_type {
        ChartType::Line => {
            for (name, field, color) in SERIES {
                chart
                    .draw_series(LineSeries::new(
                        bars.iter().enumerate().map(|(i, b)| (i as f64, field(b))),
                        color.stroke_width(2),
                    ))
                    .map_err(chart_error("draw line series"))?
                    .label(name)
                    .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2)));
            }
        }
        ChartType::Bar => {
            let group_width = 0.8;
            let slot = group_width / SERIES.len() as f64;
            for (k, (name, field, color)) in SERIES.into_iter().enumerate() {
                let offset = -group_width / 2.0 + k as f64 * slot;
                chart
                    .draw_series(bars.iter().enumerate().map(|(i, b)| {
                        let left = i as f64 + offset;
                        Rectangle::new([(left, y_min), (left + slot, field(b))], color.filled())
                    }))
                    .map_err(chart_error("draw bar series"))?
                    .label(name)
                    .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], color.filled()));
            }
        }
    }

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()
        .map_err(chart_error("draw legend"))?;

    Ok(())
}
