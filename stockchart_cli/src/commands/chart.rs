use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Args;
use stockchart_lib::ChartOutcome;

use super::{build_service, report_rejection, SeriesArgs};

#[derive(Args)]
pub struct ChartArgs {
    #[command(flatten)]
    pub series: SeriesArgs,

    /// Where to write the SVG
    #[arg(long, default_value = "chart.svg")]
    pub out: PathBuf,
}

pub async fn run(args: &ChartArgs, catalog: Option<&Path>) -> Result<()> {
    let service = build_service(catalog, args.series.clip_to_range)?;
    match service.handle_request(args.series.to_request()).await {
        ChartOutcome::Rendered { series, svg } => {
            std::fs::write(&args.out, svg)
                .with_context(|| format!("failed to write {}", args.out.display()))?;
            tracing::info!(
                symbol = series.symbol(),
                series = %series.series_kind(),
                bars = series.len(),
                path = %args.out.display(),
                "wrote chart"
            );
            Ok(())
        }
        ChartOutcome::Rejected { request, messages } => {
            report_rejection(&request, &messages);
            bail!("chart request rejected");
        }
    }
}
