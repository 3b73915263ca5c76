use std::path::Path;

use anyhow::{bail, Result};
use clap::Args;

use super::{build_service, report_rejection, SeriesArgs};
use crate::output::{print_bars_csv, print_bars_markdown, print_bars_table, print_json, OutputFormat};

#[derive(Args)]
pub struct BarsArgs {
    #[command(flatten)]
    pub series: SeriesArgs,
}

pub async fn run(args: &BarsArgs, catalog: Option<&Path>, format: &OutputFormat) -> Result<()> {
    let service = build_service(catalog, args.series.clip_to_range)?;
    let request = args.series.to_request();
    let series = match service.fetch(&request).await {
        Ok((_, series)) => series,
        Err(e) => {
            report_rejection(&request, &e.user_messages());
            bail!("bars request rejected");
        }
    };

    tracing::debug!(symbol = series.symbol(), bars = series.len(), "fetched bars");
    match format {
        OutputFormat::Table => print_bars_table(series.bars()),
        OutputFormat::Json => print_json(&series),
        OutputFormat::Csv => print_bars_csv(series.bars())?,
        OutputFormat::Markdown => print_bars_markdown(series.bars()),
    }
    Ok(())
}
