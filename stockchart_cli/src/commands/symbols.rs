use std::path::Path;

use anyhow::Result;
use clap::Args;
use stockchart_lib::config::catalog_path_from_env;
use stockchart_lib::Stock;

use super::{load_catalog, resolve_catalog};
use crate::output::{
    print_json, print_stocks_csv, print_stocks_markdown, print_stocks_table, OutputFormat,
};

#[derive(Args)]
pub struct SymbolsArgs {
    /// Only list stocks in this sector (case-insensitive)
    #[arg(long)]
    pub sector: Option<String>,
}

pub fn run(args: &SymbolsArgs, catalog: Option<&Path>, format: &OutputFormat) -> Result<()> {
    let path = resolve_catalog(catalog, &catalog_path_from_env());
    let catalog = load_catalog(&path)?;
    let stocks: Vec<Stock> = match &args.sector {
        Some(sector) => catalog.in_sector(sector).cloned().collect(),
        None => catalog.stocks().cloned().collect(),
    };

    match format {
        OutputFormat::Table => print_stocks_table(&stocks),
        OutputFormat::Json => print_json(&stocks),
        OutputFormat::Csv => print_stocks_csv(&stocks)?,
        OutputFormat::Markdown => print_stocks_markdown(&stocks),
    }
    Ok(())
}
