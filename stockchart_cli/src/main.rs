mod commands;
mod output;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::output::OutputFormat;

#[derive(Parser)]
#[command(name = "stockchart")]
#[command(about = "Chart historical stock prices from Alpha Vantage")]
struct Cli {
    /// Output format: table, json, csv or markdown
    #[arg(long, default_value = "table", global = true)]
    output: String,

    /// Symbol catalog CSV (Symbol,Name,Sector). Defaults to $STOCKCHART_CATALOG or stocks.csv
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a price chart to an SVG file
    Chart(commands::chart::ChartArgs),
    /// Print the price bars for a request
    Bars(commands::bars::BarsArgs),
    /// List the symbols in the catalog
    Symbols(commands::symbols::SymbolsArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("stockchart=info".parse()?)
                .add_directive("alphavantage_api=warn".parse()?),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let format = match cli.output.as_str() {
        "json" => OutputFormat::Json,
        "csv" => OutputFormat::Csv,
        "markdown" | "md" => OutputFormat::Markdown,
        _ => OutputFormat::Table,
    };

    let catalog = cli.catalog.as_deref();

    match &cli.command {
        Commands::Chart(args) => commands::chart::run(args, catalog).await?,
        Commands::Bars(args) => commands::bars::run(args, catalog, &format).await?,
        Commands::Symbols(args) => commands::symbols::run(args, catalog, &format)?,
    }

    Ok(())
}
