//! Static symbol catalog loaded from a `Symbol,Name,Sector` CSV file.

use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::StockChartError;

/// A tradable instrument from the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stock {
    #[serde(rename = "Symbol")]
    pub symbol: String,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Sector")]
    pub sector: String,
}

/// Known-valid symbols, keyed and iterated in symbol order.
#[derive(Debug, Clone, Default)]
pub struct SymbolCatalog {
    stocks: BTreeMap<String, Stock>,
}

impl SymbolCatalog {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, StockChartError> {
        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(|e| {
            StockChartError::Load(format!("cannot open {}: {}", path.display(), e))
        })?;
        let catalog = Self::from_reader(file)?;
        tracing::debug!(path = %path.display(), symbols = catalog.len(), "loaded symbol catalog");
        Ok(catalog)
    }

    /// Parses catalog CSV. Rows with a blank symbol are skipped; a later
    /// duplicate symbol replaces the earlier row.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, StockChartError> {
        let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
        let mut stocks = BTreeMap::new();
        for row in rdr.deserialize::<Stock>() {
            let stock = row?;
            if stock.symbol.is_empty() {
                continue;
            }
            stocks.insert(stock.symbol.clone(), stock);
        }
        Ok(Self { stocks })
    }

    pub fn from_stocks(stocks: impl IntoIterator<Item = Stock>) -> Self {
        Self {
            stocks: stocks
                .into_iter()
                .map(|stock| (stock.symbol.clone(), stock))
                .collect(),
        }
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.stocks.contains_key(symbol)
    }

    pub fn get(&self, symbol: &str) -> Option<&Stock> {
        self.stocks.get(symbol)
    }

    pub fn symbols(&self) -> impl Iterator<Item = &str> {
        self.stocks.keys().map(String::as_str)
    }

    pub fn stocks(&self) -> impl Iterator<Item = &Stock> {
        self.stocks.values()
    }

    /// Stocks in `sector`, compared case-insensitively.
    pub fn in_sector<'a>(&'a self, sector: &'a str) -> impl Iterator<Item = &'a Stock> + 'a {
        self.stocks
            .values()
            .filter(move |stock| stock.sector.eq_ignore_ascii_case(sector))
    }

    pub fn len(&self) -> usize {
        self.stocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stocks.is_empty()
    }
}
