//! Symbol universe: the tickers the datafeed is able to serve.

use polars::prelude::*;
use std::collections::BTreeSet;

use super::schema::TableSchema;
use super::source::DataError;

/// Immutable set of supported ticker symbols.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SymbolUniverse {
    symbols: BTreeSet<String>,
}

impl SymbolUniverse {
    /// Build the universe from the `symbol` column of a table.
    pub fn from_frame(df: &DataFrame) -> Result<Self, DataError> {
        TableSchema::universe().validate(df)?;

        let column = df
            .column("symbol")
            .and_then(|c| c.cast(&DataType::String))
            .map_err(|e| DataError::Frame(format!("symbol: {e}")))?;
        let ca = column
            .str()
            .map_err(|e| DataError::Frame(format!("symbol column type: {e}")))?;

        let symbols = (0..ca.len())
            .filter_map(|i| ca.get(i))
            .map(str::to_string)
            .collect();

        Ok(Self { symbols })
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.symbols.contains(symbol)
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Symbols in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.symbols.iter().map(|s| s.as_str())
    }
}

impl<S: Into<String>> FromIterator<S> for SymbolUniverse {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            symbols: iter.into_iter().map(Into::into).collect(),
        }
    }
}
