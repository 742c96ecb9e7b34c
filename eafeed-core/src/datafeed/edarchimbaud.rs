//! Datafeed backed by the edarchimbaud stock datasets on the Hugging Face hub.

use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{NaiveDateTime, TimeDelta};
use thiserror::Error;
use tracing::{debug, info, warn};

use super::output::Output;
use super::{Datafeed, Granularity};
use crate::adjust::build_bar;
use crate::data::{select_rows, DataError, DatasetSource, SymbolUniverse};
use crate::domain::{BarData, Exchange, HistoryRequest};
use crate::settings::{DatafeedSettings, FetchFailurePolicy};

/// Exchanges the datasets cover.
pub const SUPPORTED_EXCHANGES: [Exchange; 1] = [Exchange::Nasdaq];

/// A recognized reason a query produced no bars.
#[derive(Debug, Error)]
pub enum QueryError {
    #[error("An unknown exception occurred: {0}")]
    Init(DataError),

    #[error("EdArchimbaud failed to query bar data: unsupported contract code {vt_symbol}")]
    UnsupportedSymbol { vt_symbol: String },

    #[error("EdArchimbaud failed to query bar data: unsupported time period {interval}")]
    UnsupportedInterval { interval: String },

    #[error("EdArchimbaud failed to query bar data: {0}")]
    Fetch(DataError),
}

/// Adapter from edarchimbaud tables to normalized bars.
pub struct EdArchimbaudDatafeed<S: DatasetSource> {
    source: S,
    settings: DatafeedSettings,
    universe: Mutex<Option<Arc<SymbolUniverse>>>,
}

impl<S: DatasetSource> EdArchimbaudDatafeed<S> {
    pub fn new(source: S, settings: DatafeedSettings) -> Self {
        Self {
            source,
            settings,
            universe: Mutex::new(None),
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn settings(&self) -> &DatafeedSettings {
        &self.settings
    }

    /// Load the symbol universe unless it is already cached.
    ///
    /// The lock is held across the fetch, so concurrent callers wait for the
    /// first load instead of issuing their own.
    pub fn try_init(&self) -> Result<Arc<SymbolUniverse>, DataError> {
        let mut guard = self.lock_universe();
        if let Some(universe) = guard.as_ref() {
            return Ok(Arc::clone(universe));
        }

        let dataset = self.settings.datasets.universe_dataset();
        debug!(source = self.source.name(), %dataset, "loading symbol universe");

        let table = self.source.load_table(&dataset)?;
        let universe = Arc::new(SymbolUniverse::from_frame(&table)?);
        info!(symbols = universe.len(), %dataset, "symbol universe loaded");

        *guard = Some(Arc::clone(&universe));
        Ok(universe)
    }

    pub fn is_inited(&self) -> bool {
        self.lock_universe().is_some()
    }

    /// The cached universe, if init has succeeded.
    pub fn symbols(&self) -> Option<Arc<SymbolUniverse>> {
        self.lock_universe().clone()
    }

    pub fn supported_exchanges(&self) -> &'static [Exchange] {
        &SUPPORTED_EXCHANGES
    }

    /// Query bars, returning every recognized failure as a [`QueryError`].
    pub fn try_query_bar_history(&self, req: &HistoryRequest) -> Result<Vec<BarData>, QueryError> {
        let universe = self.try_init().map_err(QueryError::Init)?;

        if !universe.contains(&req.symbol) {
            return Err(QueryError::UnsupportedSymbol {
                vt_symbol: req.vt_symbol(),
            });
        }

        let granularity = Granularity::for_interval(req.interval).ok_or_else(|| {
            QueryError::UnsupportedInterval {
                interval: req.interval.value().to_string(),
            }
        })?;

        let end = req
            .end
            .checked_add_signed(TimeDelta::days(1))
            .unwrap_or(NaiveDateTime::MAX);
        let dataset = self.settings.datasets.timeseries_dataset(granularity);

        let table = self.source.load_table(&dataset).map_err(QueryError::Fetch)?;
        let rows = select_rows(&table, &req.symbol, req.start, end).map_err(QueryError::Fetch)?;

        let shift = granularity.open_shift();
        let bars: Vec<BarData> = rows.iter().map(|row| build_bar(row, req, shift)).collect();

        debug!(
            vt_symbol = %req.vt_symbol(),
            interval = %req.interval,
            %dataset,
            bars = bars.len(),
            "bar history query complete"
        );

        Ok(bars)
    }

    fn lock_universe(&self) -> MutexGuard<'_, Option<Arc<SymbolUniverse>>> {
        self.universe
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

fn report(output: &dyn Output, err: &QueryError) {
    let msg = err.to_string();
    warn!("{msg}");
    output.output(&msg);
}

impl<S: DatasetSource> Datafeed for EdArchimbaudDatafeed<S> {
    fn init(&self, output: &dyn Output) -> bool {
        match self.try_init() {
            Ok(_) => true,
            Err(e) => {
                report(output, &QueryError::Init(e));
                false
            }
        }
    }

    fn query_bar_history(
        &self,
        req: &HistoryRequest,
        output: &dyn Output,
    ) -> Result<Vec<BarData>, DataError> {
        let propagate = self.settings.fetch_failure == FetchFailurePolicy::Propagate;
        match self.try_query_bar_history(req) {
            Ok(bars) => Ok(bars),
            Err(QueryError::Fetch(e)) if propagate => Err(e),
            Err(err) => {
                report(output, &err);
                Ok(Vec::new())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::*;

    struct StaticSource;

    impl DatasetSource for StaticSource {
        fn name(&self) -> &str {
            "static"
        }

        fn load_table(&self, dataset: &str) -> Result<DataFrame, DataError> {
            match dataset {
                "edarchimbaud/perimeter-stocks" => df!("symbol" => ["AAPL", "MSFT"])
                    .map_err(|e| DataError::Frame(e.to_string())),
                other => Err(DataError::DatasetNotFound {
                    dataset: other.to_string(),
                }),
            }
        }
    }

    #[test]
    fn try_init_caches_universe() {
        let feed = EdArchimbaudDatafeed::new(StaticSource, DatafeedSettings::default());
        assert!(!feed.is_inited());
        assert!(feed.symbols().is_none());

        let universe = feed.try_init().unwrap();
        assert_eq!(universe.len(), 2);
        assert!(feed.is_inited());
        assert!(feed.symbols().unwrap().contains("MSFT"));
    }

    #[test]
    fn query_error_messages() {
        let err = QueryError::UnsupportedSymbol {
            vt_symbol: "ZZZZ.NASDAQ".into(),
        };
        assert_eq!(
            err.to_string(),
            "EdArchimbaud failed to query bar data: unsupported contract code ZZZZ.NASDAQ"
        );

        let err = QueryError::UnsupportedInterval {
            interval: "1h".into(),
        };
        assert_eq!(
            err.to_string(),
            "EdArchimbaud failed to query bar data: unsupported time period 1h"
        );
    }

    #[test]
    fn advertises_nasdaq_only() {
        let feed = EdArchimbaudDatafeed::new(StaticSource, DatafeedSettings::default());
        assert_eq!(feed.supported_exchanges(), &[Exchange::Nasdaq]);
    }
}
