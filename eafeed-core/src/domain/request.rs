//! Historical data request issued by the host platform.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::constant::{Exchange, Interval};

/// A request for historical bars.
///
/// `start` and `end` are wall-clock timestamps on the dataset's own clock
/// (no timezone attached); both bounds are inclusive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryRequest {
    pub symbol: String,
    pub exchange: Exchange,
    pub interval: Interval,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl HistoryRequest {
    pub fn new(
        symbol: impl Into<String>,
        exchange: Exchange,
        interval: Interval,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            exchange,
            interval,
            start,
            end,
        }
    }

    /// Qualified instrument id, e.g. `AAPL.NASDAQ`.
    pub fn vt_symbol(&self) -> String {
        format!("{}.{}", self.symbol, self.exchange)
    }
}
