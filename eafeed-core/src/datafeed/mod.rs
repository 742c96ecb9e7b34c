//! The datafeed seam and its EdArchimbaud implementation.

pub mod edarchimbaud;
pub mod output;

pub use edarchimbaud::{EdArchimbaudDatafeed, QueryError, SUPPORTED_EXCHANGES};
pub use output::{Output, StdoutOutput, TracingOutput};

use chrono::TimeDelta;

use crate::data::DataError;
use crate::domain::{BarData, HistoryRequest, Interval};

/// Generic historical data feed, as seen by the host platform.
pub trait Datafeed: Send + Sync {
    /// Prepare the feed. Idempotent; failures are reported through `output`.
    fn init(&self, output: &dyn Output) -> bool;

    /// Query historical bars.
    ///
    /// Recognized failures are reported through `output` and yield an empty
    /// vector. `Err` is reserved for fetch faults the feed is configured to
    /// propagate.
    fn query_bar_history(
        &self,
        req: &HistoryRequest,
        output: &dyn Output,
    ) -> Result<Vec<BarData>, DataError>;
}

/// Granularity of a remote time-series table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Granularity {
    Minute,
    Daily,
}

impl Granularity {
    /// Remote granularity for a bar interval, if the source publishes one.
    pub fn for_interval(interval: Interval) -> Option<Self> {
        match interval {
            Interval::Minute => Some(Granularity::Minute),
            Interval::Daily => Some(Granularity::Daily),
            Interval::Hour | Interval::Weekly | Interval::Tick => None,
        }
    }

    /// Name used in dataset ids.
    pub fn as_str(&self) -> &'static str {
        match self {
            Granularity::Minute => "1m",
            Granularity::Daily => "1d",
        }
    }

    /// Distance from the source's bar-close timestamp back to the bar open.
    ///
    /// Daily rows are dated by session, so they need no shift.
    pub fn open_shift(&self) -> TimeDelta {
        match self {
            Granularity::Minute => TimeDelta::minutes(1),
            Granularity::Daily => TimeDelta::zero(),
        }
    }
}
