//! eafeed core: historical stock bars from the edarchimbaud datasets.
//!
//! This crate contains:
//! - Domain types (exchanges, intervals, history requests, bars)
//! - Dataset sources (Hugging Face hub parquet export, local parquet mirror)
//! - Bar adjustment arithmetic (split/dividend factor, bar-open shift, localization)
//! - The datafeed adapter with lazy symbol-universe init
//! - TOML settings with injected credentials

pub mod adjust;
pub mod data;
pub mod datafeed;
pub mod domain;
pub mod settings;

pub use datafeed::{Datafeed, EdArchimbaudDatafeed, Output, QueryError};
pub use domain::{BarData, Exchange, HistoryRequest, Interval};
pub use settings::DatafeedSettings;

#[cfg(test)]
mod tests {
    use super::*;

    /// Compile-time check: the datafeed can be shared across threads.
    #[allow(dead_code)]
    fn assert_send_sync() {
        fn require_send<T: Send>() {}
        fn require_sync<T: Sync>() {}

        require_send::<domain::BarData>();
        require_sync::<domain::BarData>();
        require_send::<domain::HistoryRequest>();
        require_sync::<domain::HistoryRequest>();
        require_send::<data::SymbolUniverse>();
        require_sync::<data::SymbolUniverse>();

        require_send::<EdArchimbaudDatafeed<data::HubSource>>();
        require_sync::<EdArchimbaudDatafeed<data::HubSource>>();
        require_send::<EdArchimbaudDatafeed<data::LocalSource>>();
        require_sync::<EdArchimbaudDatafeed<data::LocalSource>>();
    }
}
