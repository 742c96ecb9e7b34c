//! BarData: the normalized bar handed back to the host platform.

use chrono::DateTime;
use chrono_tz::Tz;
use serde::Serialize;

use super::constant::{Exchange, Interval};

/// OHLCV bar for a single symbol, timestamped at the bar's open.
///
/// Prices are already corrected for splits and dividends.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarData {
    pub symbol: String,
    pub exchange: Exchange,
    pub interval: Interval,
    pub datetime: DateTime<Tz>,
    pub open_price: f64,
    pub high_price: f64,
    pub low_price: f64,
    pub close_price: f64,
    pub volume: f64,
    pub turnover: f64,
    pub open_interest: f64,
    pub gateway_name: String,
}

impl BarData {
    /// Qualified instrument id, e.g. `AAPL.NASDAQ`.
    pub fn vt_symbol(&self) -> String {
        format!("{}.{}", self.symbol, self.exchange)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use chrono_tz::America::New_York;

    fn sample_bar() -> BarData {
        BarData {
            symbol: "AAPL".into(),
            exchange: Exchange::Nasdaq,
            interval: Interval::Daily,
            datetime: New_York.with_ymd_and_hms(2023, 1, 3, 0, 0, 0).unwrap(),
            open_price: 129.5,
            high_price: 130.496154,
            low_price: 128.503846,
            close_price: 129.5,
            volume: 1000.0,
            turnover: 129_500.0,
            open_interest: 0.0,
            gateway_name: "EA".into(),
        }
    }

    #[test]
    fn vt_symbol() {
        assert_eq!(sample_bar().vt_symbol(), "AAPL.NASDAQ");
    }

    #[test]
    fn serializes_with_offset_and_short_interval() {
        let json = serde_json::to_value(sample_bar()).unwrap();
        assert_eq!(json["exchange"], "NASDAQ");
        assert_eq!(json["interval"], "d");
        assert_eq!(json["datetime"], "2023-01-03T00:00:00-05:00");
    }
}
