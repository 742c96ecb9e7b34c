//! Bar adjustment arithmetic.
//!
//! Turns a [`RawRow`] into a [`BarData`]:
//! - open/high/low are scaled by `adj_close / close`; close is `adj_close`
//! - the timestamp moves from bar-close to bar-open by the granularity's shift
//! - the naive wall-clock time is localized to America/New_York
//! - prices are rounded to six decimals

use chrono::{DateTime, LocalResult, NaiveDateTime, Offset, TimeDelta, TimeZone};
use chrono_tz::America::New_York;
use chrono_tz::Tz;

use crate::data::RawRow;
use crate::domain::{BarData, HistoryRequest};

/// Decimal places kept on prices (a tick of 0.000001).
pub const PRICE_DECIMALS: i32 = 6;

/// Timezone the source publishes its wall-clock timestamps in.
pub const SOURCE_TZ: Tz = New_York;

/// Source tag stamped on every bar.
pub const GATEWAY_NAME: &str = "EA";

/// Round half-to-even at `decimals` places.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (value * scale).round_ties_even() / scale
}

/// Split/dividend adjustment factor.
///
/// A zero close (a zero-filled gap) leaves prices unscaled.
pub fn adjustment_factor(close: f64, adj_close: f64) -> f64 {
    if close == 0.0 {
        1.0
    } else {
        adj_close / close
    }
}

/// Attach the source timezone to a naive wall-clock time.
///
/// Ambiguous times (DST fall-back) take the earlier instant. Times skipped by
/// DST spring-forward keep the offset in force before the transition.
pub fn localize(naive: NaiveDateTime) -> DateTime<Tz> {
    match SOURCE_TZ.from_local_datetime(&naive) {
        LocalResult::Single(dt) => dt,
        LocalResult::Ambiguous(earliest, _) => earliest,
        LocalResult::None => {
            let before = SOURCE_TZ.offset_from_utc_datetime(&naive).fix();
            let utc = naive
                .checked_sub_signed(TimeDelta::seconds(i64::from(before.local_minus_utc())))
                .unwrap_or(naive);
            SOURCE_TZ.from_utc_datetime(&utc)
        }
    }
}

/// Build the normalized bar for one source row.
///
/// A shift that would underflow the calendar saturates at its start.
pub fn build_bar(row: &RawRow, request: &HistoryRequest, shift: TimeDelta) -> BarData {
    let factor = adjustment_factor(row.close, row.adj_close);

    BarData {
        symbol: request.symbol.clone(),
        exchange: request.exchange,
        interval: request.interval,
        datetime: localize(
            row.date
                .checked_sub_signed(shift)
                .unwrap_or(NaiveDateTime::MIN),
        ),
        open_price: round_to(row.open * factor, PRICE_DECIMALS),
        high_price: round_to(row.high * factor, PRICE_DECIMALS),
        low_price: round_to(row.low * factor, PRICE_DECIMALS),
        close_price: round_to(row.adj_close, PRICE_DECIMALS),
        volume: row.volume,
        turnover: row.volume * row.adj_close,
        open_interest: 0.0,
        gateway_name: GATEWAY_NAME.to_string(),
    }
}
