//! Property tests for bar adjustment invariants.
//!
//! Uses proptest to verify:
//! 1. Adjusted open equals round(open * adj_close / close, 1e-6)
//! 2. Close is adj_close rounded; turnover is volume * adj_close
//! 3. Daily rows keep their date; minute rows move back one minute
//! 4. Rounding is idempotent and stays within half a tick

use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use proptest::prelude::*;

use eafeed_core::adjust::{build_bar, localize, round_to, PRICE_DECIMALS};
use eafeed_core::data::RawRow;
use eafeed_core::datafeed::Granularity;
use eafeed_core::domain::{Exchange, HistoryRequest, Interval};

// ── Strategies (proptest) ────────────────────────────────────────────

fn arb_price() -> impl Strategy<Value = f64> {
    (1.0..1000.0_f64).prop_map(|p| (p * 100.0).round() / 100.0)
}

fn arb_factor() -> impl Strategy<Value = f64> {
    0.05..1.0_f64
}

fn arb_volume() -> impl Strategy<Value = f64> {
    (0u32..10_000_000).prop_map(f64::from)
}

/// Regular-session minutes in 2023, away from DST transitions.
fn arb_session_time() -> impl Strategy<Value = NaiveDateTime> {
    (1u32..=28, 1u32..=12, 0i64..390).prop_map(|(d, m, minute)| {
        NaiveDate::from_ymd_opt(2023, m, d)
            .unwrap()
            .and_hms_opt(9, 31, 0)
            .unwrap()
            + TimeDelta::minutes(minute)
    })
}

fn row(date: NaiveDateTime, open: f64, close: f64, factor: f64, volume: f64) -> RawRow {
    RawRow {
        date,
        symbol: "PROP".into(),
        open,
        high: open.max(close) + 1.0,
        low: (open.min(close) - 1.0).max(0.01),
        close,
        adj_close: close * factor,
        volume,
    }
}

fn request(interval: Interval, date: NaiveDateTime) -> HistoryRequest {
    HistoryRequest::new("PROP", Exchange::Nasdaq, interval, date, date)
}

// ── 1–2. Price adjustment ────────────────────────────────────────────

proptest! {
    #[test]
    fn open_is_scaled_by_adjustment_factor(
        open in arb_price(),
        close in arb_price(),
        factor in arb_factor(),
        volume in arb_volume(),
        date in arb_session_time(),
    ) {
        let raw = row(date, open, close, factor, volume);
        let bar = build_bar(&raw, &request(Interval::Daily, date), Granularity::Daily.open_shift());

        let expected = round_to(open * (raw.adj_close / close), PRICE_DECIMALS);
        prop_assert_eq!(bar.open_price, expected);
        prop_assert_eq!(bar.close_price, round_to(raw.adj_close, PRICE_DECIMALS));
        prop_assert_eq!(bar.turnover, volume * raw.adj_close);
        prop_assert_eq!(bar.volume, volume);
        prop_assert_eq!(bar.open_interest, 0.0);
    }

    #[test]
    fn adjusted_high_and_low_bracket_open(
        open in arb_price(),
        close in arb_price(),
        factor in arb_factor(),
        date in arb_session_time(),
    ) {
        let raw = row(date, open, close, factor, 1.0);
        let bar = build_bar(&raw, &request(Interval::Daily, date), TimeDelta::zero());

        prop_assert!(bar.high_price >= bar.open_price);
        prop_assert!(bar.low_price <= bar.open_price);
    }
}

// ── 3. Timestamp convention ──────────────────────────────────────────

proptest! {
    #[test]
    fn daily_rows_keep_their_date(date in arb_session_time()) {
        let raw = row(date, 10.0, 10.0, 1.0, 1.0);
        let bar = build_bar(&raw, &request(Interval::Daily, date), Granularity::Daily.open_shift());

        prop_assert_eq!(bar.datetime.naive_local(), date);
    }

    #[test]
    fn minute_rows_move_back_one_minute(date in arb_session_time()) {
        let raw = row(date, 10.0, 10.0, 1.0, 1.0);
        let bar = build_bar(&raw, &request(Interval::Minute, date), Granularity::Minute.open_shift());

        prop_assert_eq!(bar.datetime.naive_local(), date - TimeDelta::minutes(1));
        prop_assert_eq!(bar.datetime, localize(date - TimeDelta::minutes(1)));
    }
}

// ── 4. Rounding ──────────────────────────────────────────────────────

proptest! {
    #[test]
    fn rounding_is_idempotent_and_close(value in -1.0e6..1.0e6_f64) {
        let once = round_to(value, PRICE_DECIMALS);
        prop_assert_eq!(round_to(once, PRICE_DECIMALS), once);
        prop_assert!((once - value).abs() <= 0.5e-6 + 1e-9);
    }
}
