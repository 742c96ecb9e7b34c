//! Row extraction from time-series tables.
//!
//! Rows are filtered by symbol with a lazy polars filter, converted into
//! [`RawRow`]s and then bounded by date. Missing numeric values are zero-filled
//! on the way out; rows without a parseable date are dropped because they can
//! never fall inside a requested range.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use polars::prelude::*;
use tracing::debug;

use super::schema::TableSchema;
use crate::adjust::SOURCE_TZ;
use super::source::DataError;

/// One time-series row as published by the source, before adjustment.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRow {
    pub date: NaiveDateTime,
    pub symbol: String,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub adj_close: f64,
    pub volume: f64,
}

/// Select the rows of `symbol` whose date lies in `[start, end]`, in table order.
pub fn select_rows(
    df: &DataFrame,
    symbol: &str,
    start: NaiveDateTime,
    end: NaiveDateTime,
) -> Result<Vec<RawRow>, DataError> {
    TableSchema::timeseries().validate(df)?;

    let filtered = df
        .clone()
        .lazy()
        .filter(col("symbol").cast(DataType::String).eq(lit(symbol)))
        .collect()
        .map_err(frame_err("symbol filter"))?;

    let rows: Vec<RawRow> = dataframe_to_rows(&filtered)?
        .into_iter()
        .filter(|row| row.date >= start && row.date <= end)
        .collect();

    debug!(
        symbol,
        table_rows = df.height(),
        symbol_rows = filtered.height(),
        selected = rows.len(),
        "selected time-series rows"
    );

    Ok(rows)
}

/// Convert a validated time-series DataFrame into RawRows.
fn dataframe_to_rows(df: &DataFrame) -> Result<Vec<RawRow>, DataError> {
    let n = df.height();

    let dates = date_values(df.column("date").map_err(frame_err("date"))?)?;
    let symbols = df
        .column("symbol")
        .and_then(|c| c.cast(&DataType::String))
        .map_err(frame_err("symbol"))?;
    let symbol_ca = symbols.str().map_err(frame_err("symbol column type"))?;

    let open = numeric_values(df, "open")?;
    let high = numeric_values(df, "high")?;
    let low = numeric_values(df, "low")?;
    let close = numeric_values(df, "close")?;
    let adj_close = numeric_values(df, "adj_close")?;
    let volume = numeric_values(df, "volume")?;

    let mut rows = Vec::with_capacity(n);
    for i in 0..n {
        let Some(date) = dates[i] else {
            continue;
        };
        rows.push(RawRow {
            date,
            symbol: symbol_ca.get(i).unwrap_or_default().to_string(),
            open: open[i],
            high: high[i],
            low: low[i],
            close: close[i],
            adj_close: adj_close[i],
            volume: volume[i],
        });
    }

    Ok(rows)
}

/// Read a numeric column as f64, replacing nulls and NaN with zero.
fn numeric_values(df: &DataFrame, name: &str) -> Result<Vec<f64>, DataError> {
    let column = df
        .column(name)
        .and_then(|c| c.cast(&DataType::Float64))
        .map_err(frame_err(name))?;
    let ca = column.f64().map_err(frame_err(name))?;

    Ok((0..ca.len())
        .map(|i| match ca.get(i) {
            Some(v) if !v.is_nan() => v,
            _ => 0.0,
        })
        .collect())
}

/// Read the date column as naive New York wall-clock times.
///
/// Zone-aware datetimes hold UTC instants and are converted to the source
/// timezone before the zone is dropped. Naive datetimes and dates are taken
/// as wall-clock values already.
fn date_values(column: &Column) -> Result<Vec<Option<NaiveDateTime>>, DataError> {
    let zone = match column.dtype() {
        DataType::String => {
            let ca = column.str().map_err(frame_err("date column type"))?;
            return Ok((0..ca.len())
                .map(|i| ca.get(i).and_then(parse_timestamp))
                .collect());
        }
        DataType::Datetime(_, zone) => zone.clone(),
        _ => None,
    };
    let zoned = zone.is_some();

    let column = column
        .cast(&DataType::Datetime(TimeUnit::Milliseconds, zone))
        .map_err(frame_err("date cast"))?;
    let ca = column.datetime().map_err(frame_err("date column type"))?;

    Ok((0..ca.len())
        .map(|i| {
            ca.get(i).and_then(DateTime::from_timestamp_millis).map(|utc| {
                if zoned {
                    utc.with_timezone(&SOURCE_TZ).naive_local()
                } else {
                    utc.naive_utc()
                }
            })
        })
        .collect())
}

/// Parse a textual timestamp as published by the source.
///
/// RFC 3339 strings carry an offset and are converted to New York wall-clock
/// time, matching zone-aware datetime columns.
pub fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    const FORMATS: [&str; 4] = [
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M",
        "%Y-%m-%dT%H:%M",
    ];

    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&SOURCE_TZ).naive_local());
    }
    for fmt in FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

fn frame_err(context: &str) -> impl Fn(PolarsError) -> DataError + '_ {
    move |e| DataError::Frame(format!("{context}: {e}"))
}
