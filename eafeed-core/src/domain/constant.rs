//! Exchange and interval enumerations.
//!
//! Text forms follow the host platform's conventions: exchanges are upper-case
//! venue codes, intervals use the short values ("1m", "d", ...) that also appear
//! in diagnostics.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Trading venue of an instrument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Exchange {
    Nasdaq,
    Nyse,
    Amex,
    Arca,
    Smart,
    Bats,
    Iex,
    Otc,
    Local,
}

impl Exchange {
    pub const ALL: [Exchange; 9] = [
        Exchange::Nasdaq,
        Exchange::Nyse,
        Exchange::Amex,
        Exchange::Arca,
        Exchange::Smart,
        Exchange::Bats,
        Exchange::Iex,
        Exchange::Otc,
        Exchange::Local,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Exchange::Nasdaq => "NASDAQ",
            Exchange::Nyse => "NYSE",
            Exchange::Amex => "AMEX",
            Exchange::Arca => "ARCA",
            Exchange::Smart => "SMART",
            Exchange::Bats => "BATS",
            Exchange::Iex => "IEX",
            Exchange::Otc => "OTC",
            Exchange::Local => "LOCAL",
        }
    }
}

impl fmt::Display for Exchange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Exchange {
    type Err = ParseConstantError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        Exchange::ALL
            .into_iter()
            .find(|e| e.as_str() == upper)
            .ok_or_else(|| ParseConstantError::Exchange(s.to_string()))
    }
}

/// Bar interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Interval {
    #[serde(rename = "1m")]
    Minute,
    #[serde(rename = "1h")]
    Hour,
    #[serde(rename = "d")]
    Daily,
    #[serde(rename = "w")]
    Weekly,
    #[serde(rename = "tick")]
    Tick,
}

impl Interval {
    /// Short value used in diagnostics and serialized output.
    pub fn value(&self) -> &'static str {
        match self {
            Interval::Minute => "1m",
            Interval::Hour => "1h",
            Interval::Daily => "d",
            Interval::Weekly => "w",
            Interval::Tick => "tick",
        }
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.value())
    }
}

impl FromStr for Interval {
    type Err = ParseConstantError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "1m" | "minute" => Ok(Interval::Minute),
            "1h" | "hour" => Ok(Interval::Hour),
            "d" | "1d" | "daily" => Ok(Interval::Daily),
            "w" | "1w" | "weekly" => Ok(Interval::Weekly),
            "tick" => Ok(Interval::Tick),
            _ => Err(ParseConstantError::Interval(s.to_string())),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseConstantError {
    #[error("unknown exchange '{0}'")]
    Exchange(String),

    #[error("unknown interval '{0}'")]
    Interval(String),
}
