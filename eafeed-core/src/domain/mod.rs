//! Domain types shared with the host platform.

pub mod bar;
pub mod constant;
pub mod request;

pub use bar::BarData;
pub use constant::{Exchange, Interval, ParseConstantError};
pub use request::HistoryRequest;
