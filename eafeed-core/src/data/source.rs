//! Dataset source trait and structured error types.
//!
//! The DatasetSource trait abstracts over where the remote tables come from
//! (the Hugging Face Hub, a local parquet mirror) so the adapter can be driven
//! by in-memory frames in tests.

use polars::prelude::DataFrame;
use thiserror::Error;

use super::schema::SchemaError;

/// Structured error types for dataset retrieval.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("network unreachable: {0}")]
    NetworkUnreachable(String),

    #[error("authentication required: {0}")]
    AuthenticationRequired(String),

    #[error("dataset not found: {dataset}")]
    DatasetNotFound { dataset: String },

    #[error("HTTP {status} while fetching {dataset}")]
    Http { status: u16, dataset: String },

    #[error("response format changed: {0}")]
    ResponseFormatChanged(String),

    #[error("parquet decode error: {0}")]
    Parquet(String),

    #[error("frame error: {0}")]
    Frame(String),

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Trait for dataset sources.
///
/// A dataset id has the form `{namespace}/{name}`, e.g.
/// `edarchimbaud/timeseries-1d-stocks`. Implementations return the whole
/// training split as one table, rows in the source's order.
pub trait DatasetSource: Send + Sync {
    /// Human-readable name of this source.
    fn name(&self) -> &str;

    /// Load every row of a dataset.
    fn load_table(&self, dataset: &str) -> Result<DataFrame, DataError>;
}

impl<T: DatasetSource + ?Sized> DatasetSource for Box<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn load_table(&self, dataset: &str) -> Result<DataFrame, DataError> {
        (**self).load_table(dataset)
    }
}
