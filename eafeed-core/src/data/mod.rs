//! Dataset retrieval, validation and row extraction

pub mod frame;
pub mod hub;
pub mod local;
pub mod schema;
pub mod source;
pub mod universe;

pub use frame::{select_rows, RawRow};
pub use hub::HubSource;
pub use local::LocalSource;
pub use schema::{SchemaError, TableSchema};
pub use source::{DataError, DatasetSource};
pub use universe::SymbolUniverse;
