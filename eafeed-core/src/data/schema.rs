use polars::prelude::*;

/// Column set a dataset table must carry.
pub struct TableSchema {
    numeric: &'static [&'static str],
    text: &'static [&'static str],
    temporal: &'static [&'static str],
}

impl TableSchema {
    /// Schema of the `timeseries-*-stocks` tables.
    pub fn timeseries() -> Self {
        Self {
            numeric: &["open", "high", "low", "close", "adj_close", "volume"],
            text: &["symbol"],
            temporal: &["date"],
        }
    }

    /// Schema of the symbol universe table.
    pub fn universe() -> Self {
        Self {
            numeric: &[],
            text: &["symbol"],
            temporal: &[],
        }
    }

    /// Validate DataFrame against schema
    pub fn validate(&self, df: &DataFrame) -> Result<(), SchemaError> {
        let checks: [(&[&str], fn(&DataType) -> bool, &str); 3] = [
            (self.numeric, is_numeric, "numeric"),
            (self.text, is_text, "string"),
            (self.temporal, is_temporal, "date, datetime or string"),
        ];

        for (columns, accepts, expected) in checks {
            for name in columns {
                let column = df
                    .column(name)
                    .map_err(|_| SchemaError::MissingColumn(name.to_string()))?;
                if !accepts(column.dtype()) {
                    return Err(SchemaError::TypeMismatch {
                        column: name.to_string(),
                        expected: expected.to_string(),
                        actual: column.dtype().clone(),
                    });
                }
            }
        }

        Ok(())
    }
}

fn is_numeric(dtype: &DataType) -> bool {
    // An all-null column decodes as Null; it zero-fills like any other gap.
    matches!(
        dtype,
        DataType::Float64
            | DataType::Float32
            | DataType::Int64
            | DataType::Int32
            | DataType::Int16
            | DataType::Int8
            | DataType::UInt64
            | DataType::UInt32
            | DataType::UInt16
            | DataType::UInt8
            | DataType::Null
    )
}

fn is_text(dtype: &DataType) -> bool {
    matches!(dtype, DataType::String)
}

fn is_temporal(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Date | DataType::Datetime(..) | DataType::String
    )
}

#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    #[error("Missing required column: {0}")]
    MissingColumn(String),

    #[error("Type mismatch in column {column}: expected {expected}, got {actual:?}")]
    TypeMismatch {
        column: String,
        expected: String,
        actual: DataType,
    },
}
