//! Offline dataset source: a directory mirror of the Hub's parquet shards.
//!
//! Layout: `{root}/{namespace}/{name}/*.parquet`, e.g.
//! `mirror/edarchimbaud/timeseries-1d-stocks/0000.parquet`. Shards are read in
//! file-name order and stacked.

use polars::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::source::{DataError, DatasetSource};

pub struct LocalSource {
    root: PathBuf,
}

impl LocalSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory of the mirror.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn shard_paths(&self, dataset: &str) -> Result<Vec<PathBuf>, DataError> {
        let dir = self.root.join(dataset);
        if !dir.is_dir() {
            return Err(DataError::DatasetNotFound {
                dataset: dataset.to_string(),
            });
        }

        let mut paths = Vec::new();
        for entry in fs::read_dir(&dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) == Some("parquet") {
                paths.push(path);
            }
        }
        paths.sort();
        Ok(paths)
    }
}

impl DatasetSource for LocalSource {
    fn name(&self) -> &str {
        "local_parquet"
    }

    fn load_table(&self, dataset: &str) -> Result<DataFrame, DataError> {
        let paths = self.shard_paths(dataset)?;
        let (first, rest) = paths.split_first().ok_or_else(|| DataError::DatasetNotFound {
            dataset: dataset.to_string(),
        })?;

        let mut table = read_parquet(first)?;
        for path in rest {
            table
                .vstack_mut(&read_parquet(path)?)
                .map_err(|e| DataError::Frame(format!("stacking {}: {e}", path.display())))?;
        }

        debug!(dataset, shards = paths.len(), rows = table.height(), "loaded local dataset");
        Ok(table)
    }
}

fn read_parquet(path: &Path) -> Result<DataFrame, DataError> {
    let file = fs::File::open(path)?;
    ParquetReader::new(file)
        .finish()
        .map_err(|e| DataError::Parquet(format!("{}: {e}", path.display())))
}
