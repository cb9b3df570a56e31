use std::path::PathBuf;

use thiserror::Error;

/// Failures surfaced by the data layer.
#[derive(Debug, Error)]
pub enum DataError {
    /// The resource could not be opened, read or parsed as a table.
    #[error("data unavailable from {}: {reason}", path.display())]
    Unavailable { path: PathBuf, reason: String },

    /// A single row failed validation and was left out of the dataset.
    #[error("row {row}: {reason}")]
    MalformedRow { row: usize, reason: String },
}

impl DataError {
    /// Wrap an `anyhow` chain coming out of a loader.
    pub fn unavailable(path: impl Into<PathBuf>, err: &anyhow::Error) -> Self {
        DataError::Unavailable {
            path: path.into(),
            reason: format!("{err:#}"),
        }
    }

    pub fn malformed(row: usize, reason: impl Into<String>) -> Self {
        DataError::MalformedRow {
            row,
            reason: reason.into(),
        }
    }
}
