//! Service error types.

use kbli_types::{KbliError, TableKind};
use thiserror::Error;

/// Errors returned by dashboard views and exports.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The view depends on a table that failed to load
    #[error("Data unavailable: {table} table ({reason})")]
    Unavailable { table: TableKind, reason: String },

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(#[from] KbliError),

    /// Invalid index configuration
    #[error("Index error: {0}")]
    Index(#[from] kbli_index::IndexError),

    /// CSV export failed
    #[error("Export error: {0}")]
    Export(#[from] csv::Error),

    /// Writing export output failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Unknown view name
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl ServiceError {
    pub fn is_unavailable(&self) -> bool {
        matches!(self, ServiceError::Unavailable { .. })
    }
}
