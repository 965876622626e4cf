//! Storage layer error types.

use std::path::PathBuf;

use kbli_types::TableKind;
use thiserror::Error;

/// Errors that can occur while loading a source table
#[derive(Error, Debug)]
pub enum StorageError {
    /// File could not be read
    #[error("Failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// CSV decoding failed
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A required column is absent from the header row
    #[error("Table {table} is missing column {column}")]
    MissingColumn { table: TableKind, column: String },

    /// Serialization error while versioning in-memory rows
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        StorageError::Serialization(err.to_string())
    }
}
