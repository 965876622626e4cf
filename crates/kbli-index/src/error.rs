//! Index error types.

use thiserror::Error;

/// Errors that can occur while configuring the index.
///
/// Building and querying an index never fails; empty input yields empty views.
#[derive(Debug, Error)]
pub enum IndexError {
    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}
