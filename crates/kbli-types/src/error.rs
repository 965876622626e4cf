//! Error types for the KBLI dashboard.

use thiserror::Error;

/// Unified error type for configuration and domain input.
#[derive(Debug, Error)]
pub enum KbliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid input error
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
