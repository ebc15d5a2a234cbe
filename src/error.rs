//! Error handling module for NGR Finder
//!
//! Provides the crate-wide error type using thiserror. Domain errors
//! (`LookupError`, `ConversionError`, `GridRefError`) live next to the code
//! that raises them and convert into [`NgrError`] at the application edge.

use crate::converter::ConversionError;
use crate::geodesy::GridRefError;
use crate::resolver::LookupError;
use thiserror::Error;

/// Main error type for NGR Finder
#[derive(Error, Debug)]
pub enum NgrError {
    /// IO errors (file operations, terminal, etc.)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration errors (loading, parsing, validation)
    #[error("Configuration error: {0}")]
    Config(String),

    /// HTTP client construction errors
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    /// Postcode lookup failures
    #[error(transparent)]
    Lookup(#[from] LookupError),

    /// Grid reference / coordinate conversion failures
    #[error("Conversion error: {0}")]
    Conversion(#[from] ConversionError),

    /// Grid reference parsing and projection failures
    #[error("Grid reference error: {0}")]
    GridRef(#[from] GridRefError),

    /// Terminal/UI errors
    #[error("Terminal error: {0}")]
    Terminal(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for NGR Finder operations
pub type Result<T> = std::result::Result<T, NgrError>;

impl NgrError {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a terminal error
    pub fn terminal(msg: impl Into<String>) -> Self {
        Self::Terminal(msg.into())
    }
}
