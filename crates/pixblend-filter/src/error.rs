//! Error types for pixblend-filter

use thiserror::Error;

/// Errors that can occur during filtering operations
#[derive(Debug, Error)]
pub enum FilterError {
    /// Core library error
    #[error("core error: {0}")]
    Core(#[from] pixblend_core::Error),

    /// Unsupported channel layout for this operation
    #[error("unsupported channels: expected {expected}, got {actual}")]
    UnsupportedChannels {
        /// Expected layout description
        expected: &'static str,
        /// Actual samples per pixel
        actual: u32,
    },

    /// Invalid parameters
    #[error("invalid parameters: {0}")]
    InvalidParameters(String),
}

/// Result type for filter operations
pub type FilterResult<T> = Result<T, FilterError>;
