//! Error types for the regression harness

use thiserror::Error;

/// Failures while writing display-mode output
#[derive(Debug, Error)]
pub enum TestError {
    /// Encoding or writing an intermediate image failed
    #[error("cannot write '{path}'")]
    ImageWrite {
        path: String,
        source: pixblend_io::IoError,
    },

    /// The output directory could not be created
    #[error("cannot create output directory '{path}'")]
    DirectoryCreate {
        path: String,
        source: std::io::Error,
    },
}

/// Result type for harness operations
pub type TestResult<T> = Result<T, TestError>;
