//! Error types for pixblend-composite

use std::fmt;
use thiserror::Error;

/// Pipeline stage, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    /// Decode inputs, normalize to RGB and fit the background width
    Load,
    /// Threshold the foreground luminance into a mask
    MaskDerivation,
    /// Complement the mask
    MaskInversion,
    /// Keep the background under the mask and the foreground outside it
    RegionExtraction,
    /// Add the two regions
    Merge,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Load => "load",
            Stage::MaskDerivation => "mask derivation",
            Stage::MaskInversion => "mask inversion",
            Stage::RegionExtraction => "region extraction",
            Stage::Merge => "merge",
        };
        f.write_str(name)
    }
}

/// Errors that can occur while compositing
#[derive(Debug, Error)]
pub enum CompositeError {
    /// A pipeline stage failed; the run was aborted there
    #[error("{stage} stage failed: {source}")]
    Stage {
        stage: Stage,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Writing the result failed
    #[error("I/O error: {0}")]
    Io(#[from] pixblend_io::IoError),
}

impl CompositeError {
    /// The stage that failed, if the error came from the pipeline.
    pub fn stage(&self) -> Option<Stage> {
        match self {
            CompositeError::Stage { stage, .. } => Some(*stage),
            CompositeError::Io(_) => None,
        }
    }

    /// Wrap an error raised inside `stage`.
    pub(crate) fn at<E>(stage: Stage) -> impl FnOnce(E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        move |source| CompositeError::Stage {
            stage,
            source: Box::new(source),
        }
    }
}

/// Result type for compositing operations
pub type CompositeResult<T> = Result<T, CompositeError>;
