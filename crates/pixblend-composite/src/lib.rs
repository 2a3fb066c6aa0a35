//! pixblend Composite - Mask-based image compositing
//!
//! Merges a background image into the bright regions of a foreground
//! image using a luminance-threshold mask. See [`pipeline`] for the
//! stage sequence.

mod error;
pub mod pipeline;

pub use pixblend_core;

pub use error::{CompositeError, CompositeResult, Stage};

pub use pipeline::{
    // Types
    CompositeOptions,
    CompositeOutput,
    // Functions
    composite,
    composite_files,
    derive_mask,
    extract_regions,
    merge,
    normalize_background,
    write_result,
};
