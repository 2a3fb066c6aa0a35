//! pixblend-test - Regression test framework for pixblend
//!
//! This crate provides a small regression test harness supporting two
//! modes:
//!
//! - **Compare**: Check computed values and images against expectations
//! - **Display**: Additionally write intermediate images for inspection
//!
//! # Usage
//!
//! ```ignore
//! use pixblend_test::RegParams;
//!
//! let mut rp = RegParams::new("threshold");
//! rp.compare_values(8.0, count as f64, 0.0);
//! assert!(rp.cleanup());
//! ```
//!
//! # Environment Variables
//!
//! - `REGTEST_MODE`: Set to "compare" or "display"

mod error;
pub mod fixtures;
mod params;

pub use error::{TestError, TestResult};
pub use params::{RegParams, RegTestMode};

/// Get the path to the workspace root
fn workspace_root() -> String {
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    // pixblend-test is at crates/pixblend-test, so go up two directories
    format!("{}/../..", manifest_dir)
}

/// Get the path to the regout (regression output) directory
pub fn regout_dir() -> String {
    format!("{}/tests/regout", workspace_root())
}
