//! Regression check bookkeeping

use crate::error::{TestError, TestResult};
use crate::regout_dir;
use pixblend_core::Image;
use pixblend_io::ImageFormat;
use std::fs;

/// Whether intermediate images are written out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RegTestMode {
    /// Only check (default)
    #[default]
    Compare,
    /// Check and write every image passed to [`RegParams::write_image`]
    Display,
}

impl RegTestMode {
    /// Read `REGTEST_MODE`; anything but `display` means compare.
    pub fn from_env() -> Self {
        match std::env::var("REGTEST_MODE") {
            Ok(mode) if mode.eq_ignore_ascii_case("display") => Self::Display,
            _ => Self::Compare,
        }
    }
}

/// Collects the outcome of a numbered sequence of checks.
///
/// Checks never panic; failures are recorded and reported by
/// [`cleanup`](Self::cleanup), whose result the test asserts.
pub struct RegParams {
    name: String,
    mode: RegTestMode,
    index: usize,
    failures: Vec<String>,
}

impl RegParams {
    /// Start a run named `name`, with the mode from `REGTEST_MODE`.
    pub fn new(name: &str) -> Self {
        let mode = RegTestMode::from_env();
        eprintln!("== {name}_reg ({mode:?}) ==");
        Self {
            name: name.to_string(),
            mode,
            index: 0,
            failures: Vec::new(),
        }
    }

    fn fail(&mut self, what: String) -> bool {
        let msg = format!("{}_reg #{}: {}", self.name, self.index, what);
        eprintln!("{msg}");
        self.failures.push(msg);
        false
    }

    /// Check that `actual` is within `delta` of `expected`.
    pub fn compare_values(&mut self, expected: f64, actual: f64, delta: f64) -> bool {
        self.index += 1;
        let diff = (expected - actual).abs();
        if diff > delta {
            return self.fail(format!(
                "expected {expected}, got {actual} (diff {diff} > {delta})"
            ));
        }
        true
    }

    /// Check that two images have the same shape and samples.
    pub fn compare_images(&mut self, actual: &Image, expected: &Image) -> bool {
        self.index += 1;
        if actual.shape() != expected.shape() {
            return self.fail(format!(
                "shape {} differs from {}",
                actual.shape(),
                expected.shape()
            ));
        }
        let spp = actual.spp() as usize;
        let width = actual.width() as usize;
        match actual.data().iter().zip(expected.data()).position(|(a, b)| a != b) {
            Some(pos) => {
                let pixel = pos / spp;
                self.fail(format!(
                    "sample differs at ({}, {}) channel {}",
                    pixel % width,
                    pixel / width,
                    pos % spp
                ))
            }
            None => true,
        }
    }

    /// Write `image` as `<regout>/<name>.<index>.png` in display mode.
    ///
    /// Advances the check index in either mode.
    pub fn write_image(&mut self, image: &Image) -> TestResult<()> {
        self.index += 1;
        if self.mode != RegTestMode::Display {
            return Ok(());
        }

        let dir = regout_dir();
        fs::create_dir_all(&dir).map_err(|source| TestError::DirectoryCreate {
            path: dir.clone(),
            source,
        })?;
        let format = ImageFormat::Png;
        let path = format!("{dir}/{}.{:02}.{}", self.name, self.index, format.extension());
        pixblend_io::write_image(image, &path, format).map_err(|source| {
            TestError::ImageWrite {
                path: path.clone(),
                source,
            }
        })?;
        eprintln!("wrote {path}");
        Ok(())
    }

    /// Print the summary; `true` if every check passed.
    pub fn cleanup(self) -> bool {
        if self.failures.is_empty() {
            eprintln!("{}_reg: ok ({} checks)", self.name, self.index);
            return true;
        }
        eprintln!("{}_reg: {} failed", self.name, self.failures.len());
        for failure in &self.failures {
            eprintln!("  {failure}");
        }
        false
    }
}
