//! pixblend IO - Image decoding and encoding
//!
//! Supported formats (each behind a cargo feature, all enabled by default):
//!
//! - **PNG** (`png-format`): 1-4 channels, 8 bits per sample
//! - **JPEG** (`jpeg`): Gray and RGB; alpha is dropped on write
//! - **PNM** (`pnm`): binary PGM (P5) and PPM (P6)
//!
//! Formats are detected from magic bytes when reading.

pub mod error;
pub mod format;
#[cfg(feature = "jpeg")]
pub mod jpeg;
#[cfg(feature = "png-format")]
pub mod png;
#[cfg(feature = "pnm")]
pub mod pnm;

pub use error::{IoError, IoResult};
pub use format::{ImageFormat, detect_format, detect_format_from_bytes};

use log::debug;
use pixblend_core::Image;
use std::fs::{self, File};
use std::io::{BufWriter, Cursor, Write};
use std::path::Path;

/// Read an image from a file, detecting the format from its contents.
///
/// # Errors
///
/// - [`IoError::Io`] if the file cannot be read
/// - [`IoError::UnsupportedFormat`] if the format is not recognized
/// - [`IoError::DecodeError`] if the contents are corrupt
pub fn read_image<P: AsRef<Path>>(path: P) -> IoResult<Image> {
    let path = path.as_ref();
    let data = fs::read(path)?;
    let image = read_image_mem(&data)?;
    debug!("read {} ({})", path.display(), image.shape());
    Ok(image)
}

/// Read an image from an in-memory encoded buffer.
pub fn read_image_mem(data: &[u8]) -> IoResult<Image> {
    let format = detect_format_from_bytes(data)?;
    let image = decode(format, data)?;
    debug!("decoded {} bytes of {} into {}", data.len(), format, image.shape());
    Ok(image)
}

fn decode(format: ImageFormat, data: &[u8]) -> IoResult<Image> {
    match format {
        #[cfg(feature = "png-format")]
        ImageFormat::Png => png::read_png(Cursor::new(data)),
        #[cfg(feature = "jpeg")]
        ImageFormat::Jpeg => jpeg::read_jpeg(Cursor::new(data)),
        #[cfg(feature = "pnm")]
        ImageFormat::Pnm => pnm::read_pnm(Cursor::new(data)),
        #[allow(unreachable_patterns)]
        other => Err(IoError::UnsupportedFormat(format!(
            "{other} decoding is not enabled"
        ))),
    }
}

/// Encode an image into a writer in the given format.
pub fn write_image_to<W: Write>(image: &Image, writer: W, format: ImageFormat) -> IoResult<()> {
    match format {
        #[cfg(feature = "png-format")]
        ImageFormat::Png => png::write_png(image, writer),
        #[cfg(feature = "jpeg")]
        ImageFormat::Jpeg => jpeg::write_jpeg(image, writer, jpeg::DEFAULT_JPEG_QUALITY),
        #[cfg(feature = "pnm")]
        ImageFormat::Pnm => pnm::write_pnm(image, writer),
        #[allow(unreachable_patterns)]
        other => Err(IoError::UnsupportedFormat(format!(
            "{other} encoding is not enabled"
        ))),
    }
}

/// Write an image to a file in the given format.
///
/// The file is created or truncated.
pub fn write_image<P: AsRef<Path>>(image: &Image, path: P, format: ImageFormat) -> IoResult<()> {
    let path = path.as_ref();
    let mut writer = BufWriter::new(File::create(path)?);
    write_image_to(image, &mut writer, format)?;
    writer.flush()?;
    debug!("wrote {} as {} ({})", path.display(), format, image.shape());
    Ok(())
}

/// Encode an image into a new in-memory buffer.
pub fn write_image_mem(image: &Image, format: ImageFormat) -> IoResult<Vec<u8>> {
    let mut buffer = Vec::new();
    write_image_to(image, &mut buffer, format)?;
    debug!("encoded {} as {} ({} bytes)", image.shape(), format, buffer.len());
    Ok(buffer)
}
