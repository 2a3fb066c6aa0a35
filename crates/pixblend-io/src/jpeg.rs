//! JPEG image format support
//!
//! Reads baseline and progressive JPEG through `jpeg-decoder` (8-bit
//! grayscale and RGB) and writes through `jpeg-encoder`. JPEG has no
//! alpha channel, so alpha is dropped on write.

use crate::{IoError, IoResult};
use jpeg_decoder::{Decoder, PixelFormat};
use jpeg_encoder::{ColorType, Encoder};
use pixblend_core::{Channels, Image};
use std::io::{Read, Write};

/// Quality used by [`write_image`](crate::write_image) for JPEG output
pub const DEFAULT_JPEG_QUALITY: u8 = 75;

/// Read a JPEG image from a reader.
///
/// Returns a Gray image for single-component files and an Rgb image for
/// YCbCr/RGB files. 16-bit and CMYK files are rejected.
pub fn read_jpeg<R: Read>(reader: R) -> IoResult<Image> {
    let mut decoder = Decoder::new(reader);
    let data = decoder
        .decode()
        .map_err(|e| IoError::DecodeError(format!("JPEG decode error: {}", e)))?;
    let info = decoder
        .info()
        .ok_or_else(|| IoError::DecodeError("JPEG header missing".to_string()))?;

    let channels = match info.pixel_format {
        PixelFormat::L8 => Channels::Gray,
        PixelFormat::RGB24 => Channels::Rgb,
        other => {
            return Err(IoError::UnsupportedFormat(format!(
                "unsupported JPEG pixel format: {:?}",
                other
            )));
        }
    };

    Ok(Image::from_vec(
        u32::from(info.width),
        u32::from(info.height),
        channels,
        data,
    )?)
}

/// Write an image as JPEG with the given quality (1-100).
pub fn write_jpeg<W: Write>(image: &Image, writer: W, quality: u8) -> IoResult<()> {
    if !(1..=100).contains(&quality) {
        return Err(IoError::EncodeError(format!(
            "JPEG quality must be in 1..=100, got {quality}"
        )));
    }
    let width = u16::try_from(image.width())
        .map_err(|_| IoError::EncodeError(format!("width {} too large for JPEG", image.width())))?;
    let height = u16::try_from(image.height()).map_err(|_| {
        IoError::EncodeError(format!("height {} too large for JPEG", image.height()))
    })?;

    let opaque = image.remove_alpha();
    let color_type = match opaque.channels() {
        Channels::Gray => ColorType::Luma,
        _ => ColorType::Rgb,
    };

    let encoder = Encoder::new(writer, quality);
    encoder
        .encode(opaque.data(), width, height, color_type)
        .map_err(|e| IoError::EncodeError(format!("JPEG encode error: {}", e)))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_jpeg_roundtrip_flat_gray() {
        let image = Image::new_filled(16, 16, Channels::Gray, 128).unwrap();
        let mut buffer = Vec::new();
        write_jpeg(&image, &mut buffer, 90).unwrap();

        let decoded = read_jpeg(Cursor::new(buffer)).unwrap();
        assert_eq!(decoded.channels(), Channels::Gray);
        assert_eq!((decoded.width(), decoded.height()), (16, 16));
        assert!(decoded.data().iter().all(|&v| v.abs_diff(128) <= 2));
    }

    #[test]
    fn test_jpeg_drops_alpha() {
        let image = Image::new_filled(8, 8, Channels::Rgba, 200).unwrap();
        let mut buffer = Vec::new();
        write_jpeg(&image, &mut buffer, 90).unwrap();
        let decoded = read_jpeg(Cursor::new(buffer)).unwrap();
        assert_eq!(decoded.channels(), Channels::Rgb);
    }

    #[test]
    fn test_jpeg_bad_quality() {
        let image = Image::new(8, 8, Channels::Gray).unwrap();
        assert!(matches!(
            write_jpeg(&image, Vec::new(), 0),
            Err(IoError::EncodeError(_))
        ));
    }

    #[test]
    fn test_jpeg_corrupt_data() {
        let data = [0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, 0x4A, 0x46];
        assert!(matches!(
            read_jpeg(Cursor::new(data)),
            Err(IoError::DecodeError(_))
        ));
    }
}
