//! PNG image format support
//!
//! Palette, low bit depth and 16-bit PNGs are expanded to 8 bits per
//! sample on read, so every decoded image is Gray, GrayAlpha, Rgb or
//! Rgba. Writing emits 8-bit PNG with the image's channel layout.

use crate::{IoError, IoResult};
use log::trace;
use pixblend_core::{Channels, Image};
use png::{BitDepth, ColorType, Decoder, Encoder, Transformations};
use std::io::{BufRead, Seek, Write};

fn channels_for(color_type: ColorType) -> IoResult<Channels> {
    match color_type {
        ColorType::Grayscale => Ok(Channels::Gray),
        ColorType::GrayscaleAlpha => Ok(Channels::GrayAlpha),
        ColorType::Rgb => Ok(Channels::Rgb),
        ColorType::Rgba => Ok(Channels::Rgba),
        ColorType::Indexed => Err(IoError::UnsupportedFormat(
            "PNG palette was not expanded".to_string(),
        )),
    }
}

/// Read a PNG image
pub fn read_png<R: BufRead + Seek>(reader: R) -> IoResult<Image> {
    let mut decoder = Decoder::new(reader);
    decoder.set_transformations(Transformations::EXPAND | Transformations::STRIP_16);
    let mut reader = decoder
        .read_info()
        .map_err(|e| IoError::DecodeError(format!("PNG decode error: {}", e)))?;

    let buf_size = reader
        .output_buffer_size()
        .ok_or_else(|| IoError::DecodeError("failed to get output buffer size".to_string()))?;
    let mut buf = vec![0; buf_size];
    let output_info = reader
        .next_frame(&mut buf)
        .map_err(|e| IoError::DecodeError(format!("PNG frame error: {}", e)))?;

    if output_info.bit_depth != BitDepth::Eight {
        return Err(IoError::UnsupportedFormat(format!(
            "unexpected PNG output depth {:?}",
            output_info.bit_depth
        )));
    }
    let channels = channels_for(output_info.color_type)?;
    let width = output_info.width;
    let height = output_info.height;
    trace!(
        "PNG frame {}x{} {:?}, line size {}",
        width, height, output_info.color_type, output_info.line_size
    );

    // Rows may be padded past width * spp
    let row_len = width as usize * channels.count() as usize;
    let mut data = Vec::with_capacity(row_len * height as usize);
    for row in buf.chunks(output_info.line_size).take(height as usize) {
        let row = row
            .get(..row_len)
            .ok_or_else(|| IoError::DecodeError("truncated PNG row".to_string()))?;
        data.extend_from_slice(row);
    }

    Ok(Image::from_vec(width, height, channels, data)?)
}

/// Write a PNG image
pub fn write_png<W: Write>(image: &Image, writer: W) -> IoResult<()> {
    let color_type = match image.channels() {
        Channels::Gray => ColorType::Grayscale,
        Channels::GrayAlpha => ColorType::GrayscaleAlpha,
        Channels::Rgb => ColorType::Rgb,
        Channels::Rgba => ColorType::Rgba,
    };

    let mut encoder = Encoder::new(writer, image.width(), image.height());
    encoder.set_color(color_type);
    encoder.set_depth(BitDepth::Eight);

    let mut writer = encoder
        .write_header()
        .map_err(|e| IoError::EncodeError(format!("PNG header error: {}", e)))?;
    writer
        .write_image_data(image.data())
        .map_err(|e| IoError::EncodeError(format!("PNG write error: {}", e)))?;
    writer
        .finish()
        .map_err(|e| IoError::EncodeError(format!("PNG finish error: {}", e)))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn roundtrip(image: &Image) -> Image {
        let mut buffer = Vec::new();
        write_png(image, &mut buffer).unwrap();
        read_png(Cursor::new(buffer)).unwrap()
    }

    #[test]
    fn test_png_roundtrip_grayscale() {
        let data: Vec<u8> = (0..100u32).map(|i| ((i % 10 + i / 10) * 10) as u8).collect();
        let image = Image::from_vec(10, 10, Channels::Gray, data).unwrap();
        let decoded = roundtrip(&image);
        assert_eq!(decoded.width(), 10);
        assert_eq!(decoded.height(), 10);
        assert_eq!(decoded, image);
    }

    #[test]
    fn test_png_roundtrip_rgb() {
        let mut image = Image::new(5, 5, Channels::Rgb).unwrap().into_mut();
        image.set_pixel(0, 0, &[255, 0, 0]).unwrap();
        image.set_pixel(1, 1, &[0, 255, 0]).unwrap();
        image.set_pixel(2, 2, &[0, 0, 255]).unwrap();
        let image: Image = image.into();

        let decoded = roundtrip(&image);
        assert_eq!(decoded.get_pixel(0, 0), Some(&[255u8, 0, 0][..]));
        assert_eq!(decoded.get_pixel(1, 1), Some(&[0u8, 255, 0][..]));
        assert_eq!(decoded.get_pixel(2, 2), Some(&[0u8, 0, 255][..]));
    }

    #[test]
    fn test_png_keeps_alpha_layouts() {
        for channels in [Channels::GrayAlpha, Channels::Rgba] {
            let image = Image::new_filled(3, 2, channels, 77).unwrap();
            let decoded = roundtrip(&image);
            assert_eq!(decoded.channels(), channels);
            assert_eq!(decoded, image);
        }
    }

    #[test]
    fn test_png_corrupt_data() {
        let mut buffer = Vec::new();
        write_png(&Image::new(4, 4, Channels::Gray).unwrap(), &mut buffer).unwrap();
        buffer.truncate(buffer.len() / 2);
        assert!(matches!(
            read_png(Cursor::new(buffer)),
            Err(IoError::DecodeError(_))
        ));
    }
}
