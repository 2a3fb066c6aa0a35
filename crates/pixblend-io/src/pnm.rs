//! PNM (Portable Any Map) format support
//!
//! Reads and writes PGM (P5 binary) and PPM (P6 binary). Header fields
//! may be separated by any whitespace and interleaved with `#` comments.
//! Samples with a maxval below 255 are rescaled to the full 8-bit range;
//! 16-bit files are rejected.

use crate::{IoError, IoResult};
use pixblend_core::{Channels, Image};
use std::io::{BufRead, Read, Write};

fn next_byte<R: BufRead>(reader: &mut R) -> IoResult<Option<u8>> {
    let byte = match reader.fill_buf()?.first() {
        Some(&b) => b,
        None => return Ok(None),
    };
    reader.consume(1);
    Ok(Some(byte))
}

/// Read one decimal header field, skipping leading whitespace and
/// comments. Consumes the single whitespace byte that ends the field.
fn read_field<R: BufRead>(reader: &mut R, name: &str) -> IoResult<u32> {
    let truncated = || IoError::DecodeError(format!("PNM header truncated before {name}"));

    let mut byte = next_byte(reader)?.ok_or_else(truncated)?;
    loop {
        if byte == b'#' {
            while byte != b'\n' && byte != b'\r' {
                byte = next_byte(reader)?.ok_or_else(truncated)?;
            }
        } else if !byte.is_ascii_whitespace() {
            break;
        }
        byte = next_byte(reader)?.ok_or_else(truncated)?;
    }

    let mut value: u32 = 0;
    loop {
        if !byte.is_ascii_digit() {
            return Err(IoError::DecodeError(format!(
                "invalid character {:?} in PNM {name}",
                char::from(byte)
            )));
        }
        value = value
            .checked_mul(10)
            .and_then(|v| v.checked_add(u32::from(byte - b'0')))
            .ok_or_else(|| IoError::DecodeError(format!("PNM {name} overflows")))?;
        match next_byte(reader)? {
            Some(b) if b.is_ascii_whitespace() => return Ok(value),
            Some(b) => byte = b,
            None => return Err(truncated()),
        }
    }
}

/// Read a binary PNM image (P5/P6) from a reader.
///
/// Returns a Gray image for PGM and an Rgb image for PPM.
pub fn read_pnm<R: BufRead>(mut reader: R) -> IoResult<Image> {
    let mut magic = [0u8; 2];
    reader
        .read_exact(&mut magic)
        .map_err(|_| IoError::DecodeError("PNM magic missing".to_string()))?;
    let channels = match &magic {
        b"P5" => Channels::Gray,
        b"P6" => Channels::Rgb,
        _ => {
            return Err(IoError::UnsupportedFormat(format!(
                "PNM variant {} is not supported",
                String::from_utf8_lossy(&magic)
            )));
        }
    };

    let width = read_field(&mut reader, "width")?;
    let height = read_field(&mut reader, "height")?;
    let maxval = read_field(&mut reader, "maxval")?;
    if maxval == 0 {
        return Err(IoError::DecodeError("PNM maxval is zero".to_string()));
    }
    if maxval > 255 {
        return Err(IoError::UnsupportedFormat(format!(
            "16-bit PNM (maxval {maxval}) is not supported"
        )));
    }
    if width == 0 || height == 0 {
        return Err(IoError::InvalidData(format!(
            "PNM has empty dimensions {width}x{height}"
        )));
    }

    let len = (width as usize)
        .checked_mul(height as usize)
        .and_then(|n| n.checked_mul(channels.count() as usize))
        .ok_or_else(|| {
            IoError::DecodeError(format!("PNM dimensions {width}x{height} overflow"))
        })?;
    // Allocation grows with the bytes actually read, not the header size
    let mut data = Vec::new();
    reader.take(len as u64).read_to_end(&mut data)?;
    if data.len() < len {
        return Err(IoError::DecodeError(format!(
            "PNM raster truncated, expected {len} bytes, got {}",
            data.len()
        )));
    }

    if maxval < 255 {
        for v in &mut data {
            let clamped = u32::from(*v).min(maxval);
            *v = ((clamped * 255 + maxval / 2) / maxval) as u8;
        }
    }

    Ok(Image::from_vec(width, height, channels, data)?)
}

/// Write an image as binary PNM to a writer.
///
/// Gray images are written as P5 and color images as P6; alpha is
/// dropped.
pub fn write_pnm<W: Write>(image: &Image, mut writer: W) -> IoResult<()> {
    let opaque = image.remove_alpha();
    let magic = match opaque.channels() {
        Channels::Gray => "P5",
        _ => "P6",
    };
    write!(writer, "{}\n{} {}\n255\n", magic, opaque.width(), opaque.height())?;
    writer.write_all(opaque.data())?;
    Ok(())
}
