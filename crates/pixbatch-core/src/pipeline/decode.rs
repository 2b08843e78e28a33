//! Image decoding with content-based format detection.
//!
//! Two entry points: a header-only dimension probe and a full decode. The
//! format is always guessed from the content, never from a filename.

use image::{DynamicImage, ImageError, ImageReader};
use std::io::{BufRead, Cursor, Seek};

use crate::error::DecodeError;
use crate::types::RasterDimensions;

/// Read width and height from the format headers without decoding pixels.
///
/// Only as much of the stream as the header parser needs is consumed.
pub fn probe_dimensions<R: BufRead + Seek>(reader: R) -> Result<RasterDimensions, DecodeError> {
    let reader = ImageReader::new(reader)
        .with_guessed_format()
        .map_err(|e| DecodeError::Truncated(e.to_string()))?;
    if reader.format().is_none() {
        return Err(DecodeError::UnrecognizedFormat);
    }

    let (width, height) = reader.into_dimensions().map_err(classify_image_error)?;
    if width == 0 || height == 0 {
        return Err(DecodeError::Corrupt(format!(
            "header reports empty raster {width}x{height}"
        )));
    }
    Ok(RasterDimensions { width, height })
}

/// Probe an in-memory buffer.
pub fn probe_bytes(bytes: &[u8]) -> Result<RasterDimensions, DecodeError> {
    probe_dimensions(Cursor::new(bytes))
}

/// Fully decode an in-memory buffer into a raster.
pub fn decode_bytes(bytes: &[u8]) -> Result<DynamicImage, DecodeError> {
    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| DecodeError::Truncated(e.to_string()))?;
    if reader.format().is_none() {
        return Err(DecodeError::UnrecognizedFormat);
    }

    let image = reader.decode().map_err(classify_image_error)?;
    if image.width() == 0 || image.height() == 0 {
        return Err(DecodeError::Corrupt("decoded raster is empty".into()));
    }
    Ok(image)
}

fn classify_image_error(err: ImageError) -> DecodeError {
    match err {
        ImageError::Unsupported(_) => DecodeError::UnrecognizedFormat,
        ImageError::IoError(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
            DecodeError::Truncated(e.to_string())
        }
        other => DecodeError::Corrupt(other.to_string()),
    }
}
