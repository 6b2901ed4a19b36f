//! Data → QR symbol → PNG raster.

use std::io::Cursor;

use image::{ImageFormat, Rgb, RgbImage};
use qrcode::types::QrError;
use qrcode::{EcLevel, QrCode, Version};

use super::color::parse_color;
use crate::domain::{EncodingParams, MAX_VERSION, MIN_VERSION};
use crate::error::EncodingError;

/// Error correction level used for every symbol (Medium, ~15% recovery).
pub const ERROR_CORRECTION: EcLevel = EcLevel::M;

/// Upper bound on the raster side length in pixels.
pub const MAX_IMAGE_SIDE: u64 = 16_384;

/// Output of [`encode`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Raster {
    /// PNG bytes.
    pub png: Vec<u8>,
    /// Version actually used; at least the requested one.
    pub version: u8,
    /// Side length of the square image in pixels.
    pub side: u32,
}

/// Encodes `data` into a PNG QR symbol.
///
/// Starts at `params.version` and grows to the smallest version that fits
/// the data; payloads are never truncated. Output is deterministic.
///
/// # Errors
///
/// Returns an [`EncodingError`] when the parameters are out of range, a
/// color cannot be parsed, the data exceeds version 40 capacity, or the
/// raster would exceed [`MAX_IMAGE_SIDE`].
pub fn encode(data: &str, params: &EncodingParams) -> Result<Raster, EncodingError> {
    if !(MIN_VERSION..=MAX_VERSION).contains(&params.version) {
        return Err(EncodingError::InvalidVersion(params.version));
    }
    if params.module_size == 0 {
        return Err(EncodingError::InvalidModuleSize);
    }
    let dark = parse_color(&params.foreground)?;
    let light = parse_color(&params.background)?;

    let (symbol, version) = build_symbol(data, params.version)?;
    let (image, side) = rasterize(&symbol, params.module_size, params.border, dark, light)?;

    let mut cursor = Cursor::new(Vec::new());
    image
        .write_to(&mut cursor, ImageFormat::Png)
        .map_err(|e| EncodingError::Image(e.to_string()))?;

    Ok(Raster {
        png: cursor.into_inner(),
        version,
        side,
    })
}

fn build_symbol(data: &str, min_version: u8) -> Result<(QrCode, u8), EncodingError> {
    for version in min_version..=MAX_VERSION {
        match QrCode::with_version(
            data.as_bytes(),
            Version::Normal(i16::from(version)),
            ERROR_CORRECTION,
        ) {
            Ok(symbol) => return Ok((symbol, version)),
            Err(QrError::DataTooLong) => {}
            Err(other) => return Err(EncodingError::Symbol(other.to_string())),
        }
    }
    Err(EncodingError::DataTooLong { len: data.len() })
}

fn rasterize(
    symbol: &QrCode,
    module_size: u32,
    border: u32,
    dark: Rgb<u8>,
    light: Rgb<u8>,
) -> Result<(RgbImage, u32), EncodingError> {
    let width = symbol.width();
    let modules = u64::try_from(width)
        .unwrap_or(u64::MAX)
        .saturating_add(u64::from(border).saturating_mul(2));
    let side = modules.saturating_mul(u64::from(module_size));
    if side > MAX_IMAGE_SIDE {
        return Err(EncodingError::ImageTooLarge {
            side,
            max: MAX_IMAGE_SIDE,
        });
    }
    let side = u32::try_from(side).map_err(|_| EncodingError::ImageTooLarge {
        side,
        max: MAX_IMAGE_SIDE,
    })?;

    let mut image = RgbImage::from_pixel(side, side, light);
    for (index, color) in symbol.to_colors().into_iter().enumerate() {
        if color != qrcode::Color::Dark {
            continue;
        }
        // Bounded by the side check above.
        #[allow(clippy::cast_possible_truncation)]
        let (col, row) = ((index % width) as u32, (index / width) as u32);
        let x0 = (border + col) * module_size;
        let y0 = (border + row) * module_size;
        for y in y0..y0 + module_size {
            for x in x0..x0 + module_size {
                image.put_pixel(x, y, dark);
            }
        }
    }
    Ok((image, side))
}
