//! Color identifier parsing for module fills.

use image::Rgb;

use crate::error::EncodingError;

/// Parses any CSS color identifier: keywords, `#rgb`/`#rrggbb` hex, and the
/// `rgb()`/`hsl()` function forms. Alpha is dropped since the raster is RGB.
///
/// # Errors
///
/// Returns [`EncodingError::InvalidColor`] when the identifier is not a
/// parseable CSS color.
pub fn parse_color(input: &str) -> Result<Rgb<u8>, EncodingError> {
    let color = csscolorparser::parse(input.trim())
        .map_err(|_| EncodingError::InvalidColor(input.to_string()))?;
    let [r, g, b, _] = color.to_rgba8();
    Ok(Rgb([r, g, b]))
}
