//! Symbol encoder: turns data plus [`crate::domain::EncodingParams`] into a
//! PNG QR raster.
//!
//! Error correction is fixed at Medium. Versions grow as needed to fit the
//! data ("fit-or-grow") and the output is byte-for-byte deterministic.

pub mod color;
pub mod symbol;

pub use color::parse_color;
pub use symbol::{ERROR_CORRECTION, MAX_IMAGE_SIDE, Raster, encode};
