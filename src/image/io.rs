//! Conversions from the `image` crate.
//!
//! Available when the `image-io` feature is enabled. Lets a capture saved by an
//! external tool (PNG, JPEG) be scanned like a decoded bitmap.

use crate::image::{Image, Rgb};
use crate::util::{HistMatchError, HistMatchResult};
use std::path::Path;

/// Creates an owned image from an 8-bit RGB buffer.
pub fn from_rgb_image(img: &image::RgbImage) -> HistMatchResult<Image> {
    let width = img.width() as usize;
    let height = img.height() as usize;
    let pixels = img
        .pixels()
        .map(|px| Rgb::new(px[0], px[1], px[2]))
        .collect();
    Image::from_pixels(pixels, width, height)
}

/// Creates an owned image from any dynamic image, dropping alpha.
pub fn from_dynamic_image(img: &image::DynamicImage) -> HistMatchResult<Image> {
    from_rgb_image(&img.to_rgb8())
}

/// Loads an image from disk through the `image` crate.
pub fn load_rgb_image<P: AsRef<Path>>(path: P) -> HistMatchResult<Image> {
    let img = image::open(path).map_err(|err| HistMatchError::ImageIo {
        reason: err.to_string(),
    })?;
    from_dynamic_image(&img)
}
