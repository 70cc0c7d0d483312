//! Owned RGB images.
//!
//! An [`Image`] keeps two views of the same pixels: the packed byte buffer in
//! on-disk channel order (B, G, R, three bytes per pixel, no row padding) and
//! a decoded [`Rgb`] buffer. Both are row-major with row 0 at the visual top
//! and are only ever replaced together.

use crate::geometry::Rect;
use crate::util::{HistMatchError, HistMatchResult};

#[cfg(feature = "image-io")]
pub mod io;

/// Bytes per pixel of the packed buffer.
pub const BYTES_PER_PIXEL: usize = 3;

/// One decoded pixel.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rgb {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
    pub const RED: Rgb = Rgb::new(255, 0, 0);

    /// Creates a pixel from its red, green and blue values.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Owned image with packed and decoded pixel buffers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Image {
    bytes: Vec<u8>,
    pixels: Vec<Rgb>,
    width: usize,
    height: usize,
}

impl Image {
    /// Creates an image from packed B, G, R bytes.
    pub fn from_bgr_bytes(bytes: Vec<u8>, width: usize, height: usize) -> HistMatchResult<Self> {
        let expected = packed_len(width, height)?;
        if bytes.len() != expected {
            return Err(HistMatchError::BufferLength {
                expected,
                got: bytes.len(),
            });
        }
        let pixels = bytes
            .chunks_exact(BYTES_PER_PIXEL)
            .map(|px| Rgb::new(px[2], px[1], px[0]))
            .collect();
        Ok(Self {
            bytes,
            pixels,
            width,
            height,
        })
    }

    /// Creates an image from decoded pixels, e.g. a screen capture.
    pub fn from_pixels(pixels: Vec<Rgb>, width: usize, height: usize) -> HistMatchResult<Self> {
        let expected = packed_len(width, height)? / BYTES_PER_PIXEL;
        if pixels.len() != expected {
            return Err(HistMatchError::BufferLength {
                expected,
                got: pixels.len(),
            });
        }
        let mut bytes = Vec::with_capacity(expected * BYTES_PER_PIXEL);
        for px in &pixels {
            bytes.extend_from_slice(&[px.b, px.g, px.r]);
        }
        Ok(Self {
            bytes,
            pixels,
            width,
            height,
        })
    }

    /// Creates a single-color image.
    pub fn filled(width: usize, height: usize, color: Rgb) -> HistMatchResult<Self> {
        let len = packed_len(width, height)? / BYTES_PER_PIXEL;
        Self::from_pixels(vec![color; len], width, height)
    }

    /// Replaces both buffers with a new packed B, G, R buffer.
    ///
    /// On error the image is left untouched.
    pub fn replace(&mut self, bytes: Vec<u8>, width: usize, height: usize) -> HistMatchResult<()> {
        *self = Self::from_bgr_bytes(bytes, width, height)?;
        Ok(())
    }

    /// Returns the image width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the image height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the packed bytes per pixel (always 3).
    pub fn bytes_per_pixel(&self) -> usize {
        BYTES_PER_PIXEL
    }

    /// Packed B, G, R bytes, row 0 first.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Decoded pixels, row 0 first.
    pub fn pixels(&self) -> &[Rgb] {
        &self.pixels
    }

    /// Returns the pixel at `(x, y)` if it is within bounds.
    pub fn pixel(&self, x: usize, y: usize) -> Option<Rgb> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels.get(y * self.width + x).copied()
    }

    /// Returns decoded row `y`.
    pub fn row(&self, y: usize) -> Option<&[Rgb]> {
        if y >= self.height {
            return None;
        }
        let start = y * self.width;
        self.pixels.get(start..start + self.width)
    }

    /// Returns packed row `y` without padding.
    pub fn byte_row(&self, y: usize) -> Option<&[u8]> {
        if y >= self.height {
            return None;
        }
        let row_len = self.width * BYTES_PER_PIXEL;
        let start = y * row_len;
        self.bytes.get(start..start + row_len)
    }

    /// Copies the region covered by `rect` into a new image.
    pub fn crop(&self, rect: &Rect) -> HistMatchResult<Image> {
        let (x, y, width, height) = self.region(rect)?;
        let mut pixels = Vec::with_capacity(width * height);
        for r in y..y + height {
            let start = r * self.width + x;
            pixels.extend_from_slice(&self.pixels[start..start + width]);
        }
        Image::from_pixels(pixels, width, height)
    }

    /// Returns a copy with every pixel inside `rect` (edges included) painted
    /// with `color`.
    pub fn with_region_marked(&self, rect: &Rect, color: Rgb) -> Image {
        let mut pixels = self.pixels.clone();
        for (idx, px) in pixels.iter_mut().enumerate() {
            let (Ok(c), Ok(r)) = (
                i32::try_from(idx % self.width),
                i32::try_from(idx / self.width),
            ) else {
                continue;
            };
            if rect.contains(c, r) {
                *px = color;
            }
        }
        let mut bytes = Vec::with_capacity(self.bytes.len());
        for px in &pixels {
            bytes.extend_from_slice(&[px.b, px.g, px.r]);
        }
        Image {
            bytes,
            pixels,
            width: self.width,
            height: self.height,
        }
    }

    /// Validates that `rect` lies inside the image and returns
    /// `(x, y, width, height)` as buffer indices.
    pub(crate) fn region(&self, rect: &Rect) -> HistMatchResult<(usize, usize, usize, usize)> {
        let out_of_bounds = || HistMatchError::RectOutOfBounds {
            x: rect.x(),
            y: rect.y(),
            width: rect.width(),
            height: rect.height(),
            img_width: self.width,
            img_height: self.height,
        };
        let x = usize::try_from(rect.x()).map_err(|_| out_of_bounds())?;
        let y = usize::try_from(rect.y()).map_err(|_| out_of_bounds())?;
        let width = usize::try_from(rect.width()).map_err(|_| out_of_bounds())?;
        let height = usize::try_from(rect.height()).map_err(|_| out_of_bounds())?;
        let end_x = x.checked_add(width).ok_or_else(out_of_bounds)?;
        let end_y = y.checked_add(height).ok_or_else(out_of_bounds)?;
        if end_x > self.width || end_y > self.height {
            return Err(out_of_bounds());
        }
        Ok((x, y, width, height))
    }
}

fn packed_len(width: usize, height: usize) -> HistMatchResult<usize> {
    if width == 0 || height == 0 {
        return Err(HistMatchError::InvalidDimensions { width, height });
    }
    width
        .checked_mul(height)
        .and_then(|v| v.checked_mul(BYTES_PER_PIXEL))
        .ok_or(HistMatchError::InvalidDimensions { width, height })
}

#[cfg(test)]
mod tests {
    use super::{Image, Rgb};
    use crate::geometry::{Point, Rect};
    use crate::util::HistMatchError;

    #[test]
    fn packed_and_decoded_buffers_agree() {
        let img = Image::from_bgr_bytes(vec![1, 2, 3, 4, 5, 6], 2, 1).unwrap();
        assert_eq!(img.pixels(), &[Rgb::new(3, 2, 1), Rgb::new(6, 5, 4)]);

        let back = Image::from_pixels(img.pixels().to_vec(), 2, 1).unwrap();
        assert_eq!(back.as_bytes(), img.as_bytes());
    }

    #[test]
    fn replace_is_all_or_nothing() {
        let mut img = Image::filled(2, 2, Rgb::RED).unwrap();
        let before = img.clone();
        let err = img.replace(vec![0; 5], 2, 2).unwrap_err();
        assert_eq!(err, HistMatchError::BufferLength { expected: 12, got: 5 });
        assert_eq!(img, before);

        img.replace(vec![9; 3], 1, 1).unwrap();
        assert_eq!((img.width(), img.height()), (1, 1));
        assert_eq!(img.pixels(), &[Rgb::new(9, 9, 9)]);
    }

    #[test]
    fn region_rejects_rects_outside_the_image() {
        let img = Image::filled(4, 3, Rgb::BLACK).unwrap();
        let inside = Rect::from_origin(Point::new(1, 1), 3, 2).unwrap();
        assert_eq!(img.region(&inside).unwrap(), (1, 1, 3, 2));

        for rect in [
            Rect::from_origin(Point::new(2, 0), 3, 1).unwrap(),
            Rect::from_origin(Point::new(0, 2), 1, 2).unwrap(),
            Rect::from_origin(Point::new(-1, 0), 1, 1).unwrap(),
        ] {
            assert!(matches!(
                img.region(&rect),
                Err(HistMatchError::RectOutOfBounds { .. })
            ));
        }
    }

    #[test]
    fn marked_region_includes_edges() {
        let img = Image::filled(4, 4, Rgb::BLACK).unwrap();
        let rect = Rect::from_origin(Point::new(1, 1), 1, 1).unwrap();
        let marked = img.with_region_marked(&rect, Rgb::RED);
        let red: Vec<(usize, usize)> = (0..4)
            .flat_map(|y| (0..4).map(move |x| (x, y)))
            .filter(|&(x, y)| marked.pixel(x, y) == Some(Rgb::RED))
            .collect();
        assert_eq!(red, vec![(1, 1), (2, 1), (1, 2), (2, 2)]);
        assert_eq!(&marked.as_bytes()[15..18], &[0, 0, 255]);
    }
}
