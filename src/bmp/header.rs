//! BMP file header and version-3 info header.

use crate::util::bytes::{read_i32_le, read_u16_le, read_u32_le};
use crate::util::{HistMatchError, HistMatchResult};

pub(crate) const FILE_HEADER_SIZE: usize = 14;
pub(crate) const INFO_HEADER_SIZE: usize = 40;
pub(crate) const HEADERS_SIZE: usize = FILE_HEADER_SIZE + INFO_HEADER_SIZE;

const SIGNATURE: [u8; 2] = *b"BM";
const DATA_OFFSET_OFFSET: usize = 0x0A;
const INFO_SIZE_OFFSET: usize = 0x0E;
const WIDTH_OFFSET: usize = 0x12;
const HEIGHT_OFFSET: usize = 0x16;
const PLANES_OFFSET: usize = 0x1A;
const BITS_PER_PIXEL_OFFSET: usize = 0x1C;
const COMPRESSION_OFFSET: usize = 0x1E;

/// Compression tag for uncompressed RGB data.
const BI_RGB: u32 = 0;
/// 300 dpi in pixels per meter.
pub(crate) const DEFAULT_RESOLUTION: i32 = 11811;

/// Header fields the codec needs to locate and size the pixel rows.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct BmpHeader {
    pub(crate) data_offset: usize,
    pub(crate) width: usize,
    pub(crate) height: usize,
    pub(crate) bits_per_pixel: u16,
}

impl BmpHeader {
    /// Parses and validates both headers.
    pub(crate) fn parse(bytes: &[u8]) -> HistMatchResult<Self> {
        if bytes.len() < HEADERS_SIZE {
            return Err(HistMatchError::TruncatedBitmap {
                needed: HEADERS_SIZE,
                got: bytes.len(),
            });
        }
        if bytes[..2] != SIGNATURE {
            return Err(HistMatchError::MalformedBitmap {
                reason: "missing BM signature",
            });
        }

        let data_offset = read_u32_le(bytes, DATA_OFFSET_OFFSET)? as usize;
        let info_size = read_u32_le(bytes, INFO_SIZE_OFFSET)? as usize;
        let width = read_i32_le(bytes, WIDTH_OFFSET)?;
        let height = read_i32_le(bytes, HEIGHT_OFFSET)?;
        let planes = read_u16_le(bytes, PLANES_OFFSET)?;
        let bits_per_pixel = read_u16_le(bytes, BITS_PER_PIXEL_OFFSET)?;
        let compression = read_u32_le(bytes, COMPRESSION_OFFSET)?;

        if info_size < INFO_HEADER_SIZE {
            return Err(HistMatchError::UnsupportedBitmap {
                reason: format!("info header of {info_size} bytes"),
            });
        }
        if data_offset < FILE_HEADER_SIZE + info_size {
            return Err(HistMatchError::MalformedBitmap {
                reason: "pixel data overlaps the headers",
            });
        }
        if planes != 1 {
            return Err(HistMatchError::MalformedBitmap {
                reason: "plane count must be 1",
            });
        }
        if compression != BI_RGB {
            return Err(HistMatchError::UnsupportedBitmap {
                reason: format!("compression type {compression}"),
            });
        }
        if bits_per_pixel != 24 {
            return Err(HistMatchError::UnsupportedBitmap {
                reason: format!("{bits_per_pixel} bits per pixel"),
            });
        }
        if width <= 0 {
            return Err(HistMatchError::MalformedBitmap {
                reason: "width must be positive",
            });
        }
        if height == 0 {
            return Err(HistMatchError::MalformedBitmap {
                reason: "height must be non-zero",
            });
        }
        if height < 0 {
            return Err(HistMatchError::UnsupportedBitmap {
                reason: "top-down row order".to_string(),
            });
        }

        Ok(Self {
            data_offset,
            width: width as usize,
            height: height as usize,
            bits_per_pixel,
        })
    }

    pub(crate) fn bytes_per_pixel(&self) -> usize {
        usize::from(self.bits_per_pixel / 8)
    }

    /// Serializes both headers for an uncompressed bottom-up bitmap whose rows
    /// are `padded_row_size` bytes long.
    pub(crate) fn write(&self, padded_row_size: usize, out: &mut Vec<u8>) -> HistMatchResult<()> {
        let too_large = || HistMatchError::InvalidDimensions {
            width: self.width,
            height: self.height,
        };
        let image_size = padded_row_size
            .checked_mul(self.height)
            .and_then(|v| u32::try_from(v).ok())
            .ok_or_else(too_large)?;
        let file_size = image_size
            .checked_add(HEADERS_SIZE as u32)
            .ok_or_else(too_large)?;
        let width = i32::try_from(self.width).map_err(|_| too_large())?;
        let height = i32::try_from(self.height).map_err(|_| too_large())?;
        let data_offset = u32::try_from(self.data_offset).map_err(|_| too_large())?;

        out.extend_from_slice(&SIGNATURE);
        out.extend_from_slice(&file_size.to_le_bytes());
        out.extend_from_slice(&0u32.to_le_bytes());
        out.extend_from_slice(&data_offset.to_le_bytes());

        out.extend_from_slice(&(INFO_HEADER_SIZE as u32).to_le_bytes());
        out.extend_from_slice(&width.to_le_bytes());
        out.extend_from_slice(&height.to_le_bytes());
        out.extend_from_slice(&1u16.to_le_bytes());
        out.extend_from_slice(&self.bits_per_pixel.to_le_bytes());
        out.extend_from_slice(&BI_RGB.to_le_bytes());
        out.extend_from_slice(&image_size.to_le_bytes());
        out.extend_from_slice(&DEFAULT_RESOLUTION.to_le_bytes());
        out.extend_from_slice(&DEFAULT_RESOLUTION.to_le_bytes());
        // Colors used, important colors.
        out.extend_from_slice(&0u32.to_le_bytes());
        out.extend_from_slice(&0u32.to_le_bytes());
        Ok(())
    }
}
