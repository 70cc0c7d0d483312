//! Uncompressed 24-bit Windows bitmap codec.
//!
//! Only bottom-up BMPs with a version-3 (40-byte) info header and `BI_RGB`
//! compression are handled. Rows on disk are padded to a multiple of four
//! bytes and stored bottom row first; decoded images keep row 0 at the top.
//! Both directions size rows with [`padded_row_size`], so decode and encode
//! cannot disagree on the padding.

use crate::image::Image;
use crate::trace::{trace_event, trace_span};
use crate::util::{HistMatchError, HistMatchResult};
use std::io::Write;
use std::path::Path;

mod header;

use header::{BmpHeader, HEADERS_SIZE};

/// Row length in bytes including padding to a 4-byte boundary.
pub fn padded_row_size(width: usize, bytes_per_pixel: usize) -> usize {
    (width * bytes_per_pixel).div_ceil(4) * 4
}

/// Decodes a BMP byte stream into an image.
///
/// Fails without producing a partial image when the headers are inconsistent
/// or the stream is shorter than the declared pixel data.
pub fn decode(bytes: &[u8]) -> HistMatchResult<Image> {
    let header = BmpHeader::parse(bytes)?;
    let _span = trace_span!("bmp_decode", width = header.width, height = header.height).entered();

    let bytes_per_pixel = header.bytes_per_pixel();
    let unpadded = header
        .width
        .checked_mul(bytes_per_pixel)
        .ok_or(HistMatchError::InvalidDimensions {
            width: header.width,
            height: header.height,
        })?;
    let padded = padded_row_size(header.width, bytes_per_pixel);

    // The last row may omit its trailing padding.
    let needed = (header.height - 1)
        .checked_mul(padded)
        .and_then(|v| v.checked_add(unpadded))
        .and_then(|v| v.checked_add(header.data_offset))
        .ok_or(HistMatchError::InvalidDimensions {
            width: header.width,
            height: header.height,
        })?;
    if bytes.len() < needed {
        return Err(HistMatchError::TruncatedBitmap {
            needed,
            got: bytes.len(),
        });
    }

    let mut buf = vec![0u8; unpadded * header.height];
    for (i, file_row) in (0..header.height).map(|i| (i, header.data_offset + i * padded)) {
        let dst_row = header.height - 1 - i;
        buf[dst_row * unpadded..(dst_row + 1) * unpadded]
            .copy_from_slice(&bytes[file_row..file_row + unpadded]);
    }

    Image::from_bgr_bytes(buf, header.width, header.height)
}

/// Reads and decodes a BMP file.
pub fn decode_file<P: AsRef<Path>>(path: P) -> HistMatchResult<Image> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|err| HistMatchError::io(path, err))?;
    trace_event!("bmp_read", len = bytes.len());
    decode(&bytes)
}

/// Encodes an image as an uncompressed bottom-up 24-bit BMP.
pub fn encode(image: &Image) -> HistMatchResult<Vec<u8>> {
    let _span = trace_span!("bmp_encode", width = image.width(), height = image.height()).entered();

    let bytes_per_pixel = image.bytes_per_pixel();
    let unpadded = image.width() * bytes_per_pixel;
    let padded = padded_row_size(image.width(), bytes_per_pixel);
    let header = BmpHeader {
        data_offset: HEADERS_SIZE,
        width: image.width(),
        height: image.height(),
        bits_per_pixel: (bytes_per_pixel * 8) as u16,
    };

    let mut out = Vec::with_capacity(HEADERS_SIZE + padded * image.height());
    header.write(padded, &mut out)?;
    let padding = [0u8; 3];
    for i in 0..image.height() {
        let row = image
            .byte_row(image.height() - 1 - i)
            .ok_or(HistMatchError::BufferLength {
                expected: unpadded * image.height(),
                got: image.as_bytes().len(),
            })?;
        out.extend_from_slice(row);
        out.extend_from_slice(&padding[..padded - unpadded]);
    }
    Ok(out)
}

/// Encodes an image and writes it to `path`.
///
/// The bytes go to a temporary file next to the destination which replaces
/// the destination only once fully written.
pub fn encode_file<P: AsRef<Path>>(image: &Image, path: P) -> HistMatchResult<()> {
    let path = path.as_ref();
    let bytes = encode(image)?;
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp =
        tempfile::NamedTempFile::new_in(dir).map_err(|err| HistMatchError::io(path, err))?;
    tmp.write_all(&bytes)
        .and_then(|()| tmp.as_file().sync_all())
        .map_err(|err| HistMatchError::io(path, err))?;
    tmp.persist(path)
        .map_err(|err| HistMatchError::io(path, err.error))?;
    trace_event!("bmp_written", len = bytes.len());
    Ok(())
}
