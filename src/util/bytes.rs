//! Fixed-width little-endian field access for binary headers.

use crate::util::{HistMatchError, HistMatchResult};

/// Reads a little-endian `u16` at `offset`.
pub(crate) fn read_u16_le(bytes: &[u8], offset: usize) -> HistMatchResult<u16> {
    let field = field::<2>(bytes, offset)?;
    Ok(u16::from_le_bytes(field))
}

/// Reads a little-endian `u32` at `offset`.
pub(crate) fn read_u32_le(bytes: &[u8], offset: usize) -> HistMatchResult<u32> {
    let field = field::<4>(bytes, offset)?;
    Ok(u32::from_le_bytes(field))
}

/// Reads a little-endian `i32` at `offset`.
pub(crate) fn read_i32_le(bytes: &[u8], offset: usize) -> HistMatchResult<i32> {
    let field = field::<4>(bytes, offset)?;
    Ok(i32::from_le_bytes(field))
}

fn field<const N: usize>(bytes: &[u8], offset: usize) -> HistMatchResult<[u8; N]> {
    let end = offset
        .checked_add(N)
        .ok_or(HistMatchError::MalformedBitmap {
            reason: "field offset overflow",
        })?;
    let slice = bytes.get(offset..end).ok_or(HistMatchError::TruncatedBitmap {
        needed: end,
        got: bytes.len(),
    })?;
    let mut out = [0u8; N];
    out.copy_from_slice(slice);
    Ok(out)
}
