//! Binary reading utilities for decoding W3G replay data.
//!
//! This module provides functions for reading little-endian integers,
//! byte slices, null-terminated strings and bit fields from byte buffers.
//! All functions perform bounds checking and return errors for truncated
//! or malformed data instead of panicking.
//!
//! # Endianness
//!
//! Every multi-byte integer in a replay is little-endian. Bit fields number
//! bits from the least significant (bit 0) upwards.
//!
//! # Example
//!
//! ```
//! use w3g_replay::binary::{bitfield, read_cstring, read_u16_le, read_u32_le};
//!
//! let data = [0x26, 0x89, 0x01, 0x00, b'H', b'i', 0x00];
//!
//! assert_eq!(read_u16_le(&data, 0).unwrap(), 0x8926);
//! assert_eq!(read_u32_le(&data, 0).unwrap(), 0x0001_8926);
//!
//! let (s, consumed) = read_cstring(&data, 4).unwrap();
//! assert_eq!(s, "Hi");
//! assert_eq!(consumed, 3);
//!
//! assert_eq!(bitfield(0b0000_0110, 1..3), 0b11);
//! ```

use std::ops::Range;

use crate::error::{ParserError, Result};

/// Reads a single byte from the buffer at the given offset.
///
/// # Errors
///
/// Returns `ParserError::UnexpectedEof` if `offset` is past the end of the
/// buffer.
pub fn read_u8(bytes: &[u8], offset: usize) -> Result<u8> {
    bytes
        .get(offset)
        .copied()
        .ok_or_else(|| ParserError::unexpected_eof(offset + 1, bytes.len()))
}

/// Reads a little-endian u16 value from the byte buffer at the given offset.
///
/// # Errors
///
/// Returns `ParserError::UnexpectedEof` if the buffer doesn't contain
/// at least 2 bytes starting from the given offset.
///
/// # Example
///
/// ```
/// use w3g_replay::binary::read_u16_le;
///
/// let data = [0x34, 0x12, 0x00, 0x80];
/// assert_eq!(read_u16_le(&data, 0).unwrap(), 0x1234);
/// assert_eq!(read_u16_le(&data, 2).unwrap(), 0x8000);
/// ```
pub fn read_u16_le(bytes: &[u8], offset: usize) -> Result<u16> {
    let slice = read_bytes(bytes, offset, 2)?;
    Ok(u16::from_le_bytes([slice[0], slice[1]]))
}

/// Reads a little-endian u32 value from the byte buffer at the given offset.
///
/// # Errors
///
/// Returns `ParserError::UnexpectedEof` if the buffer doesn't contain
/// at least 4 bytes starting from the given offset.
///
/// # Example
///
/// ```
/// use w3g_replay::binary::read_u32_le;
///
/// let data = [0x78, 0x56, 0x34, 0x12];
/// assert_eq!(read_u32_le(&data, 0).unwrap(), 0x12345678);
/// ```
pub fn read_u32_le(bytes: &[u8], offset: usize) -> Result<u32> {
    let slice = read_bytes(bytes, offset, 4)?;
    Ok(u32::from_le_bytes([slice[0], slice[1], slice[2], slice[3]]))
}

/// Reads a slice of bytes from the buffer at the given offset.
///
/// # Errors
///
/// Returns `ParserError::UnexpectedEof` if the buffer doesn't contain
/// at least `len` bytes starting from the given offset.
pub fn read_bytes(bytes: &[u8], offset: usize, len: usize) -> Result<&[u8]> {
    let end = offset
        .checked_add(len)
        .ok_or_else(|| ParserError::unexpected_eof(usize::MAX, bytes.len()))?;
    bytes
        .get(offset..end)
        .ok_or_else(|| ParserError::unexpected_eof(end, bytes.len()))
}

/// Reads a null-terminated UTF-8 string starting at `offset`.
///
/// Returns the decoded text together with the number of bytes consumed,
/// which includes the terminator.
///
/// # Errors
///
/// - `ParserError::UnexpectedEof` if no zero byte follows `offset`
/// - `ParserError::InvalidEncoding` if the bytes are not valid UTF-8
///
/// # Example
///
/// ```
/// use w3g_replay::binary::read_cstring;
///
/// let data = b"Hello\x00World\x00";
/// assert_eq!(read_cstring(data, 6).unwrap(), ("World".to_string(), 6));
/// ```
pub fn read_cstring(bytes: &[u8], offset: usize) -> Result<(String, usize)> {
    let tail = bytes
        .get(offset..)
        .ok_or_else(|| ParserError::unexpected_eof(offset + 1, bytes.len()))?;

    let len = tail
        .iter()
        .position(|&b| b == 0)
        .ok_or_else(|| ParserError::unexpected_eof(bytes.len() + 1, bytes.len()))?;

    let text = std::str::from_utf8(&tail[..len])
        .map_err(|source| ParserError::InvalidEncoding { offset, source })?;

    Ok((text.to_owned(), len + 1))
}

/// Returns the eight bits of a byte, least significant first.
///
/// ```
/// use w3g_replay::binary::bits;
///
/// let b = bits(0b0100_0101);
/// assert!(b[0] && !b[1] && b[2] && b[6] && !b[7]);
/// ```
#[must_use]
pub fn bits(byte: u8) -> [bool; 8] {
    std::array::from_fn(|i| (byte >> i) & 1 == 1)
}

/// Extracts the bits in `range` from a byte as an integer.
///
/// The lowest bit of the range becomes bit 0 of the result. Ranges reaching
/// past bit 7 are clamped.
#[must_use]
pub fn bitfield(byte: u8, range: Range<u8>) -> u8 {
    let start = range.start.min(8);
    let end = range.end.clamp(start, 8);
    let width = end - start;
    if width == 0 {
        return 0;
    }
    let mask = ((1u16 << width) - 1) as u8;
    (byte >> start) & mask
}
