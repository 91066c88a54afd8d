//! Decoder for the masked string embedded in the startup record.
//!
//! The game settings, map path and creator name are stored as one string
//! whose bytes are shifted so that the encoded form never contains a zero
//! byte. Every run of eight bytes starts with a mask byte; bit `i` of the
//! mask tells whether byte `i` of the run was stored unchanged (bit set) or
//! incremented by one (bit clear). Position 0 of each run is the mask itself
//! and is not emitted. A raw zero byte terminates the string.
//!
//! This is a reversible byte transform, not a compressor: the output is
//! never longer than the input.
//!
//! # Example
//!
//! ```
//! use w3g_replay::obfuscation::decode_obfuscated;
//!
//! let raw = [0x00, 0x69, 0x66, 0x6D, 0x6D, 0x70, 0x00];
//! let (decoded, len) = decode_obfuscated(&raw).unwrap();
//! assert_eq!(decoded, b"hello");
//! assert_eq!(len, 6);
//! ```

use crate::error::{ParserError, Result};

/// Number of bytes covered by one mask byte, the mask included.
pub const MASK_RUN: usize = 8;

/// Decodes a masked string.
///
/// Returns the decoded bytes and the position of the terminating zero byte,
/// which is also the number of encoded bytes before it. The byte at
/// position 0 is always read as the first mask; from position 1 on, the
/// first zero byte ends the string.
///
/// # Errors
///
/// Returns `ParserError::UnexpectedEof` if the input has no terminator.
pub fn decode_obfuscated(data: &[u8]) -> Result<(Vec<u8>, usize)> {
    let mut decoded = Vec::with_capacity(data.len());
    let mut mask = 0u8;

    for (pos, &byte) in data.iter().enumerate() {
        if pos > 0 && byte == 0 {
            return Ok((decoded, pos));
        }

        let bit = pos % MASK_RUN;
        if bit == 0 {
            mask = byte;
        } else if mask & (1 << bit) == 0 {
            decoded.push(byte.wrapping_sub(1));
        } else {
            decoded.push(byte);
        }
    }

    Err(ParserError::unexpected_eof(data.len() + 1, data.len()))
}
