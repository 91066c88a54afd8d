//! Per-block framing and inflation.
//!
//! # Block Layout
//!
//! | Offset | Size | Field |
//! |--------|------|-------|
//! | 0 | 2 | Compressed data size (u16) |
//! | 2 | 2 | Expected decompressed size (u16) |
//! | 4 | 4 | Padding / checksum, ignored |
//! | 8 | var | zlib-wrapped DEFLATE data |

use std::io::Read;

use flate2::read::ZlibDecoder;

use crate::binary::{read_bytes, read_u16_le};
use crate::error::{ParserError, Result};
use crate::format::BLOCK_HEADER_SIZE;

/// Information parsed from a block header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockHeader {
    /// The size of the compressed data following this header.
    pub compressed_size: u16,

    /// The exact size the block must inflate to.
    pub decompressed_size: u16,
}

impl BlockHeader {
    /// Parses a block header at `offset`.
    ///
    /// # Errors
    ///
    /// Returns `ParserError::UnexpectedEof` if fewer than 8 bytes remain.
    pub fn parse(data: &[u8], offset: usize) -> Result<Self> {
        read_bytes(data, offset, BLOCK_HEADER_SIZE)?;

        Ok(BlockHeader {
            compressed_size: read_u16_le(data, offset)?,
            decompressed_size: read_u16_le(data, offset + 2)?,
        })
    }

    /// Returns the total size of header plus compressed payload.
    #[must_use]
    pub fn total_size(&self) -> usize {
        BLOCK_HEADER_SIZE + self.compressed_size as usize
    }
}

/// Inflates one block's payload and checks it against the declared size.
///
/// # Errors
///
/// Returns `ParserError::DecompressionError` if the payload is not valid
/// zlib data or inflates to a different length than `header` declares.
pub fn inflate_block(header: &BlockHeader, compressed: &[u8]) -> Result<Vec<u8>> {
    let expected = header.decompressed_size as usize;
    let mut out = Vec::with_capacity(expected);

    ZlibDecoder::new(compressed)
        .read_to_end(&mut out)
        .map_err(|e| ParserError::DecompressionError {
            reason: format!("invalid compressed data: {e}"),
        })?;

    if out.len() != expected {
        return Err(ParserError::DecompressionError {
            reason: format!(
                "decompressed data size {} does not match expected size {expected}",
                out.len()
            ),
        });
    }

    Ok(out)
}
