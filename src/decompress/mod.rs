//! Block stream decompression for W3G replay files.
//!
//! The data following the header is a sequence of `block_count`
//! independently compressed blocks. Each block is inflated on its own, its
//! length is checked against the block header, and the payloads are
//! concatenated in order into the single logical stream that holds the
//! startup record and the event records.
//!
//! # Usage
//!
//! ```no_run
//! use w3g_replay::header::Header;
//! use w3g_replay::decompress::decompress;
//!
//! let data = std::fs::read("replay.w3g").unwrap();
//! let header = Header::parse(&data).unwrap();
//! let stream = decompress(&data, &header).unwrap();
//! println!("Decompressed {} bytes", stream.len());
//! ```

pub mod block;

pub use block::{inflate_block, BlockHeader};

use crate::error::{ParserError, Result};
use crate::format::BLOCK_HEADER_SIZE;
use crate::header::Header;

/// Decompresses every block of a replay into one contiguous buffer.
///
/// Blocks start at the header's declared size. A total that differs from
/// the header's declared decompressed size is logged but tolerated, since
/// recorders may pad the final block.
///
/// # Errors
///
/// Returns `ParserError::DecompressionError` if a block header or payload
/// runs past the input, a payload is not valid zlib data, or a block
/// inflates to a different size than it declares.
pub fn decompress(data: &[u8], header: &Header) -> Result<Vec<u8>> {
    let mut result = Vec::with_capacity(header.decompressed_size as usize);
    let mut offset = header.data_offset();

    for block_index in 0..header.block_count {
        let block_header = BlockHeader::parse(data, offset).map_err(|e| {
            ParserError::DecompressionError {
                reason: format!(
                    "Failed to parse block header {block_index} at offset 0x{offset:X}: {e}"
                ),
            }
        })?;

        let compressed_start = offset + BLOCK_HEADER_SIZE;
        let compressed_end = offset + block_header.total_size();

        let compressed = data.get(compressed_start..compressed_end).ok_or_else(|| {
            ParserError::DecompressionError {
                reason: format!(
                    "Block {block_index} at offset 0x{offset:X} extends beyond file (needs {compressed_end} bytes, file has {})",
                    data.len()
                ),
            }
        })?;

        let payload = inflate_block(&block_header, compressed).map_err(|e| {
            ParserError::DecompressionError {
                reason: format!("Block {block_index} at offset 0x{offset:X}: {e}"),
            }
        })?;

        tracing::trace!(
            block = block_index,
            offset,
            compressed = block_header.compressed_size,
            decompressed = payload.len(),
            "inflated block"
        );

        result.extend_from_slice(&payload);
        offset = compressed_end;
    }

    if result.len() != header.decompressed_size as usize {
        tracing::warn!(
            declared = header.decompressed_size,
            actual = result.len(),
            "decompressed size differs from header"
        );
    }

    Ok(result)
}
