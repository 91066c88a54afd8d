//! Error types for the W3G replay decoder.
//!
//! This module defines the error hierarchy for every failure that can occur
//! while decoding a replay: reading the source, validating the header,
//! inflating blocks, walking the startup record and the event stream, and
//! resolving player ids afterwards.
//!
//! None of these errors is recoverable for the decode in progress. The
//! container has no resynchronization points, so the first structural
//! problem aborts the whole decode and no partial replay is produced.

use std::str::Utf8Error;

use thiserror::Error;

/// The main error type for W3G replay decoding operations.
///
/// # Example
///
/// ```
/// use w3g_replay::error::{ParserError, Result};
///
/// fn example_operation() -> Result<()> {
///     Err(ParserError::InvalidHeader {
///         reason: "Header must be either v0 or v1, got v7".to_string(),
///     })
/// }
///
/// assert!(example_operation().is_err());
/// ```
#[derive(Error, Debug)]
pub enum ParserError {
    /// An I/O error occurred while reading the replay source.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// The container header is malformed, most commonly an unsupported
    /// header version.
    #[error("Invalid header: {reason}")]
    InvalidHeader {
        /// A description of what makes the header invalid.
        reason: String,
    },

    /// A compressed block could not be inflated, or inflated to a size
    /// other than the one its block header declares.
    #[error("Decompression failed: {reason}")]
    DecompressionError {
        /// A description of the decompression failure.
        reason: String,
    },

    /// A record in the decompressed stream has an unexpected tag, kind byte,
    /// table code or size.
    #[error("Invalid record format: {reason}")]
    InvalidFormat {
        /// A description of the malformed record.
        reason: String,
    },

    /// The event stream contains a record tag with no known decoder.
    ///
    /// Record lengths depend on the tag, so decoding cannot continue past
    /// this point.
    #[error("Unknown block tag 0x{tag:02X} at offset 0x{offset:X}")]
    UnknownBlock {
        /// The unrecognized tag byte.
        tag: u8,
        /// Offset of the tag within the decompressed stream.
        offset: usize,
    },

    /// A text field is not valid UTF-8.
    #[error("Invalid UTF-8 text at offset {offset}: {source}")]
    InvalidEncoding {
        /// Offset of the string within the buffer being decoded.
        offset: usize,
        /// The underlying decoding failure.
        source: Utf8Error,
    },

    /// An id resolves to neither a player record nor a slot record.
    #[error("No player or slot record with id {player_id}")]
    PlayerNotFound {
        /// The id that was looked up.
        player_id: u8,
    },

    /// The data ended unexpectedly before the required bytes could be read.
    ///
    /// This typically indicates a truncated replay file.
    #[error("Unexpected end of data: expected {expected} bytes, but only {available} available")]
    UnexpectedEof {
        /// The number of bytes that were expected to be available.
        expected: usize,
        /// The actual number of bytes available.
        available: usize,
    },
}

impl ParserError {
    /// Creates an `UnexpectedEof` error with the given sizes.
    ///
    /// # Arguments
    ///
    /// * `expected` - The number of bytes that were needed
    /// * `available` - The number of bytes actually available
    #[must_use]
    pub fn unexpected_eof(expected: usize, available: usize) -> Self {
        ParserError::UnexpectedEof {
            expected,
            available,
        }
    }

    /// Creates an `InvalidFormat` error from anything printable.
    ///
    /// ```
    /// use w3g_replay::error::ParserError;
    ///
    /// let err = ParserError::invalid_format("slot record size 12 outside 7..=9");
    /// assert!(err.to_string().contains("slot record size 12"));
    /// ```
    #[must_use]
    pub fn invalid_format(reason: impl Into<String>) -> Self {
        ParserError::InvalidFormat {
            reason: reason.into(),
        }
    }
}

/// A specialized Result type for W3G decoding operations.
pub type Result<T> = std::result::Result<T, ParserError>;
